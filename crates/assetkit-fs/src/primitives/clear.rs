use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// How the top level of a directory is cleared before it is repopulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClearMode {
    /// Remove every immediate child, directories together with their contents.
    #[default]
    Entries,
    /// Remove immediate files and empty directories only.
    ///
    /// Non-empty directories survive and are listed in [`ClearOutcome::retained`].
    FilesOnly,
    /// Leave the directory untouched.
    None,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClearOutcome {
    pub removed: usize,
    pub retained: Vec<PathBuf>,
}

/// Clear the immediate children of `dir` according to `mode`.
///
/// A missing directory is treated as already empty.
pub fn clear_dir(dir: impl AsRef<Path>, mode: ClearMode) -> Result<ClearOutcome> {
    let dir = dir.as_ref();
    let mut outcome = ClearOutcome::default();

    if mode == ClearMode::None {
        return Ok(outcome);
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(outcome),
        Err(e) => {
            return Err(Error::Read {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::Read {
            path: path.clone(),
            source: e,
        })?;

        let removal = if !file_type.is_dir() {
            fs::remove_file(&path)
        } else if mode == ClearMode::Entries {
            fs::remove_dir_all(&path)
        } else {
            match fs::remove_dir(&path) {
                Err(e) if is_not_empty(&path, &e) => {
                    tracing::debug!(path = %path.display(), "keeping non-empty directory");
                    outcome.retained.push(path);
                    continue;
                }
                other => other,
            }
        };

        removal.map_err(|e| Error::Remove {
            path: path.clone(),
            source: e,
        })?;
        outcome.removed += 1;
    }

    Ok(outcome)
}

// `DirectoryNotEmpty` is not reported uniformly across platforms, so fall
// back to looking inside the directory.
fn is_not_empty(path: &Path, err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::DirectoryNotEmpty
        || fs::read_dir(path).map(|mut it| it.next().is_some()).unwrap_or(false)
}

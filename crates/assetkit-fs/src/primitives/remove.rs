use std::fs;
use std::io;
use std::path::Path;

use crate::{Error, Result};

/// Remove a file or a whole directory tree.
///
/// Returns `false` when nothing existed at `path`.
pub fn remove_tree(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(Error::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let removal = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    removal.map_err(|e| Error::Remove {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Remove every immediate child of `dir` whose file name starts with one of `prefixes`.
///
/// Matching directories are removed with their contents. Returns the number
/// of children removed; a missing `dir` removes nothing.
pub fn remove_by_prefix<S: AsRef<str>>(dir: impl AsRef<Path>, prefixes: &[S]) -> Result<usize> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(Error::Read {
                path: dir.to_path_buf(),
                source: e,
            });
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| Error::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if prefixes.iter().any(|p| name.starts_with(p.as_ref())) && remove_tree(entry.path())? {
            removed += 1;
        }
    }

    Ok(removed)
}

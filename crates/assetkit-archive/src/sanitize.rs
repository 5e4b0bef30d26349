use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    /// Entry path relative to the base, with `.` and `..` resolved.
    pub relative: PathBuf,
    pub resolved: PathBuf,
}

/// Resolve an entry name against `base`, refusing anything that would land outside it.
///
/// Backslashes are treated as separators. Absolute names, names containing NUL
/// and names whose `..` components climb above `base` are rejected.
pub fn sanitize_entry_path(entry_name: &str, base: impl AsRef<Path>) -> Result<SanitizedPath> {
    let base = base.as_ref();

    if entry_name.contains('\0') {
        return Err(Error::InvalidPath {
            entry: entry_name.replace('\0', "\\0"),
        });
    }

    let unified = entry_name.replace('\\', "/");
    let entry_path = Path::new(&unified);
    let relative = normalize_relative(entry_path).ok_or_else(|| Error::ZipSlip {
        entry: entry_path.to_path_buf(),
        resolved: lexical_join(base, entry_path),
    })?;

    let resolved = base.join(&relative);
    // Holds by construction; kept as the last line of defence.
    if !resolved.starts_with(base) {
        return Err(Error::ZipSlip {
            entry: entry_path.to_path_buf(),
            resolved,
        });
    }

    Ok(SanitizedPath { relative, resolved })
}

/// Follow whatever already exists on disk along `relative` under `base` and
/// refuse the entry if a symlink on that path leads outside `real_base`.
///
/// `real_base` is the canonical form of `base`. Components that do not exist
/// yet are created as plain directories by the pipeline and need no check.
pub(crate) fn check_on_disk(base: &Path, real_base: &Path, relative: &Path) -> Result<()> {
    let mut current = base.to_path_buf();
    for component in relative.components() {
        current.push(component);
        let metadata = match fs::symlink_metadata(&current) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if !metadata.file_type().is_symlink() {
            continue;
        }
        // A dangling link would be created wherever it points.
        let resolved = match fs::canonicalize(&current) {
            Ok(real) if real.starts_with(real_base) => continue,
            Ok(real) => real,
            Err(e) if e.kind() == io::ErrorKind::NotFound => fs::read_link(&current)?,
            Err(e) => return Err(e.into()),
        };
        return Err(Error::ZipSlip {
            entry: relative.to_path_buf(),
            resolved,
        });
    }
    Ok(())
}

/// Resolve `.` and `..` without touching the filesystem.
///
/// Returns `None` for absolute paths and for paths that climb above their start.
fn normalize_relative(path: &Path) -> Option<PathBuf> {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => result.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(result)
}

// Where an escaping entry would have gone, for the error message.
fn lexical_join(base: &Path, entry: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(entry).components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_base_path() -> &'static Path {
        if cfg!(windows) {
            Path::new("C:/storage/pkg/data")
        } else {
            Path::new("/storage/pkg/data")
        }
    }

    #[test]
    fn basic_path_sanitization() {
        let result = sanitize_entry_path("sub/y.txt", test_base_path()).unwrap();
        assert_eq!(result.relative, Path::new("sub/y.txt"));
        assert_eq!(result.resolved, test_base_path().join("sub/y.txt"));
    }

    #[test]
    fn inner_parent_components_are_resolved() {
        let result = sanitize_entry_path("a/./b/../c.txt", test_base_path()).unwrap();
        assert_eq!(result.relative, Path::new("a/c.txt"));
    }

    #[test]
    fn backslashes_are_separators() {
        let result = sanitize_entry_path("foo\\bar\\baz.txt", test_base_path()).unwrap();
        assert_eq!(result.relative, Path::new("foo/bar/baz.txt"));
    }

    #[test]
    fn zip_slip_protection() {
        let result = sanitize_entry_path("../escape.txt", test_base_path());
        match result {
            Err(Error::ZipSlip { resolved, .. }) => {
                assert!(!resolved.starts_with(test_base_path()));
            }
            other => panic!("expected ZipSlip, got {other:?}"),
        }
        assert!(sanitize_entry_path("a/../../escape.txt", test_base_path()).is_err());
    }

    #[test]
    fn absolute_entries_rejected() {
        let malicious = if cfg!(windows) { "C:\\etc\\passwd" } else { "/etc/passwd" };
        assert!(matches!(
            sanitize_entry_path(malicious, test_base_path()),
            Err(Error::ZipSlip { .. })
        ));
    }

    #[test]
    fn nul_bytes_rejected() {
        assert!(matches!(
            sanitize_entry_path("evil\0.txt", test_base_path()),
            Err(Error::InvalidPath { .. })
        ));
    }

    #[test]
    fn directory_entry_keeps_trailing_name() {
        let result = sanitize_entry_path("sub/", test_base_path()).unwrap();
        assert_eq!(result.relative, Path::new("sub"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_leaving_base_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("base");
        fs::create_dir_all(base.join("inner")).unwrap();
        fs::create_dir_all(dir.path().join("outside")).unwrap();
        std::os::unix::fs::symlink("../outside", base.join("out")).unwrap();
        std::os::unix::fs::symlink("inner", base.join("alias")).unwrap();
        std::os::unix::fs::symlink("../nowhere", base.join("dangling")).unwrap();
        let real_base = fs::canonicalize(&base).unwrap();

        assert!(check_on_disk(&base, &real_base, Path::new("inner/a.txt")).is_ok());
        assert!(check_on_disk(&base, &real_base, Path::new("alias/a.txt")).is_ok());
        assert!(check_on_disk(&base, &real_base, Path::new("fresh/deep/a.txt")).is_ok());
        assert!(matches!(
            check_on_disk(&base, &real_base, Path::new("out/a.txt")),
            Err(Error::ZipSlip { .. })
        ));
        assert!(matches!(
            check_on_disk(&base, &real_base, Path::new("dangling")),
            Err(Error::ZipSlip { .. })
        ));
    }
}

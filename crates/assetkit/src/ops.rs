//! One-call entry points using default options and the tracing reporter.

use std::path::{Path, PathBuf};

use assetkit_archive::{ArchiveReport, ExtractOptions, ProgressCallback, unzip_file};

use crate::error::{Error, Result};
use crate::materialize::Materializer;
use crate::options::MaterializeOptions;
use crate::report::{Level, Reporter, TracingReporter};
use crate::source::AssetSource;

/// Copy `asset_path` from `source` under `storage_root`, unpacking it when it
/// is a `.zip`. See [`Materializer::materialize`].
pub fn copy_and_unzip_from_assets<S: AssetSource>(
    source: S,
    asset_path: &str,
    storage_root: impl AsRef<Path>,
) -> Result<PathBuf> {
    Materializer::new(source).materialize(asset_path, storage_root)
}

/// Copy a single asset to `destination`, overwriting it.
pub fn copy_asset<S: AssetSource>(
    source: S,
    asset_path: &str,
    destination: impl AsRef<Path>,
    on_progress: Option<ProgressCallback>,
) -> Result<u64> {
    let mut options = MaterializeOptions::default();
    options.on_progress = on_progress;
    Materializer::new(source)
        .with_options(options)
        .copy_asset(asset_path, destination)
}

/// Extract the zip at `archive` into `target`, clearing `target` first and
/// deleting the archive on success.
pub fn unzip(archive: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<ArchiveReport> {
    let archive = archive.as_ref();
    unzip_file(archive, target, &ExtractOptions::default())
        .map_err(Error::from)
        .inspect_err(|e| report_failure(&format!("unzip '{}'", archive.display()), e))
}

/// Trimmed first line of the asset at `path`, if any.
pub fn read_digest_from_assets<S: AssetSource>(source: S, path: &str) -> Option<String> {
    Materializer::new(source).read_digest(path)
}

/// Remove `path` and everything below it. Returns whether anything existed.
pub fn remove_tree(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    assetkit_fs::remove_tree(path)
        .map_err(Error::from)
        .inspect_err(|e| report_failure(&format!("remove '{}'", path.display()), e))
}

/// Remove direct children of `dir` whose names start with any of `prefixes`.
pub fn remove_by_prefix<P: AsRef<str>>(dir: impl AsRef<Path>, prefixes: &[P]) -> Result<usize> {
    let dir = dir.as_ref();
    assetkit_fs::remove_by_prefix(dir, prefixes)
        .map_err(Error::from)
        .inspect_err(|e| report_failure(&format!("clean '{}'", dir.display()), e))
}

fn report_failure(operation: &str, error: &Error) {
    TracingReporter.log(
        Level::ERROR,
        &format!("{operation} failed ({}): {error}", error.kind()),
    );
}

//! Asset materialization.
//!
//! An asset is copied from its [`AssetSource`] to the same relative path under
//! a storage root. Assets whose path ends in an archive suffix are then
//! unpacked into a sibling directory named after the path without the suffix,
//! and the copied archive is removed.

use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use assetkit_archive::{ArchiveReport, ProgressTracker, Stage, unzip_file};
use assetkit_fs::copy_to_file;
use assetkit_verify::{Algorithm, Checksum, Hasher, Md5Hasher, Sha256Hasher, VerifiedReader, VerifyError};

use crate::error::{Error, Result};
use crate::options::{MaterializeOptions, Reuse, SIDECAR_SUFFIX};
use crate::report::{Level, Reporter, TracingReporter};
use crate::source::AssetSource;

pub struct Materializer<S> {
    source: S,
    options: MaterializeOptions,
    reporter: Arc<dyn Reporter>,
}

impl<S: AssetSource> Materializer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: MaterializeOptions::default(),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_options(mut self, options: MaterializeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn options(&self) -> &MaterializeOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ensure `asset_path` is available under `storage_root` and return where.
    ///
    /// For a plain asset this is `storage_root/asset_path`. For an archive
    /// asset it is the extraction directory `storage_root/<asset_path without
    /// suffix>`, whose previous top-level content is cleared first.
    ///
    /// An existing copy is reused according to [`MaterializeOptions::reuse`].
    /// Archive copies are removed after extraction, so an archive asset is
    /// copied and unpacked again on every call.
    pub fn materialize(&self, asset_path: &str, storage_root: impl AsRef<Path>) -> Result<PathBuf> {
        let storage_root = storage_root.as_ref();
        self.logged(&format!("materialize '{asset_path}'"), || {
            self.try_materialize(asset_path, storage_root)
        })
    }

    /// Copy one asset to `destination`, overwriting it. Returns bytes written.
    pub fn copy_asset(&self, asset_path: &str, destination: impl AsRef<Path>) -> Result<u64> {
        let destination = destination.as_ref();
        self.logged(&format!("copy '{asset_path}'"), || {
            validate_asset_path(asset_path)?;
            self.copy_into(asset_path, destination, None)
        })
    }

    /// Extract `archive` into `target` with this materializer's extract options.
    pub fn unzip(&self, archive: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<ArchiveReport> {
        let (archive, target) = (archive.as_ref(), target.as_ref());
        self.logged(&format!("unzip '{}'", archive.display()), || {
            unzip_file(archive, target, &self.options.extract_options()).map_err(Error::from)
        })
    }

    /// First line of the asset at `path`, trimmed. `None` when the asset is
    /// missing, unreadable or blank.
    pub fn read_digest(&self, path: &str) -> Option<String> {
        if let Err(e) = validate_asset_path(path) {
            self.reporter.log(Level::WARN, &format!("not reading digest: {e}"));
            return None;
        }
        let reader = match self.source.open(path) {
            Ok(reader) => reader,
            Err(e) => {
                self.reporter
                    .log(Level::DEBUG, &format!("no digest asset '{path}': {e}"));
                return None;
            }
        };
        let mut line = String::new();
        if let Err(e) = BufReader::new(reader).read_line(&mut line) {
            self.reporter
                .log(Level::WARN, &format!("unreadable digest asset '{path}': {e}"));
            return None;
        }
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    }

    fn try_materialize(&self, asset_path: &str, storage_root: &Path) -> Result<PathBuf> {
        let asset = validate_asset_path(asset_path)?;
        let root = normalize_root(storage_root)?;
        let stem = match self.options.archive_stem(asset_path) {
            Some(stem) if stem.is_empty() || stem.ends_with('/') => {
                return Err(Error::invalid(format!(
                    "archive asset '{asset_path}' has no name to extract into"
                )));
            }
            other => other,
        };

        let destination = root.join(asset);
        let expected = self.expected_checksum(asset_path);

        if self.needs_copy(&destination, expected.as_ref())? {
            let bytes = self.copy_into(asset_path, &destination, expected.as_ref())?;
            self.reporter.log(
                Level::INFO,
                &format!("copied '{asset_path}' to {} ({bytes} bytes)", destination.display()),
            );
        } else {
            self.reporter.log(
                Level::DEBUG,
                &format!("reusing {}", destination.display()),
            );
        }

        let Some(stem) = stem else {
            return Ok(destination);
        };

        let target = root.join(stem);
        let report = unzip_file(&destination, &target, &self.options.extract_options())?;
        self.reporter.log(
            Level::INFO,
            &format!(
                "unpacked '{asset_path}' into {} ({} entries, {} bytes)",
                target.display(),
                report.entry_count,
                report.total_bytes
            ),
        );
        Ok(target)
    }

    fn expected_checksum(&self, asset_path: &str) -> Option<Checksum> {
        match &self.options.reuse {
            Reuse::IfPresent | Reuse::Never => None,
            Reuse::IfDigestMatches(checksum) => Some(checksum.clone()),
            Reuse::IfSidecarMatches => {
                let sidecar = format!("{asset_path}{SIDECAR_SUFFIX}");
                let checksum = match self.read_digest(&sidecar) {
                    Some(digest) => Checksum::md5(&digest)
                        .inspect_err(|e| {
                            self.reporter
                                .log(Level::WARN, &format!("ignoring '{sidecar}': {e}"))
                        })
                        .ok(),
                    None => None,
                };
                if checksum.is_none() {
                    self.reporter.log(
                        Level::WARN,
                        &format!("no usable digest in '{sidecar}', reusing '{asset_path}' if present"),
                    );
                }
                checksum
            }
        }
    }

    fn needs_copy(&self, destination: &Path, expected: Option<&Checksum>) -> Result<bool> {
        if self.options.reuse == Reuse::Never || !destination.is_file() {
            return Ok(true);
        }
        let Some(checksum) = expected else {
            return Ok(false);
        };
        match checksum.verify_file(destination) {
            Ok(()) => Ok(false),
            Err(VerifyError::Mismatch { actual, .. }) => {
                self.reporter.log(
                    Level::WARN,
                    &format!(
                        "{} has digest {actual}, expected {checksum}; copying again",
                        destination.display()
                    ),
                );
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn copy_into(&self, asset_path: &str, destination: &Path, expected: Option<&Checksum>) -> Result<u64> {
        let reader = self.source.open(asset_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AssetNotFound {
                    asset: asset_path.to_string(),
                }
            } else {
                Error::AssetOpen {
                    asset: asset_path.to_string(),
                    source: e,
                }
            }
        })?;

        let mut tracker = ProgressTracker::new(
            Stage::Copy,
            self.source.size_hint(asset_path),
            self.options.on_progress.clone(),
        );
        let current = Path::new(asset_path);

        let written = match expected {
            None => {
                let mut reader = reader;
                copy_to_file(&mut reader, destination, |n| tracker.update(n, Some(current)))?
            }
            Some(checksum) => {
                let sink = CopySink { destination, tracker: &mut tracker, current };
                match checksum.algorithm() {
                    Algorithm::Md5 => sink.copy_verified(reader, Md5Hasher::new(), checksum)?,
                    Algorithm::Sha256 => sink.copy_verified(reader, Sha256Hasher::new(), checksum)?,
                }
            }
        };
        // Chunks already reported every non-empty copy.
        if written == 0 {
            tracker.update(written, Some(current));
        }
        Ok(written)
    }

    fn logged<T>(&self, operation: &str, run: impl FnOnce() -> Result<T>) -> Result<T> {
        run().inspect_err(|e| {
            self.reporter
                .log(Level::ERROR, &format!("{operation} failed ({}): {e}", e.kind()))
        })
    }
}

struct CopySink<'a> {
    destination: &'a Path,
    tracker: &'a mut ProgressTracker,
    current: &'a Path,
}

impl CopySink<'_> {
    /// Copy while hashing, then fail if the bytes written do not match `expected`.
    /// The mismatching file is left in place.
    fn copy_verified<R: Read, H: Hasher>(self, reader: R, hasher: H, expected: &Checksum) -> Result<u64> {
        let Self { destination, tracker, current } = self;
        let mut verified = VerifiedReader::new(reader, hasher);
        let written = copy_to_file(&mut verified, destination, |n| tracker.update(n, Some(current)))?;
        verified.finish(expected.digest())?;
        Ok(written)
    }
}

/// Relative, slash-separated, naming a file: no leading or trailing `/`,
/// no `..`, no NUL.
fn validate_asset_path(asset_path: &str) -> Result<&Path> {
    if asset_path.is_empty() {
        return Err(Error::invalid("asset path is empty"));
    }
    if asset_path.contains('\0') {
        return Err(Error::invalid(format!("asset path '{asset_path}' contains NUL")));
    }
    if asset_path.ends_with('/') {
        return Err(Error::invalid(format!("asset path '{asset_path}' names a directory")));
    }
    let path = Path::new(asset_path);
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::invalid(format!("asset path '{asset_path}' contains '..'")));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::invalid(format!("asset path '{asset_path}' is absolute")));
            }
        }
    }
    Ok(path)
}

/// Drops trailing and repeated separators.
fn normalize_root(storage_root: &Path) -> Result<PathBuf> {
    if storage_root.as_os_str().is_empty() {
        return Err(Error::invalid("storage root is empty"));
    }
    Ok(storage_root.components().collect())
}

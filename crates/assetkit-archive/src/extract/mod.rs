//! Extraction pipeline.
//!
//! Entries are processed in the order the source yields them. Each name is
//! sanitized, and its path checked against symlinks already present in the
//! destination, before anything is written for it; the first failure stops
//! extraction and leaves already-written entries in place.

use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use assetkit_fs::{ClearOutcome, clear_dir, copy_to_file, ensure_dir};

use crate::entry::{ArchiveReport, Entry, EntryKind};
use crate::error::{Error, Result};
use crate::options::{ArchiveCleanup, ExtractOptions, ProgressTracker, Stage};
use crate::sanitize::{SanitizedPath, check_on_disk, sanitize_entry_path};

mod zip;

pub use self::zip::ZipSource;

/// An entry read from the archive but not yet written.
pub struct PendingEntry<'a> {
    /// Raw entry name as stored in the archive.
    pub name: String,
    pub size: u64,
    pub kind: PendingKind<'a>,
}

pub enum PendingKind<'a> {
    Directory,
    File(Box<dyn Read + 'a>),
}

/// Archive-specific entry source.
pub trait EntrySource {
    /// Number of entries, when known up front.
    fn entry_count(&self) -> Option<usize>;

    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>>;
}

/// Extract the zip archive at `archive` into `destination`.
///
/// The top level of `destination` is cleared first according to
/// [`ExtractOptions::clear_mode`]. With [`ArchiveCleanup::Delete`] the archive
/// is removed once, after every entry has been written; on failure it is kept.
pub fn unzip_file(
    archive: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let archive = archive.as_ref();
    let destination = destination.as_ref();

    let cleared = prepare_target(destination, options)?;

    let file = File::open(archive).map_err(|e| Error::ArchiveOpen {
        path: archive.to_path_buf(),
        source: e,
    })?;
    let mut report = {
        let mut source = ZipSource::new(BufReader::new(file))?;
        extract(&mut source, destination, options)?
    };
    report.cleared = cleared;

    if options.cleanup == ArchiveCleanup::Delete {
        fs::remove_file(archive).map_err(|e| Error::RemoveArchive {
            path: archive.to_path_buf(),
            source: e,
        })?;
        report.archive_removed = true;
    }

    tracing::info!(
        archive = %archive.display(),
        target = %destination.display(),
        entries = report.entry_count,
        skipped = report.skipped_count,
        bytes = report.total_bytes,
        "archive extracted"
    );
    Ok(report)
}

/// Extract an already-open zip archive into `destination`.
///
/// Clearing applies as for [`unzip_file`]; there is no archive file to clean up.
pub fn extract_from_reader<R: Read + Seek>(
    reader: R,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    let cleared = prepare_target(destination, options)?;
    let mut source = ZipSource::new(reader)?;
    let mut report = extract(&mut source, destination, options)?;
    report.cleared = cleared;
    Ok(report)
}

fn prepare_target(destination: &Path, options: &ExtractOptions) -> Result<ClearOutcome> {
    let cleared = clear_dir(destination, options.clear_mode)?;
    if !cleared.retained.is_empty() {
        tracing::warn!(
            target = %destination.display(),
            retained = cleared.retained.len(),
            "non-empty directories left in place while clearing target"
        );
    }
    ensure_dir(destination)?;
    Ok(cleared)
}

/// Run every entry of `source` through sanitization, filtering and writing.
pub fn extract<S: EntrySource>(
    source: &mut S,
    destination: &Path,
    options: &ExtractOptions,
) -> Result<ArchiveReport> {
    ensure_dir(destination)?;
    let real_base = fs::canonicalize(destination)?;

    let mut report = ArchiveReport::default();
    let total = source.entry_count().map(|n| n as u64);
    let mut tracker = ProgressTracker::new(Stage::Extract, total, options.on_progress.clone());
    let mut processed = 0u64;

    while let Some(pending) = source.next_entry() {
        let pending = pending?;
        processed += 1;

        let sanitized = sanitize_entry_path(&pending.name, destination)?;

        if !options.accepts(&sanitized.relative) {
            tracing::trace!(entry = %pending.name, "skipped by filter");
            report.skipped_count += 1;
            tracker.update(processed, Some(&sanitized.relative));
            continue;
        }

        check_on_disk(destination, &real_base, &sanitized.relative)?;
        let (kind, size) = write_entry(&pending.name, pending.kind, &sanitized)?;
        tracing::debug!(entry = %pending.name, bytes = size, "extracted");

        report.total_bytes += size;
        report.entry_count += 1;
        tracker.update(processed, Some(&sanitized.relative));
        report.entries.push(Entry {
            original_path: sanitized.relative,
            target_path: sanitized.resolved,
            size,
            kind,
        });
    }

    Ok(report)
}

fn write_entry(
    name: &str,
    kind: PendingKind<'_>,
    sanitized: &SanitizedPath,
) -> Result<(EntryKind, u64)> {
    match kind {
        PendingKind::Directory => {
            ensure_dir(&sanitized.resolved)?;
            Ok((EntryKind::Directory, 0))
        }
        PendingKind::File(mut reader) => {
            if sanitized.relative.as_os_str().is_empty() {
                return Err(Error::InvalidPath {
                    entry: name.to_string(),
                });
            }
            let written = copy_to_file(&mut reader, &sanitized.resolved, |_| {})?;
            Ok((EntryKind::File, written))
        }
    }
}

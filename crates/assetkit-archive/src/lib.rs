//! Zip extraction with path sanitization.
//!
//! # Architecture
//!
//! - `sanitize.rs` - Entry path resolution (zip-slip prevention)
//! - `options.rs` - Clear, cleanup, filter and progress configuration
//! - `entry.rs` - Extracted entry and report types
//! - `extract/` - Extraction pipeline and the zip entry source

pub use assetkit_fs::{ClearMode, ClearOutcome};
pub use entry::{ArchiveReport, Entry, EntryKind};
pub use error::{Error, Result};
pub use extract::{EntrySource, PendingEntry, PendingKind, ZipSource, extract_from_reader, unzip_file};
pub use options::{ArchiveCleanup, EntryFilter, ExtractOptions, Progress, ProgressCallback, ProgressTracker, Stage};
pub use sanitize::{SanitizedPath, sanitize_entry_path};

pub mod entry;
mod error;
pub mod extract;
pub mod options;
mod sanitize;

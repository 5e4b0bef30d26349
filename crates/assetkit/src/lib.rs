//! Materialize bundled assets onto writable storage.
//!
//! An application ships read-only assets addressed by slash-separated paths.
//! [`Materializer`] copies one asset to the same relative path under a
//! storage root. When the asset is a zip archive it is unpacked into a
//! directory named after the asset without its suffix, and the copied
//! archive is deleted.
//!
//! ```no_run
//! use assetkit::{DirAssets, copy_and_unzip_from_assets};
//!
//! let assets = DirAssets::new("/opt/app/assets");
//! let unpacked = copy_and_unzip_from_assets(&assets, "pkg/data.zip", "/var/lib/app")?;
//! assert!(unpacked.ends_with("pkg/data"));
//! # Ok::<(), assetkit::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `source.rs` - Asset providers (`DirAssets`, `MemoryAssets`)
//! - `options.rs` - Reuse policy, archive suffixes and progress
//! - `materialize.rs` - Copy, verify and unpack
//! - `report.rs` - Injected logging
//! - `ops.rs` - One-call entry points
//!
//! Extraction lives in `assetkit-archive`, streaming copy and clearing in
//! `assetkit-fs`, digests in `assetkit-verify`.

pub use assetkit_archive::{
    ArchiveCleanup, ArchiveReport, ClearMode, Entry, EntryFilter, EntryKind, ExtractOptions,
    Progress, ProgressCallback, Stage,
};
pub use assetkit_verify::{Algorithm, Checksum};
pub use error::{Error, ErrorKind, Result};
pub use materialize::Materializer;
pub use ops::{
    copy_and_unzip_from_assets, copy_asset, read_digest_from_assets, remove_by_prefix,
    remove_tree, unzip,
};
pub use options::{DEFAULT_ARCHIVE_SUFFIX, MaterializeOptions, Reuse, SIDECAR_SUFFIX};
pub use report::{Level, Reporter, TracingReporter};
pub use source::{AssetSource, DirAssets, MemoryAssets};

mod error;
mod materialize;
mod ops;
mod options;
mod report;
mod source;

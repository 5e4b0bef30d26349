use std::fmt;
use std::sync::Arc;

use assetkit_archive::{ExtractOptions, ProgressCallback};
use assetkit_verify::Checksum;

/// Suffix that marks an asset as an archive to unpack.
pub const DEFAULT_ARCHIVE_SUFFIX: &str = ".zip";

/// Suffix appended to an asset path to find its md5 sidecar.
pub const SIDECAR_SUFFIX: &str = ".md5";

/// When an asset already present in storage is reused instead of copied again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Reuse {
    /// Reuse any existing file, whatever its content.
    #[default]
    IfPresent,
    /// Always copy.
    Never,
    /// Reuse only when the existing file hashes to this digest. Fresh copies
    /// are verified against it as well.
    IfDigestMatches(Checksum),
    /// Like [`Reuse::IfDigestMatches`], with the md5 digest read from the
    /// asset `<path>.md5`. Falls back to [`Reuse::IfPresent`] when the
    /// sidecar is missing or empty.
    IfSidecarMatches,
}

#[derive(Clone)]
pub struct MaterializeOptions {
    pub archive_suffixes: Vec<String>,
    pub reuse: Reuse,
    pub extract: ExtractOptions,
    /// Receives copy progress, and extraction progress unless
    /// `extract` carries its own callback.
    pub on_progress: Option<ProgressCallback>,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            archive_suffixes: vec![DEFAULT_ARCHIVE_SUFFIX.to_string()],
            reuse: Reuse::default(),
            extract: ExtractOptions::default(),
            on_progress: None,
        }
    }
}

impl MaterializeOptions {
    pub fn archive_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.archive_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn reuse(mut self, reuse: Reuse) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Path with the archive suffix removed, if `asset_path` carries one.
    /// Suffix matching is case-sensitive.
    pub(crate) fn archive_stem<'a>(&self, asset_path: &'a str) -> Option<&'a str> {
        self.archive_suffixes
            .iter()
            .filter(|suffix| !suffix.is_empty())
            .find_map(|suffix| asset_path.strip_suffix(suffix.as_str()))
    }

    pub(crate) fn extract_options(&self) -> ExtractOptions {
        let mut extract = self.extract.clone();
        if extract.on_progress.is_none() {
            extract.on_progress = self.on_progress.as_ref().map(Arc::clone);
        }
        extract
    }
}

impl fmt::Debug for MaterializeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterializeOptions")
            .field("archive_suffixes", &self.archive_suffixes)
            .field("reuse", &self.reuse)
            .field("on_progress", &self.on_progress.is_some())
            .finish_non_exhaustive()
    }
}

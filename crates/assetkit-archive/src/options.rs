use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use assetkit_fs::ClearMode;

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ExtractOptions {
    pub clear_mode: ClearMode,
    pub cleanup: ArchiveCleanup,
    pub filter: Option<EntryFilter>,
    pub on_progress: Option<ProgressCallback>,
}

impl ExtractOptions {
    pub fn clear_mode(mut self, mode: ClearMode) -> Self {
        self.clear_mode = mode;
        self
    }

    pub fn cleanup(mut self, cleanup: ArchiveCleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn filter(mut self, filter: EntryFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn on_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn accepts(&self, relative: &Path) -> bool {
        self.filter.as_ref().is_none_or(|f| f.accepts(relative))
    }
}

/// What happens to the source archive once every entry has been extracted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArchiveCleanup {
    #[default]
    Delete,
    Keep,
}

/// Predicate deciding which entries are extracted; rejected entries are skipped.
#[derive(Clone)]
pub struct EntryFilter(Arc<dyn Fn(&Path) -> bool + Send + Sync>);

impl EntryFilter {
    pub fn new(predicate: impl Fn(&Path) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Accept entries whose path component at `depth` starts with one of `prefixes`.
    ///
    /// `component_prefixes(1, ["filter_"])` accepts `pack/filter_warm/lut.png`
    /// and `pack/filter_warm/`, but not `pack/` or `pack/makeup/base.png`.
    pub fn component_prefixes<I, S>(depth: usize, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
        Self::new(move |path| {
            path.components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part),
                    _ => None,
                })
                .nth(depth)
                .map(|part| part.to_string_lossy())
                .is_some_and(|part| prefixes.iter().any(|p| part.starts_with(p.as_str())))
        })
    }

    pub fn accepts(&self, path: &Path) -> bool {
        (self.0)(path)
    }
}

impl fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntryFilter(..)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Bytes copied from the asset source.
    Copy,
    /// Entries processed from the archive.
    Extract,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    pub processed: u64,
    pub total: Option<u64>,
    pub current: Option<PathBuf>,
}

impl Progress {
    /// Whole-number percentage, when the total is known.
    pub fn percentage(&self) -> Option<u8> {
        self.total.map(|total| {
            if total == 0 {
                100
            } else {
                (self.processed.min(total) * 100 / total) as u8
            }
        })
    }
}

/// Forwards progress to a callback, skipping updates that do not move the percentage.
pub struct ProgressTracker {
    stage: Stage,
    total: Option<u64>,
    callback: Option<ProgressCallback>,
    last_percentage: Option<u8>,
}

impl ProgressTracker {
    pub fn new(stage: Stage, total: Option<u64>, callback: Option<ProgressCallback>) -> Self {
        Self {
            stage,
            total,
            callback,
            last_percentage: None,
        }
    }

    pub fn update(&mut self, processed: u64, current: Option<&Path>) {
        let Some(callback) = &self.callback else {
            return;
        };

        let progress = Progress {
            stage: self.stage,
            processed,
            total: self.total,
            current: current.map(Path::to_path_buf),
        };

        if let Some(pct) = progress.percentage() {
            if self.last_percentage == Some(pct) {
                return;
            }
            self.last_percentage = Some(pct);
        }

        callback(&progress);
    }
}

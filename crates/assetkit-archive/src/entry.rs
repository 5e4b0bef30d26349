use std::path::PathBuf;

use assetkit_fs::ClearOutcome;

/// An archive entry that was written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Sanitized path relative to the extraction target.
    pub original_path: PathBuf,
    pub target_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub entry_count: usize,
    pub skipped_count: usize,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
    /// What clearing the target removed beforehand.
    pub cleared: ClearOutcome,
    pub archive_removed: bool,
}

impl ArchiveReport {
    pub fn files(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}

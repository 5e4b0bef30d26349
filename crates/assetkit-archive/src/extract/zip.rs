use std::io::{Read, Seek};

use crate::Result;
use crate::extract::{EntrySource, PendingEntry, PendingKind};

/// Yields zip entries in the order they are recorded in the archive.
pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive, index: 0 })
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn entry_count(&self) -> Option<usize> {
        Some(self.archive.len())
    }

    fn next_entry(&mut self) -> Option<Result<PendingEntry<'_>>> {
        if self.index >= self.archive.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;

        let file = match self.archive.by_index(index) {
            Ok(f) => f,
            Err(e) => return Some(Err(e.into())),
        };

        // Raw name; sanitization happens in the pipeline, not here.
        let name = file.name().to_string();
        let size = file.size();
        let kind = if file.is_dir() {
            PendingKind::Directory
        } else {
            PendingKind::File(Box::new(file))
        };

        Some(Ok(PendingEntry { name, size, kind }))
    }
}

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to copy into '{path}': {source}")]
    Copy { path: PathBuf, source: io::Error },

    #[error("stream copy failed: {0}")]
    Stream(#[source] io::Error),
}

impl Error {
    /// The underlying I/O error, whatever the operation.
    pub fn io_error(&self) -> &io::Error {
        match self {
            Self::Read { source, .. }
            | Self::Write { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Remove { source, .. }
            | Self::Copy { source, .. }
            | Self::Stream(source) => source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.io_error().kind() == io::ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, Error>;

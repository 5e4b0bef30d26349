use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("invalid entry path '{entry}'")]
    InvalidPath { entry: String },

    #[error("failed to open archive '{path}': {source}")]
    ArchiveOpen { path: PathBuf, source: io::Error },

    #[error("archive is corrupted: {reason}")]
    Corrupted { reason: String },

    #[error("failed to remove archive '{path}': {source}")]
    RemoveArchive { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Fs(#[from] assetkit_fs::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Whether the entry was refused because of where it would be written.
    pub fn is_unsafe_entry(&self) -> bool {
        matches!(self, Self::ZipSlip { .. } | Self::InvalidPath { .. })
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ArchiveOpen { source, .. } | Self::Io(source) => {
                source.kind() == io::ErrorKind::NotFound
            }
            Self::Fs(e) => e.is_not_found(),
            _ => false,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(source) => Self::Io(source),
            other => Self::Corrupted {
                reason: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

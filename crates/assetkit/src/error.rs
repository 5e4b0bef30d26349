use std::fmt;
use std::io;

use assetkit_verify::VerifyError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("asset '{asset}' not found")]
    AssetNotFound { asset: String },

    #[error("failed to open asset '{asset}': {source}")]
    AssetOpen { asset: String, source: io::Error },

    #[error(transparent)]
    Fs(#[from] assetkit_fs::Error),

    #[error(transparent)]
    Archive(#[from] assetkit_archive::Error),

    #[error(transparent)]
    Verify(#[from] VerifyError),
}

/// Coarse failure cause, stable enough to branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Io,
    UnsafeEntry,
    InvalidArchive,
    ChecksumMismatch,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::AssetNotFound { .. } => ErrorKind::NotFound,
            Self::AssetOpen { .. } => ErrorKind::Io,
            Self::Fs(e) if e.is_not_found() => ErrorKind::NotFound,
            Self::Fs(_) => ErrorKind::Io,
            Self::Archive(e) if e.is_unsafe_entry() => ErrorKind::UnsafeEntry,
            Self::Archive(e) if e.is_not_found() => ErrorKind::NotFound,
            Self::Archive(assetkit_archive::Error::Corrupted { .. }) => ErrorKind::InvalidArchive,
            Self::Archive(_) => ErrorKind::Io,
            Self::Verify(VerifyError::Mismatch { .. }) => ErrorKind::ChecksumMismatch,
            Self::Verify(VerifyError::MalformedDigest { .. }) => ErrorKind::InvalidArgument,
            Self::Verify(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidArgument => "invalid argument",
            Self::NotFound => "not found",
            Self::Io => "i/o failure",
            Self::UnsafeEntry => "unsafe archive entry",
            Self::InvalidArchive => "invalid archive",
            Self::ChecksumMismatch => "checksum mismatch",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

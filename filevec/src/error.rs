//! I/O-aware error type for file-backed vectors

use filevec_core::{ErrorCategory, FvecError};
use std::{io, path::PathBuf};

/// Errors that can occur while opening, remapping or closing a file vector
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing file could not be opened or created
    #[error("failed to open '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The backing file's length could not be read
    #[error("failed to read metadata for '{}': {source}", path.display())]
    Metadata { path: PathBuf, source: io::Error },

    /// The backing file could not be resized
    #[error("failed to resize '{}' to {bytes} bytes: {source}", path.display())]
    Resize {
        path: PathBuf,
        bytes: u64,
        source: io::Error,
    },

    /// The operating system refused to map the file
    #[error("failed to map {bytes} bytes of '{}': {source}", path.display())]
    Map {
        path: PathBuf,
        bytes: usize,
        source: io::Error,
    },

    /// A remap failed and restoring the previous file length failed too
    #[error("{primary}; rollback to {restore_bytes} bytes also failed: {secondary}")]
    Rollback {
        primary: Box<Error>,
        restore_bytes: u64,
        secondary: io::Error,
    },

    /// Flushing or truncating the file on close failed
    #[error("failed to close '{}': {source}", path.display())]
    Close { path: PathBuf, source: io::Error },

    /// A non-I/O failure (bounds, element type, closed container)
    #[error(transparent)]
    Element(#[from] FvecError),
}

impl Error {
    /// Taxonomy class of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Open { .. } | Error::Metadata { .. } => ErrorCategory::Open,
            Error::Resize { .. } | Error::Map { .. } | Error::Rollback { .. } => {
                ErrorCategory::Mapping
            }
            Error::Close { .. } => ErrorCategory::Close,
            Error::Element(err) => err.category(),
        }
    }

    /// Whether this is a checked-access bounds failure
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::Element(FvecError::OutOfRange { .. }))
    }
}

/// Result type for file vector operations
pub type Result<T> = std::result::Result<T, Error>;

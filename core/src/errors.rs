//! Unified error types for the mapstore core crate.
//!
//! Every operation surfaces exactly one of these variants; the bridge maps
//! them to wire error codes via [`StorageError::kind`]. Errors are never
//! retried at this layer.

use thiserror::Error;

use crate::protocol::errors as codes;

/// Errors raised by storage and permission operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A required identifier argument was missing or empty.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// The host failed to open the resource (it was removed after grant).
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A low-level read/write failure from the host.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The resource does not exist or cannot be accessed.
    #[error("File cannot be accessed: {0}")]
    FileAccess(String),

    /// A write was attempted without a write permission.
    #[error("No write permission: {0}")]
    InvalidFile(String),
}

impl StorageError {
    /// The wire error code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Argument(_) => codes::ARGUMENT,
            Self::FileNotFound(_) => codes::FILE_NOT_FOUND,
            Self::Io(_) => codes::IO,
            Self::FileAccess(_) => codes::FILE_ACCESS,
            Self::InvalidFile(_) => codes::INVALID_FILE,
        }
    }

    /// Classify an `std::io::Error` from an open call: a missing file is
    /// reported as [`StorageError::FileNotFound`], everything else as I/O.
    pub fn from_open(err: std::io::Error, what: &str) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(format!("{what}: {err}"))
        } else {
            Self::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StorageError::Argument("uriString".into());
        assert_eq!(err.to_string(), "Invalid argument: uriString");

        let err = StorageError::FileAccess("doc://missing".into());
        assert_eq!(err.to_string(), "File cannot be accessed: doc://missing");

        let err = StorageError::InvalidFile("doc://map.bin".into());
        assert_eq!(err.to_string(), "No write permission: doc://map.bin");
    }

    #[test]
    fn kind_maps_to_wire_codes() {
        assert_eq!(
            StorageError::Argument(String::new()).kind(),
            "ArgumentException"
        );
        assert_eq!(
            StorageError::FileNotFound(String::new()).kind(),
            "FileNotFoundException"
        );
        assert_eq!(
            StorageError::Io(std::io::Error::other("boom")).kind(),
            "IOException"
        );
        assert_eq!(
            StorageError::FileAccess(String::new()).kind(),
            "FileAccessException"
        );
        assert_eq!(
            StorageError::InvalidFile(String::new()).kind(),
            "InvalidFileException"
        );
    }

    #[test]
    fn from_open_distinguishes_missing_files() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StorageError::from_open(missing, "doc://a"),
            StorageError::FileNotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        assert!(matches!(
            StorageError::from_open(denied, "doc://a"),
            StorageError::Io(_)
        ));
    }
}

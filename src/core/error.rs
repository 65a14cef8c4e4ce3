//! Error types for the logging library

use std::fmt;
use std::path::Path;

pub type Result<T> = std::result::Result<T, LogError>;

/// Archive-engine error codes, mapped to human-readable messages.
///
/// Codes without a dedicated message fall back to [`ArchiveErrorKind::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveErrorKind {
    /// The archive already exists.
    AlreadyExists,
    /// The archive is inconsistent.
    Inconsistent,
    /// Invalid argument supplied when opening the archive.
    InvalidArgument,
    /// Error allocating memory.
    OutOfMemory,
    /// The file does not exist.
    NotFound,
    /// The file is not an archive.
    NotAnArchive,
    /// The file could not be opened.
    OpenFailed,
    /// Read error.
    ReadError,
    /// Seek error.
    SeekError,
    /// The archive could not be finalized and saved.
    Save,
    /// Unmapped error code.
    Generic,
}

impl ArchiveErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            ArchiveErrorKind::AlreadyExists => "The archive already exists.",
            ArchiveErrorKind::Inconsistent => "The archive is inconsistent.",
            ArchiveErrorKind::InvalidArgument => "Invalid argument supplied to the open method.",
            ArchiveErrorKind::OutOfMemory => "Error allocating memory.",
            ArchiveErrorKind::NotFound => "The file does not exist.",
            ArchiveErrorKind::NotAnArchive => "The file is not an archive.",
            ArchiveErrorKind::OpenFailed => "The file could not be opened.",
            ArchiveErrorKind::ReadError => "Read error.",
            ArchiveErrorKind::SeekError => "Seek error.",
            ArchiveErrorKind::Save => "Save error.",
            ArchiveErrorKind::Generic => "Generic error",
        }
    }
}

impl fmt::Display for ArchiveErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// A required directory could not be created and does not exist
    #[error("Failed creating logging directory: {path}")]
    DirectoryCreation { path: String },

    /// A file-level operation failed
    #[error("{reason}: '{path}'")]
    FileSystem { path: String, reason: String },

    /// Creating or finalizing an archive bundle failed
    #[error("Failed creating a log archive: {code}")]
    ArchiveCreation { code: ArchiveErrorKind },
}

impl LogError {
    /// Create a directory creation error
    pub fn directory_creation(path: impl AsRef<Path>) -> Self {
        LogError::DirectoryCreation {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create a file system error with a human-readable reason
    pub fn file_system(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        LogError::FileSystem {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Create an archive creation error from an engine error code
    pub fn archive(code: ArchiveErrorKind) -> Self {
        LogError::ArchiveCreation { code }
    }
}

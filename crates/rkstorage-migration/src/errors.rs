//! Migration error types.
//! One error enum covering every step of the migration procedure.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    // Discovery
    #[error("Cannot list directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    // Storage engine hook
    #[error("Storage initialization failed: {message}")]
    Initialization { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    // Copy
    #[error("Not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Copy {} -> {} failed: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Size mismatch copying {}: source reported {expected} bytes, copied {copied}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        copied: u64,
    },

    // Cleanup
    #[error("Cannot delete {}: {source}", path.display())]
    DeleteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // Config
    #[error("TOML parse error: {0}")]
    Config(#[from] toml::de::Error),

    // IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stable codes for log aggregation.
impl MigrationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DirectoryUnreadable { .. } => "DIRECTORY_UNREADABLE",
            Self::Initialization { .. } => "INITIALIZATION_FAILED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::NotAFile(_) => "NOT_A_FILE",
            Self::CopyFailed { .. } => "COPY_FAILED",
            Self::SizeMismatch { .. } => "SIZE_MISMATCH",
            Self::DeleteFailed { .. } => "DELETE_FAILED",
            Self::Config(_) => "CONFIG_PARSE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;

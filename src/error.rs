//! Error types for archive inspection, statement generation and loading.
//!
//! Archive and parse errors are fatal for the operation that raised them.
//! [`StoreError`] is recovered per statement by the loader, so a partially
//! populated store is an accepted outcome of a load.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while locating and validating an export archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("No file found at: {}", .0.display())]
    NotFound(PathBuf),

    #[error("The supplied file does not look like a valid Facebook archive ({}): {reason}", path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("HTML archives are no longer supported, please supply a JSON archive: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Confidence threshold must satisfy 0 < threshold <= 1, got {0}")]
    InvalidThreshold(f64),

    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Failures raised while decoding a single conversation file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read {entry} from archive: {source}")]
    Read {
        entry: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to read {entry}: {source}")]
    Io {
        entry: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed conversation file {entry}: {source}")]
    Json {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTML archives are no longer supported, cannot parse {0}")]
    UnsupportedFormat(String),
}

/// An insert payload referenced a column the table does not declare.
#[derive(Debug, Error)]
#[error("Attempted to insert into non-existent column '{column}' of table '{table}'")]
pub struct SchemaError {
    pub table: String,
    pub column: String,
}

/// Failures at the statement-execution boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Statement failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Statement rejected: {0}")]
    Rejected(String),
}

/// Failures that abort a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Tables must be created before population")]
    NotReady,

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Load failed: {failed}/{total} message files failed to parse")]
    TooManyFailures { failed: usize, total: usize },
}

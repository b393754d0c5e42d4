//! Unified error types for cindex.
//!
//! Backends raise these; the registry passes them through untouched.

use std::path::PathBuf;

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error type for the bundled index backends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty identifier).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A file-backed index was used before a directory was configured.
    #[error("INDEX_DIR_UNSET: no index directory configured")]
    IndexDirUnset,

    /// Index storage could not be read or created.
    #[error("INDEX_UNAVAILABLE: {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Index storage could not be written.
    #[error("INDEX_UNWRITABLE: {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored content does not parse into entries.
    #[error("INDEX_CORRUPT: {0}")]
    Corrupt(String),

    /// Database operation failed.
    #[error("INDEX_DB_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("INDEX_DB_ERROR: migration failed: {0}")]
    MigrationFailed(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => Error::from(e),
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        if is_corrupt_database(&err) {
            return Error::Corrupt(err.to_string());
        }
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

/// SQLite reports a damaged or foreign file through these codes.
fn is_corrupt_database(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, rusqlite::ErrorCode::NotADatabase | rusqlite::ErrorCode::DatabaseCorrupt)
    )
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Corrupt(err.to_string())
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::Unavailable { .. } => -32001,
            Error::Corrupt(_) => -32002,
            Error::Unwritable { .. } => -32003,
            Error::Database(_) | Error::MigrationFailed(_) => -32004,
            Error::IndexDirUnset => -32005,
        };
        let message = match err {
            Error::InvalidInput(msg) => msg,
            other => other.to_string(),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

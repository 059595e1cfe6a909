//! Error types for sqldemo-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the sqldemo-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The bundled seed database is not where the context says it is
    #[error("seed database not found at {}", path.display())]
    SeedMissing { path: PathBuf },

    /// Copying the seed into working storage failed
    #[error("failed to install seed database at {}: {source}", path.display())]
    Install {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite could not open the working copy, or it is not a database
    #[error("failed to open database {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The `email` table does not have the expected shape
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Database error while querying
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background task failed to run to completion
    #[error("task error: {0}")]
    Task(String),

    /// The owner of a background load cancelled it
    #[error("load cancelled")]
    Cancelled,
}

/// Coarse classification of an [`Error`].
///
/// Initialization errors can be retried once the cause is fixed: restore the
/// seed file, or open with [`StoreContext::reinstalling`] to replace a damaged
/// working copy. Query errors are final for that call.
///
/// [`StoreContext::reinstalling`]: crate::db::StoreContext::reinstalling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Initialization,
    Query,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SeedMissing { .. } | Error::Install { .. } | Error::Open { .. } => {
                ErrorKind::Initialization
            }
            Error::SchemaMismatch(_) | Error::Database(_) => ErrorKind::Query,
            Error::Config(_) | Error::Io(_) | Error::Task(_) | Error::Cancelled => {
                ErrorKind::Other
            }
        }
    }
}

/// Result type alias for sqldemo-core
pub type Result<T> = std::result::Result<T, Error>;

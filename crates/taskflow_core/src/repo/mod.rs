//! Persistence adapter for the task collection.
//!
//! # Responsibility
//! - Define the key-value slot contract and its SQLite/in-memory backends.
//! - Encode and decode the task collection stored under the `tasks` key.
//!
//! # Invariants
//! - Writes overwrite the whole collection; there are no partial updates.
//! - Read failures degrade to "absent" and never surface as errors.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Write-path error for key-value and task persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The collection could not be serialized.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode task collection: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

//! Error types for schoolctl-server

use thiserror::Error;

use crate::db::DbError;
use crate::models::ValidationError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Tagged outcome of every failed service call
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("School with this name already exists")]
    Conflict { name: String },

    #[error("School not found")]
    NotFound { id: i64 },

    #[error("store error: {0}")]
    Store(DbError),
}

impl ServiceError {
    /// Map a store failure, turning the unique-name index into a conflict.
    pub(crate) fn from_store(e: DbError, name: Option<&str>) -> Self {
        match e {
            DbError::UniqueViolation { .. } => Self::Conflict {
                name: name.unwrap_or_default().to_owned(),
            },
            other => Self::Store(other),
        }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        Self::from_store(e, None)
    }
}

/// Startup and IO failures outside request handling
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

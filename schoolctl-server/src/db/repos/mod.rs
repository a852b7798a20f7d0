//! Store implementations for school records
//!
//! `SchoolStore` is the seam the service depends on:
//! - `SchoolRepo`: Postgres, statements from `db::query`
//! - `MemoryStore`: explicitly constructed in-process store for tests
//!   and database-less runs

pub mod schools;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::models::{ListQuery, Paginated, SchoolChanges, SchoolDraft};

pub use memory::MemoryStore;
pub use schools::SchoolRepo;

/// School record from the store
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct School {
    pub id: i64,
    pub school_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let constraint = e
            .as_database_error()
            .filter(|db| db.is_unique_violation())
            .map(|db| db.constraint().unwrap_or("unique").to_owned());

        match constraint {
            Some(constraint) => Self::UniqueViolation { constraint },
            None => Self::Sqlx(e),
        }
    }
}

/// Persistence operations the service needs
#[async_trait]
pub trait SchoolStore: Send + Sync + 'static {
    /// Short backend name reported by `/health`
    fn backend(&self) -> &'static str;

    /// Cheap round-trip proving the store can serve requests.
    async fn ping(&self) -> Result<(), DbError>;

    /// Insert a validated draft; the store assigns id and created_at.
    async fn insert(&self, draft: &SchoolDraft) -> Result<School, DbError>;

    /// One page of matching rows (newest first) plus the total match count.
    async fn list(&self, query: &ListQuery) -> Result<Paginated<School>, DbError>;

    async fn get(&self, id: i64) -> Result<Option<School>, DbError>;

    /// Id of a row with exactly this name, ignoring `excluding`.
    async fn find_id_by_name(
        &self,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<Option<i64>, DbError>;

    /// Apply changes and refresh updated_at. `None` if the row is gone.
    async fn update(&self, id: i64, changes: &SchoolChanges) -> Result<Option<School>, DbError>;

    /// Hard delete. `false` if no row matched.
    async fn delete(&self, id: i64) -> Result<bool, DbError>;
}

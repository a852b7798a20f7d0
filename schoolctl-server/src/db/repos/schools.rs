//! School repository - Postgres
//!
//! Statements come from `db::query`; this module only runs them.
//! - list: row query + count query sharing one filter
//! - update: dynamic SET clause with RETURNING (no re-select)
//! - delete: single statement, rows_affected decides not-found

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, School, SchoolStore};
use crate::db::query;
use crate::models::{ListQuery, Paginated, SchoolChanges, SchoolDraft};

/// School repository
#[derive(Clone)]
pub struct SchoolRepo {
    pool: PgPool,
}

impl SchoolRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchoolStore for SchoolRepo {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, draft: &SchoolDraft) -> Result<School, DbError> {
        let sql = query::insert_sql();
        let school: School = sqlx::query_as(&sql)
            .bind(&draft.school_name)
            .bind(&draft.address)
            .bind(&draft.city)
            .bind(&draft.state)
            .bind(draft.contact.as_deref())
            .bind(draft.email.as_deref())
            .bind(draft.image.as_deref())
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = school.id, "school row inserted");
        Ok(school)
    }

    async fn list(&self, list: &ListQuery) -> Result<Paginated<School>, DbError> {
        let mut stmts = query::list_statements(list);

        let items: Vec<School> = stmts.rows.build_query_as().fetch_all(&self.pool).await?;
        let (total,): (i64,) = stmts.count.build_query_as().fetch_one(&self.pool).await?;

        Ok(Paginated {
            items,
            total,
            page: list.page.page,
            limit: list.page.limit,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<School>, DbError> {
        let sql = query::select_by_id_sql();
        let school = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    async fn find_id_by_name(
        &self,
        name: &str,
        excluding: Option<i64>,
    ) -> Result<Option<i64>, DbError> {
        let mut lookup = query::name_lookup(name, excluding);
        let row: Option<(i64,)> = lookup.build_query_as().fetch_optional(&self.pool).await?;
        Ok(row.map(|(id,)| id))
    }

    async fn update(&self, id: i64, changes: &SchoolChanges) -> Result<Option<School>, DbError> {
        let mut stmt = query::update_statement(id, changes);
        let school = stmt.build_query_as().fetch_optional(&self.pool).await?;
        Ok(school)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(query::DELETE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

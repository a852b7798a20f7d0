//! Schema bootstrap for the schools table
//!
//! Idempotent: every statement uses IF NOT EXISTS, so this runs on each
//! server start.

use sqlx::PgPool;

const STATEMENTS: &[(&str, &str)] = &[
    (
        "schools table",
        r#"
        CREATE TABLE IF NOT EXISTS schools (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            school_name TEXT NOT NULL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            state TEXT NOT NULL,
            contact TEXT,
            email TEXT,
            image TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ
        )
        "#,
    ),
    (
        "school name unique index",
        "CREATE UNIQUE INDEX IF NOT EXISTS schools_school_name_key ON schools (school_name)",
    ),
    (
        "created_at index",
        "CREATE INDEX IF NOT EXISTS schools_created_at_idx ON schools (created_at DESC, id DESC)",
    ),
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schools migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(step = *name, "applying migration");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!("Schools migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_uniqueness_is_enforced_by_index() {
        assert!(STATEMENTS
            .iter()
            .any(|(_, sql)| sql.contains("UNIQUE INDEX") && sql.contains("(school_name)")));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_are_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool creation failed");

        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}

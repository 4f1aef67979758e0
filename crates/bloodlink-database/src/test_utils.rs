//! Test utilities for database integration tests
//!
//! Provides a migrated in-memory SQLite database for use by the other
//! crates' tests. Each call returns a fresh, isolated database.

use crate::DbConnection;
use bloodlink_migrations::Migrator;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Create a fresh in-memory database with the full schema applied.
pub async fn setup_test_db() -> Arc<DbConnection> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory SQLite");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations on test database");

    Arc::new(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectionTrait, Statement};

    #[tokio::test]
    async fn test_setup_creates_schema() {
        let db = setup_test_db().await;

        for table in ["blood_requests", "donors", "mail"] {
            let result = db
                .query_one(Statement::from_string(
                    db.get_database_backend(),
                    format!("SELECT COUNT(*) FROM {}", table),
                ))
                .await
                .unwrap();
            assert!(result.is_some(), "table {} missing", table);
        }
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let db1 = setup_test_db().await;
        let db2 = setup_test_db().await;

        db1.execute(Statement::from_string(
            db1.get_database_backend(),
            "INSERT INTO mail (id, to_address, subject, html_body, text_body, created_at) \
             VALUES ('00000000-0000-0000-0000-000000000001', 'a@x.com', 's', 'h', 't', CURRENT_TIMESTAMP)"
                .to_owned(),
        ))
        .await
        .unwrap();

        let count = db2
            .query_one(Statement::from_string(
                db2.get_database_backend(),
                "SELECT COUNT(*) AS n FROM mail".to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = count.try_get("", "n").unwrap();
        assert_eq!(n, 0);
    }
}

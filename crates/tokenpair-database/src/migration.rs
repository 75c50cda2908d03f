//! Database migration runner.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use tokenpair_core::error::{AppError, ErrorKind};

/// Table every session store operation reads and writes.
pub const SESSIONS_TABLE: &str = "sessions";

/// Migrations embedded from the repository's `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Run all pending migrations, then check the sessions table is present.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Running session store migrations..."
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    let table: Option<String> = sqlx::query_scalar("SELECT to_regclass($1)::text")
        .bind(SESSIONS_TABLE)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to inspect schema", e)
        })?;

    if table.is_none() {
        return Err(AppError::database(format!(
            "Migrations completed but table '{SESSIONS_TABLE}' is missing"
        )));
    }

    info!(table = SESSIONS_TABLE, "Session store migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_migration_is_embedded() {
        assert!(
            MIGRATOR
                .iter()
                .any(|m| m.description.contains(SESSIONS_TABLE))
        );
    }

    #[test]
    fn test_migrations_are_ordered() {
        let versions: Vec<i64> = MIGRATOR.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(versions, sorted);
    }
}

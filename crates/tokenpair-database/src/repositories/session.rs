//! PostgreSQL session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use tokenpair_core::error::{AppError, ErrorKind};
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::{SessionStore, SessionTransaction};
use tokenpair_core::types::SessionRecord;

/// Session store over the `sessions` table.
#[derive(Debug, Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Create a new session store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        let tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })?;
        Ok(Box::new(PgSessionTransaction { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}

/// Open transaction on the `sessions` table.
///
/// `get_digest` takes a row lock (`FOR UPDATE`), so two rotations of the same
/// session serialize and the second one reads the digest the first committed.
#[derive(Debug)]
pub struct PgSessionTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SessionTransaction for PgSessionTransaction {
    async fn get_digest(&mut self, session_id: &str) -> AppResult<String> {
        let digest: Option<String> = sqlx::query_scalar(
            "SELECT token_digest FROM sessions WHERE session_id = $1 FOR UPDATE",
        )
        .bind(session_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read session digest", e)
        })?;

        digest.ok_or_else(|| AppError::not_found(format!("Session '{session_id}' not found")))
    }

    async fn insert(&mut self, record: &SessionRecord) -> AppResult<()> {
        let result = sqlx::query(
            "INSERT INTO sessions (session_id, client_id, token_digest, expires_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (session_id) DO NOTHING",
        )
        .bind(&record.session_id)
        .bind(&record.client_id)
        .bind(&record.token_digest)
        .bind(record.expires_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "Session '{}' already exists",
                record.session_id
            )));
        }
        Ok(())
    }

    async fn update_digest(
        &mut self,
        session_id: &str,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE sessions SET token_digest = $2, expires_at = $3 WHERE session_id = $1",
        )
        .bind(session_id)
        .bind(digest)
        .bind(expires_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update session digest", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Session '{session_id}' not found"
            )));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
        })
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.tx.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to roll back transaction", e)
        })
    }
}

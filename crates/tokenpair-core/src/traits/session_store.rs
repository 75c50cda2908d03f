//! Transactional session storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::SessionRecord;

/// A store of session rows reachable through caller-managed transactions.
///
/// Every read and write of a session happens inside a [`SessionTransaction`],
/// so a read-check-write sequence on one session is atomic with respect to
/// concurrent sequences on the same session.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Opens a new transaction.
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>>;

    /// Checks that the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// An open transaction against a [`SessionStore`].
///
/// Dropping a transaction without calling [`commit`](Self::commit) discards
/// every write made through it.
#[async_trait]
pub trait SessionTransaction: Send {
    /// Returns the stored digest for a session, locking the row for the
    /// rest of the transaction.
    ///
    /// Fails with `ErrorKind::NotFound` when no row exists.
    async fn get_digest(&mut self, session_id: &str) -> AppResult<String>;

    /// Inserts a new session row.
    ///
    /// Fails with `ErrorKind::Conflict` when the session id already exists.
    async fn insert(&mut self, record: &SessionRecord) -> AppResult<()>;

    /// Replaces the digest and expiry of an existing session.
    ///
    /// Fails with `ErrorKind::NotFound` when the row no longer exists.
    async fn update_digest(
        &mut self,
        session_id: &str,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Makes every write of this transaction durable.
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// Discards every write of this transaction.
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

//! In-memory session store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as SessionLock, OwnedMutexGuard};
use tracing::debug;

use tokenpair_core::error::AppError;
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::{SessionStore, SessionTransaction};
use tokenpair_core::types::SessionRecord;

type SessionMap = HashMap<String, SessionRecord>;

#[derive(Debug, Default)]
struct Shared {
    rows: Mutex<SessionMap>,
    locks: Mutex<HashMap<String, Arc<SessionLock<()>>>>,
}

impl Shared {
    fn rows(&self) -> MutexGuard<'_, SessionMap> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session_lock(&self, session_id: &str) -> Arc<SessionLock<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(session_id.to_string()).or_default())
    }
}

/// Session store held in process memory.
///
/// A transaction locks each session it touches until it is committed or
/// dropped. Transactions on the same session run one at a time; those on
/// different sessions do not wait for each other. Lock entries are never
/// pruned, so the store suits tests and development setups only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    shared: Arc<Shared>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a committed session row, if any.
    pub async fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.shared.rows().get(session_id).cloned()
    }

    /// Number of committed sessions.
    pub async fn len(&self) -> usize {
        self.shared.rows().len()
    }

    /// Whether no session has been committed yet.
    pub async fn is_empty(&self) -> bool {
        self.shared.rows().is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn begin(&self) -> AppResult<Box<dyn SessionTransaction>> {
        Ok(Box::new(MemorySessionTransaction {
            shared: Arc::clone(&self.shared),
            held: HashMap::new(),
            staged: HashMap::new(),
        }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Transaction over a [`MemorySessionStore`].
///
/// Writes are staged and only reach the shared map on commit.
#[derive(Debug)]
pub struct MemorySessionTransaction {
    shared: Arc<Shared>,
    held: HashMap<String, OwnedMutexGuard<()>>,
    staged: SessionMap,
}

impl MemorySessionTransaction {
    /// Takes the session's lock unless this transaction already holds it.
    async fn acquire(&mut self, session_id: &str) {
        if self.held.contains_key(session_id) {
            return;
        }
        let guard = self.shared.session_lock(session_id).lock_owned().await;
        self.held.insert(session_id.to_string(), guard);
    }

    async fn lookup(&mut self, session_id: &str) -> Option<SessionRecord> {
        self.acquire(session_id).await;
        match self.staged.get(session_id) {
            Some(record) => Some(record.clone()),
            None => self.shared.rows().get(session_id).cloned(),
        }
    }
}

#[async_trait]
impl SessionTransaction for MemorySessionTransaction {
    async fn get_digest(&mut self, session_id: &str) -> AppResult<String> {
        self.lookup(session_id)
            .await
            .map(|record| record.token_digest)
            .ok_or_else(|| AppError::not_found(format!("Session '{session_id}' not found")))
    }

    async fn insert(&mut self, record: &SessionRecord) -> AppResult<()> {
        if self.lookup(&record.session_id).await.is_some() {
            return Err(AppError::conflict(format!(
                "Session '{}' already exists",
                record.session_id
            )));
        }
        self.staged
            .insert(record.session_id.clone(), record.clone());
        Ok(())
    }

    async fn update_digest(
        &mut self,
        session_id: &str,
        digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut record = self
            .lookup(session_id)
            .await
            .ok_or_else(|| AppError::not_found(format!("Session '{session_id}' not found")))?;

        record.token_digest = digest.to_string();
        record.expires_at = expires_at;
        self.staged.insert(session_id.to_string(), record);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemorySessionTransaction {
            shared,
            held,
            staged,
        } = *self;
        debug!(writes = staged.len(), "Committing in-memory session transaction");
        shared.rows().extend(staged);
        drop(held);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

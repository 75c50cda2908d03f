//! Session store selection.

use std::sync::Arc;

use tracing::info;

use tokenpair_core::config::DatabaseConfig;
use tokenpair_core::error::AppError;
use tokenpair_core::result::AppResult;
use tokenpair_core::traits::SessionStore;

use crate::connection::DatabasePool;
use crate::memory::MemorySessionStore;
use crate::migration::run_migrations;
use crate::repositories::session::PgSessionStore;

/// Build the session store named by `config.provider`.
pub async fn build_session_store(config: &DatabaseConfig) -> AppResult<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.provider.as_str() {
        "postgres" => {
            info!("Initializing PostgreSQL session store");
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(db.pool()).await?;
            }
            Arc::new(PgSessionStore::new(db.pool().clone()))
        }
        "memory" => {
            info!("Initializing in-memory session store");
            Arc::new(MemorySessionStore::new())
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown session store provider: '{other}'. Supported: postgres, memory"
            )));
        }
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use tokenpair_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_memory_provider() {
        let config = DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        };
        let store = build_session_store(&config).await.unwrap();
        assert!(store.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = DatabaseConfig {
            provider: "sqlite".to_string(),
            ..DatabaseConfig::default()
        };
        let err = build_session_store(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}

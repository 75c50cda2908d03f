//! Session lifecycle manager: issue and rotate flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tokenpair_core::config::{AuthConfig, NotifyConfig};
use tokenpair_core::error::{AppError, ErrorKind};
use tokenpair_core::traits::{SessionStore, WarningNotifier};
use tokenpair_core::types::{SecurityWarning, SessionRecord};

use crate::error::TokenError;
use crate::hasher::RefreshTokenHasher;
use crate::signer::AccessTokenSigner;
use crate::token::{AccessToken, RefreshToken, TokenPair, codec};

use super::rejection::RotationRejection;

/// A freshly minted pair together with the decoded refresh token it carries.
struct MintedPair {
    pair: TokenPair,
    refresh: RefreshToken,
}

/// Issues new sessions and rotates their token pairs.
#[derive(Clone)]
pub struct SessionManager {
    /// Access-token signer.
    signer: Arc<AccessTokenSigner>,
    /// Refresh-token digest function.
    hasher: Arc<RefreshTokenHasher>,
    /// Transactional session persistence.
    store: Arc<dyn SessionStore>,
    /// Hijack warning channel.
    notifier: Arc<dyn WarningNotifier>,
    /// Access token lifetime.
    access_ttl: chrono::Duration,
    /// Refresh token lifetime.
    refresh_ttl: chrono::Duration,
    /// Sender placed on warnings.
    warning_from: String,
    /// Recipient placed on warnings.
    warning_to: String,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("store", &self.store)
            .field("notifier", &self.notifier)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    ///
    /// Fails when a configured token lifetime does not fit a duration.
    pub fn new(
        signer: Arc<AccessTokenSigner>,
        hasher: Arc<RefreshTokenHasher>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn WarningNotifier>,
        auth_config: &AuthConfig,
        notify_config: &NotifyConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            signer,
            hasher,
            store,
            notifier,
            access_ttl: auth_config.access_ttl()?,
            refresh_ttl: auth_config.refresh_ttl()?,
            warning_from: notify_config.from.clone(),
            warning_to: notify_config.to.clone(),
        })
    }

    /// Returns the session store this manager writes to.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Opens a new session for `client_id` and returns its first pair.
    ///
    /// Nothing is persisted unless the whole flow succeeds. If the caller
    /// fails to deliver the returned pair, the session row stays behind
    /// unused; no cleanup happens for it.
    pub async fn issue(&self, client_id: &str, origin: &str) -> Result<TokenPair, AppError> {
        let session_id = Uuid::new_v4().to_string();
        let minted = self.mint(&session_id, origin)?;
        let digest = self.digest(&minted.refresh, client_id).await?;

        let record = SessionRecord::new(
            &session_id,
            client_id,
            digest,
            minted.refresh.expires_at(),
        );

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.store.begin().await?;
        tx.insert(&record).await?;
        tx.commit().await?;

        info!(
            session_id = %session_id,
            client_id = %client_id,
            "Issued new token pair"
        );

        Ok(minted.pair)
    }

    /// Rotates a pair received as a raw request body.
    pub async fn rotate_body(
        &self,
        client_id: &str,
        origin: &str,
        body: &[u8],
    ) -> Result<TokenPair, AppError> {
        let pair = match TokenPair::from_slice(body) {
            Ok(pair) => pair,
            Err(e) => {
                info!(reason = %e, "Refresh request carried no token pair");
                return Err(RotationRejection::MalformedPair(e).into_app_error());
            }
        };

        self.rotate(client_id, origin, &pair).await
    }

    /// Exchanges a valid pair for a new one, logging the exact cause of
    /// any rejection before generalizing it.
    pub async fn rotate(
        &self,
        client_id: &str,
        origin: &str,
        pair: &TokenPair,
    ) -> Result<TokenPair, AppError> {
        self.try_rotate(client_id, origin, pair)
            .await
            .map_err(|rejection| {
                rejection.log(pair.access_token.session_id());
                rejection.into_app_error()
            })
    }

    /// Exchanges a valid pair for a new one.
    ///
    /// Gates run in order and the first failure short-circuits. On success
    /// the session's stored digest is replaced, so the presented refresh
    /// token can never be used again.
    pub async fn try_rotate(
        &self,
        client_id: &str,
        origin: &str,
        pair: &TokenPair,
    ) -> Result<TokenPair, RotationRejection> {
        let refresh = codec::decode(&pair.refresh_token).map_err(RotationRejection::MalformedToken)?;

        if refresh.is_expired_at(Utc::now()) {
            return Err(RotationRejection::Expired(refresh.expires_at()));
        }

        let access = &pair.access_token;
        let session_id = access.session_id();

        // Monitor only: roaming clients legitimately change address.
        if refresh.is_from_other_address(origin) {
            self.warn_address_change(session_id, &refresh.payload.source_address, origin);
        }

        if !self.signer.verify_embedded(access) {
            return Err(RotationRejection::SignatureMismatch);
        }

        if refresh.payload.access_token_signature != access.signature {
            return Err(RotationRejection::BindingMismatch);
        }

        let mut tx = self.store.begin().await.map_err(RotationRejection::Storage)?;

        let stored_digest = match tx.get_digest(session_id).await {
            Ok(digest) => digest,
            Err(e) if e.is(ErrorKind::NotFound) => {
                return Err(RotationRejection::UnknownSession(session_id.to_string()));
            }
            Err(e) => return Err(RotationRejection::Storage(e)),
        };

        match self.verify_digest(&refresh, client_id, stored_digest).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(RotationRejection::DigestMismatch(
                    "digest verification failed".to_string(),
                ));
            }
            Err(e) => return Err(RotationRejection::DigestMismatch(e.to_string())),
        }

        let minted = self
            .mint(session_id, origin)
            .map_err(RotationRejection::Internal)?;
        let digest = self
            .digest(&minted.refresh, client_id)
            .await
            .map_err(RotationRejection::Internal)?;

        tx.update_digest(session_id, &digest, minted.refresh.expires_at())
            .await
            .map_err(RotationRejection::Storage)?;
        tx.commit().await.map_err(RotationRejection::Storage)?;

        info!(
            session_id = %session_id,
            client_id = %client_id,
            "Rotated token pair"
        );

        Ok(minted.pair)
    }

    /// Builds and signs a fresh pair for `session_id`.
    fn mint(&self, session_id: &str, origin: &str) -> Result<MintedPair, TokenError> {
        let now = Utc::now();
        let access_expires_at = now
            .checked_add_signed(self.access_ttl)
            .ok_or(TokenError::InvalidInput("access token expiry out of range"))?;
        let refresh_expires_at = now
            .checked_add_signed(self.refresh_ttl)
            .ok_or(TokenError::InvalidInput("refresh token expiry out of range"))?;

        let mut access = AccessToken::new(access_expires_at, session_id);
        self.signer.sign_and_embed(&mut access)?;

        let refresh = RefreshToken::new(access.signature.clone(), refresh_expires_at, origin);
        let pair = TokenPair::new(access, &refresh)?;

        debug!(session_id, expires_at = %refresh.expires_at(), "Minted token pair");

        Ok(MintedPair { pair, refresh })
    }

    /// Runs the slow hash off the async executor.
    async fn digest(&self, refresh: &RefreshToken, client_id: &str) -> Result<String, TokenError> {
        let hasher = Arc::clone(&self.hasher);
        let refresh = refresh.clone();
        let client_id = client_id.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&refresh, &client_id))
            .await
            .map_err(|e| TokenError::Hash(format!("hashing task failed: {e}")))?
    }

    async fn verify_digest(
        &self,
        refresh: &RefreshToken,
        client_id: &str,
        stored_digest: String,
    ) -> Result<bool, TokenError> {
        let hasher = Arc::clone(&self.hasher);
        let refresh = refresh.clone();
        let client_id = client_id.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&refresh, &client_id, &stored_digest))
            .await
            .map_err(|e| TokenError::Hash(format!("verification task failed: {e}")))?
    }

    /// Fires a hijack warning without waiting for delivery.
    fn warn_address_change(&self, session_id: &str, previous: &str, current: &str) {
        warn!(
            session_id,
            previous_address = %previous,
            current_address = %current,
            "Refresh requested from a different address"
        );

        let warning = SecurityWarning {
            from: self.warning_from.clone(),
            to: self.warning_to.clone(),
            session_id: session_id.to_string(),
            previous_address: previous.to_string(),
            current_address: current.to_string(),
        };
        let notifier = Arc::clone(&self.notifier);

        tokio::spawn(async move {
            if let Err(e) = notifier.send_warning(&warning).await {
                warn!(
                    session_id = %warning.session_id,
                    error = %e,
                    "Failed to deliver address change warning"
                );
            }
        });
    }
}

//! Cached session state machine.
//!
//! `SessionCache` owns at most one session and an availability flag.
//! All state lives behind a single mutex that is held across both the
//! renewal decision and the resulting network call, so concurrent
//! callers never issue duplicate renewals and never observe a session
//! with a new expiry but an old token.

use crate::{
    bootstrap::Bootstrapper,
    config::VaultConfig,
    error::VaultError,
    policy::{self, LeaseAction},
    transport::SecretStore,
};
use std::{sync::Arc, time::Instant};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// A cached authenticated session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Session token used for store operations
    pub token: String,
    /// Absolute time after which the token is unusable
    pub expires_at: Instant,
    /// Whether the lease can still be extended in place. Once flipped to
    /// false by a rejected renewal it stays false for this session.
    pub renewable: bool,
}

impl Session {
    /// Create a session.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: Instant, renewable: bool) -> Self {
        Self {
            token: token.into(),
            expires_at,
            renewable,
        }
    }

    /// Whether the session carries a usable token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}

struct CacheState {
    session: Option<Session>,
    /// Sticky after a failed bootstrap; no network calls are made while
    /// set, until `reinitialize` clears it.
    unavailable: bool,
}

/// Holds the single cached session and mediates access to it.
pub struct SessionCache {
    store: Arc<dyn SecretStore>,
    bootstrapper: Bootstrapper,
    config: VaultConfig,
    state: Mutex<CacheState>,
}

impl SessionCache {
    /// Create an empty cache over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>, config: VaultConfig) -> Self {
        let bootstrapper = Bootstrapper::new(Arc::clone(&store), config.clone());
        Self {
            store,
            bootstrapper,
            config,
            state: Mutex::new(CacheState {
                session: None,
                unavailable: false,
            }),
        }
    }

    /// Return a usable session token, bootstrapping or renewing as needed.
    ///
    /// Returns `None` when the store is currently considered unavailable.
    /// Renewal and bootstrap failures are classified and absorbed here;
    /// they never propagate to the caller.
    pub async fn get_session(&self) -> Option<String> {
        let mut state = self.state.lock().await;

        if state.unavailable {
            debug!("secret store marked unavailable, skipping request");
            return None;
        }

        match policy::decide(
            state.session.as_ref(),
            Instant::now(),
            self.config.renewal_threshold,
        ) {
            LeaseAction::UseCached => state.session.as_ref().map(|s| s.token.clone()),
            LeaseAction::Renew => self.renew(&mut state).await,
            LeaseAction::Rebootstrap => self.rebootstrap(&mut state).await,
        }
    }

    /// Clear the unavailable flag and drop any cached session so the next
    /// call performs a fresh bootstrap. This is the only way out of the
    /// unavailable state.
    pub async fn reinitialize(&self) {
        let mut state = self.state.lock().await;
        state.session = None;
        state.unavailable = false;
        info!("session cache reinitialized");
    }

    async fn renew(&self, state: &mut CacheState) -> Option<String> {
        // decide() only returns Renew for an existing, still-valid session.
        let session = state.session.as_mut()?;

        match self.store.renew_self(&session.token).await {
            Ok(renewal) => {
                session.expires_at = Instant::now() + renewal.lease_duration;
                session.renewable = renewal.renewable;
                info!(
                    ttl_secs = renewal.lease_duration.as_secs(),
                    "renewed session lease"
                );
            }
            Err(VaultError::RenewalRejected(reason)) => {
                // The session itself is still valid until expires_at;
                // just stop trying to extend it.
                session.renewable = false;
                warn!(%reason, "renewal rejected, session no longer renewable");
            }
            Err(e) => {
                // Transient failure: leave the session untouched and retry
                // renewal on the next call.
                warn!(error = %e, "renewal failed, will retry");
            }
        }

        Some(session.token.clone())
    }

    async fn rebootstrap(&self, state: &mut CacheState) -> Option<String> {
        match self.bootstrapper.bootstrap().await {
            Ok(session) => {
                let token = session.token.clone();
                state.session = Some(session);
                state.unavailable = false;
                Some(token)
            }
            Err(e) => {
                error!(error = %e, "bootstrap failed, marking store unavailable");
                state.session = None;
                state.unavailable = true;
                None
            }
        }
    }
}

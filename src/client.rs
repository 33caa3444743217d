//! Public secret read/write surface.
//!
//! `SecretClient` validates inputs locally, obtains a session from the
//! cache, and maps store-side failures into the narrow set of outcomes
//! callers are allowed to see. On the retrieve path every operational
//! failure collapses to `Unavailable` so end users cannot distinguish
//! "secret missing" from "store unreachable"; the classified cause is
//! logged before the collapse.

use crate::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
    session::SessionCache,
    transport::{HttpSecretStore, SecretStore},
};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// The single named field application secrets are written under.
const SECRET_FIELD: &str = "api_key";

/// Client for storing and retrieving application secrets.
pub struct SecretClient {
    store: Arc<dyn SecretStore>,
    cache: SessionCache,
}

impl SecretClient {
    /// Create a client backed by the Vault HTTP API.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        let store: Arc<dyn SecretStore> = Arc::new(HttpSecretStore::new(&config)?);
        Ok(Self::with_store(store, config))
    }

    /// Create a client over any [`SecretStore`] implementation.
    #[must_use]
    pub fn with_store(store: Arc<dyn SecretStore>, config: VaultConfig) -> Self {
        let cache = SessionCache::new(Arc::clone(&store), config);
        Self { store, cache }
    }

    /// Store a secret value under `path`. Returns the path on success.
    ///
    /// Empty inputs fail fast with `InvalidInput` before any I/O. With no
    /// usable session the result is `Unavailable`; a store-side failure
    /// is wrapped in `WriteFailed` carrying the cause.
    #[instrument(skip(self, value), fields(path))]
    pub async fn store(&self, path: &str, value: &str) -> VaultResult<String> {
        if path.trim().is_empty() {
            return Err(VaultError::invalid_input("path must be a non-empty string"));
        }
        if value.trim().is_empty() {
            return Err(VaultError::invalid_input("value must be a non-empty string"));
        }

        let Some(token) = self.cache.get_session().await else {
            return Err(VaultError::Unavailable);
        };

        self.store
            .write_secret(&token, path, SECRET_FIELD, value)
            .await
            .map_err(|e| {
                error!(path, error = %e, "secret write failed");
                VaultError::write_failed(path, e)
            })?;

        debug!(path, "stored secret");
        Ok(path.to_string())
    }

    /// Retrieve the secret value stored under `path`.
    ///
    /// Operational failures, including a missing field, all surface as
    /// `Unavailable`.
    #[instrument(skip(self), fields(path))]
    pub async fn retrieve(&self, path: &str) -> VaultResult<String> {
        if path.trim().is_empty() {
            return Err(VaultError::invalid_input("path must be a non-empty string"));
        }

        let Some(token) = self.cache.get_session().await else {
            return Err(VaultError::Unavailable);
        };

        let result = self
            .store
            .read_secret(&token, path)
            .await
            .and_then(|data| match data.get(SECRET_FIELD) {
                Some(serde_json::Value::String(value)) => Ok(value.clone()),
                _ => Err(VaultError::not_found(path)),
            });

        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                // Distinguish the cause for operators, not for callers.
                error!(path, error = %e, retryable = e.is_retryable(), "secret retrieval failed");
                Err(VaultError::Unavailable)
            }
        }
    }

    /// Drop the cached session and clear the sticky unavailable state so
    /// the next request performs a fresh bootstrap.
    pub async fn reinitialize(&self) {
        self.cache.reinitialize().await;
    }
}

//! Outbound secret-store operations.
//!
//! `SecretStore` is the seam between the lifecycle manager and the wire;
//! `HttpSecretStore` implements it against the Vault HTTP API with reqwest.

use crate::{
    api::{AuthResponse, KvResponse, UnwrapResponse},
    config::VaultConfig,
    error::{VaultError, VaultResult},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, instrument};

/// Lease granted by a successful login.
#[derive(Debug, Clone)]
pub struct LoginLease {
    /// Session token, sent as `X-Vault-Token` on subsequent calls
    pub token: String,
    /// Validity period from issuance
    pub lease_duration: Duration,
    /// Whether the lease can be extended in place
    pub renewable: bool,
}

/// Lease returned by a successful renew-self call.
#[derive(Debug, Clone, Copy)]
pub struct LeaseRenewal {
    /// New validity period from now
    pub lease_duration: Duration,
    /// Whether further renewals are possible
    pub renewable: bool,
}

/// Outbound operations against the secret store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Unwrap a response-wrapping token into a secret id. Single use.
    async fn unwrap_secret_id(&self, wrapping_token: &SecretString)
        -> VaultResult<SecretString>;

    /// Exchange AppRole credentials for a session.
    async fn login(&self, role_id: &str, secret_id: &SecretString)
        -> VaultResult<LoginLease>;

    /// Extend the lease on the given session token.
    async fn renew_self(&self, token: &str) -> VaultResult<LeaseRenewal>;

    /// Write a single named field under `path`.
    async fn write_secret(
        &self,
        token: &str,
        path: &str,
        field: &str,
        value: &str,
    ) -> VaultResult<()>;

    /// Read the KV data object at `path`.
    async fn read_secret(
        &self,
        token: &str,
        path: &str,
    ) -> VaultResult<serde_json::Map<String, serde_json::Value>>;
}

/// Vault HTTP API implementation of [`SecretStore`].
pub struct HttpSecretStore {
    addr: String,
    mount: String,
    http: Client,
}

impl HttpSecretStore {
    /// Build an HTTP store from the client configuration.
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VaultError::Http)?;

        Ok(Self {
            addr: config.addr.trim_end_matches('/').to_string(),
            mount: config.mount.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.addr, path)
    }

    async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> VaultResult<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            Err(VaultError::not_found(path))
        } else if status.is_success() {
            Ok(response)
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(VaultError::transport(format!("status {status}: {text}")))
        }
    }
}

#[async_trait]
impl SecretStore for HttpSecretStore {
    #[instrument(skip_all)]
    async fn unwrap_secret_id(
        &self,
        wrapping_token: &SecretString,
    ) -> VaultResult<SecretString> {
        let response = self
            .http
            .post(self.url("sys/wrapping/unwrap"))
            .header("X-Vault-Token", wrapping_token.expose_secret())
            .send()
            .await
            .map_err(|e| VaultError::transport(e.to_string()))?;

        let response = Self::check_status(response, "sys/wrapping/unwrap").await?;
        let unwrapped: UnwrapResponse = response.json().await?;
        debug!("unwrapped secret id from wrapping token");
        Ok(SecretString::from(unwrapped.data.secret_id))
    }

    #[instrument(skip_all)]
    async fn login(
        &self,
        role_id: &str,
        secret_id: &SecretString,
    ) -> VaultResult<LoginLease> {
        let body = serde_json::json!({
            "role_id": role_id,
            "secret_id": secret_id.expose_secret(),
        });

        let response = self
            .http
            .post(self.url("auth/approle/login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| VaultError::transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(VaultError::auth_rejected(format!("status {status}: {text}")));
        }
        let response = Self::check_status(response, "auth/approle/login").await?;

        let auth: AuthResponse = response.json().await?;
        Ok(LoginLease {
            token: auth.auth.client_token,
            lease_duration: Duration::from_secs(auth.auth.lease_duration),
            renewable: auth.auth.renewable,
        })
    }

    #[instrument(skip_all)]
    async fn renew_self(&self, token: &str) -> VaultResult<LeaseRenewal> {
        let response = self
            .http
            .post(self.url("auth/token/renew-self"))
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| VaultError::transport(e.to_string()))?;

        let status = response.status();
        // An explicit 4xx means the store refused the renewal (e.g. max TTL
        // reached). Anything ambiguous stays a retryable transport failure.
        if status == StatusCode::BAD_REQUEST || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(VaultError::renewal_rejected(format!(
                "status {status}: {text}"
            )));
        }
        let response = Self::check_status(response, "auth/token/renew-self").await?;

        let auth: AuthResponse = response.json().await?;
        Ok(LeaseRenewal {
            lease_duration: Duration::from_secs(auth.auth.lease_duration),
            renewable: auth.auth.renewable,
        })
    }

    #[instrument(skip(self, token, value), fields(path))]
    async fn write_secret(
        &self,
        token: &str,
        path: &str,
        field: &str,
        value: &str,
    ) -> VaultResult<()> {
        let kv_path = format!("{}/data/{}", self.mount, path);
        let mut data = serde_json::Map::new();
        data.insert(field.to_string(), serde_json::Value::String(value.to_string()));
        let body = serde_json::json!({ "data": data });

        let response = self
            .http
            .post(self.url(&kv_path))
            .header("X-Vault-Token", token)
            .json(&body)
            .send()
            .await
            .map_err(|e| VaultError::transport(e.to_string()))?;

        Self::check_status(response, path).await?;
        Ok(())
    }

    #[instrument(skip(self, token), fields(path))]
    async fn read_secret(
        &self,
        token: &str,
        path: &str,
    ) -> VaultResult<serde_json::Map<String, serde_json::Value>> {
        let kv_path = format!("{}/data/{}", self.mount, path);

        let response = self
            .http
            .get(self.url(&kv_path))
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| VaultError::transport(e.to_string()))?;

        let response = Self::check_status(response, path).await?;
        let kv: KvResponse = response.json().await?;
        Ok(kv.data.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = VaultConfig::new("http://127.0.0.1:8200/");
        let store = HttpSecretStore::new(&config).expect("client builds");
        assert_eq!(
            store.url("auth/approle/login"),
            "http://127.0.0.1:8200/v1/auth/approle/login"
        );
    }
}

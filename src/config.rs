//! Client configuration.

use secrecy::SecretString;
use std::time::Duration;

/// Session client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Secret store address
    pub addr: String,
    /// Path to the provisioned AppRole role-id file
    pub role_id_path: String,
    /// Fallback path to the secret-id file
    pub secret_id_path: String,
    /// Optional response-wrapping token that unwraps to a secret id;
    /// tried before the secret-id file
    pub wrapped_secret_id: Option<SecretString>,
    /// KV v2 mount the application secrets live under
    pub mount: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Remaining lease time at or below which renewal is attempted
    pub renewal_threshold: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            addr: std::env::var("VAULT_ADDR")
                .unwrap_or_else(|_| "https://vault.vault.svc:8200".to_string()),
            role_id_path: "/etc/vault/role-id".to_string(),
            secret_id_path: "/etc/vault/secret-id".to_string(),
            wrapped_secret_id: std::env::var("VAULT_WRAPPED_SECRET_ID")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            mount: "secret".to_string(),
            timeout: Duration::from_secs(30),
            renewal_threshold: Duration::from_secs(900),
        }
    }
}

impl VaultConfig {
    /// Create a new configuration for the given store address.
    #[must_use]
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set the role-id file path.
    #[must_use]
    pub fn with_role_id_path(mut self, path: impl Into<String>) -> Self {
        self.role_id_path = path.into();
        self
    }

    /// Set the secret-id file path.
    #[must_use]
    pub fn with_secret_id_path(mut self, path: impl Into<String>) -> Self {
        self.secret_id_path = path.into();
        self
    }

    /// Set the wrapped secret-id token.
    #[must_use]
    pub fn with_wrapped_secret_id(mut self, token: impl Into<String>) -> Self {
        self.wrapped_secret_id = Some(SecretString::from(token.into()));
        self
    }

    /// Set the KV mount.
    #[must_use]
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the renewal threshold (clamped to 60s-3600s).
    #[must_use]
    pub fn with_renewal_threshold(mut self, threshold: Duration) -> Self {
        self.renewal_threshold = threshold.clamp(
            Duration::from_secs(60),
            Duration::from_secs(3600),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.mount, "secret");
        assert_eq!(config.renewal_threshold, Duration::from_secs(900));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_renewal_threshold_clamping() {
        let config =
            VaultConfig::default().with_renewal_threshold(Duration::from_secs(10));
        assert_eq!(config.renewal_threshold, Duration::from_secs(60));

        let config =
            VaultConfig::default().with_renewal_threshold(Duration::from_secs(7200));
        assert_eq!(config.renewal_threshold, Duration::from_secs(3600));
    }

    #[test]
    fn test_builder() {
        let config = VaultConfig::new("http://127.0.0.1:8200")
            .with_role_id_path("/tmp/role-id")
            .with_mount("apps");
        assert_eq!(config.addr, "http://127.0.0.1:8200");
        assert_eq!(config.role_id_path, "/tmp/role-id");
        assert_eq!(config.mount, "apps");
    }

    #[test]
    fn test_wrapped_secret_id_builder() {
        let config = VaultConfig::default().with_wrapped_secret_id("s.wrapped");
        assert!(config.wrapped_secret_id.is_some());
    }

    #[test]
    fn test_wrapped_secret_id_not_exposed_in_debug() {
        let config = VaultConfig::default().with_wrapped_secret_id("s.very-secret");
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("s.very-secret"));
    }
}

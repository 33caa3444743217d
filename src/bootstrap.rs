//! AppRole bootstrap.
//!
//! Exchanges the provisioned role id and a secret id for a session. The
//! secret id comes from one of two channels, tried in order: a
//! response-wrapping token (unwrapped once), then the secret-id file.

use crate::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
    session::Session,
    transport::SecretStore,
};
use secrecy::SecretString;
use std::{sync::Arc, time::Instant};
use tracing::{info, instrument, warn};

/// Performs the credential bootstrap against the secret store.
pub struct Bootstrapper {
    store: Arc<dyn SecretStore>,
    config: VaultConfig,
}

impl Bootstrapper {
    /// Create a bootstrapper over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn SecretStore>, config: VaultConfig) -> Self {
        Self { store, config }
    }

    /// Run the full bootstrap: gather materials, log in, build a session.
    ///
    /// Every failure is returned as a classified [`VaultError`]; the
    /// caller decides whether to mark the client unavailable. The secret
    /// id is not retained past the login call.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) -> VaultResult<Session> {
        let role_id = read_identity_file(&self.config.role_id_path).await?;
        let secret_id = self.obtain_secret_id().await?;

        let lease = self.store.login(&role_id, &secret_id).await?;
        if lease.token.is_empty() {
            return Err(VaultError::auth_rejected(
                "login response carried no client token",
            ));
        }

        info!(
            ttl_secs = lease.lease_duration.as_secs(),
            renewable = lease.renewable,
            "authenticated with secret store"
        );
        Ok(Session::new(
            lease.token,
            Instant::now() + lease.lease_duration,
            lease.renewable,
        ))
    }

    /// Try the wrapping-token channel first, then the secret-id file.
    ///
    /// A failed unwrap is recorded and falls through to the file; if the
    /// file also yields nothing, the error names both channels and why
    /// each failed. No login call is made in that case.
    async fn obtain_secret_id(&self) -> VaultResult<SecretString> {
        let wrap_failure = match &self.config.wrapped_secret_id {
            Some(token) => match self.store.unwrap_secret_id(token).await {
                Ok(secret_id) => return Ok(secret_id),
                Err(e) => {
                    warn!(error = %e, "unwrap of wrapped secret id failed, falling back to file");
                    Some(e.to_string())
                }
            },
            None => None,
        };

        match read_identity_file(&self.config.secret_id_path).await {
            Ok(secret_id) => Ok(SecretString::from(secret_id)),
            Err(file_failure) => {
                let wrap_reason = wrap_failure
                    .unwrap_or_else(|| "no wrapping token configured".to_string());
                Err(VaultError::missing_credential(format!(
                    "no secret id available (wrapping token: {wrap_reason}; file: {file_failure})"
                )))
            }
        }
    }
}

/// Read and trim a credential file, failing on absence or empty content.
async fn read_identity_file(path: &str) -> VaultResult<String> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| VaultError::missing_credential(format!("{path}: {e}")))?;

    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Err(VaultError::missing_credential(format!("{path}: file is empty")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_identity_file_trims_whitespace() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "  role-id-123  ").expect("write");

        let path = file.path().to_string_lossy().to_string();
        let value = read_identity_file(&path).await.expect("readable");
        assert_eq!(value, "role-id-123");
    }

    #[tokio::test]
    async fn test_read_identity_file_rejects_empty() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "   ").expect("write");

        let path = file.path().to_string_lossy().to_string();
        let err = read_identity_file(&path).await.expect_err("empty file");
        assert!(matches!(err, VaultError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_read_identity_file_rejects_missing() {
        let err = read_identity_file("/nonexistent/role-id")
            .await
            .expect_err("missing file");
        assert!(matches!(err, VaultError::MissingCredential(_)));
    }
}

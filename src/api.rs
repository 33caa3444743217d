//! Wire types for the Vault HTTP API.

use serde::Deserialize;

/// AppRole login / token renew-self response envelope.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub auth: AuthData,
}

/// The `auth` block of a login or renew response. `lease_duration` and
/// `renewable` drive the entire renewal state machine and are required.
#[derive(Debug, Deserialize)]
pub struct AuthData {
    #[serde(default)]
    pub client_token: String,
    pub lease_duration: u64,
    pub renewable: bool,
}

/// `sys/wrapping/unwrap` response carrying the secret id.
#[derive(Debug, Deserialize)]
pub struct UnwrapResponse {
    pub data: UnwrapData,
}

#[derive(Debug, Deserialize)]
pub struct UnwrapData {
    pub secret_id: String,
}

/// KV v2 read response envelope.
#[derive(Debug, Deserialize)]
pub struct KvResponse {
    pub data: KvData,
}

#[derive(Debug, Deserialize)]
pub struct KvData {
    pub data: serde_json::Map<String, serde_json::Value>,
}

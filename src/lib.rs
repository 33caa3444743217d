//! Lease-aware Vault client for application secrets.
//!
//! Provides a narrow `store`/`retrieve` API backed by a cached AppRole
//! session that is renewed before expiry and re-bootstrapped after it.
//! When the secret store is unreachable the client degrades to an
//! `Unavailable` outcome instead of failing the host application.

pub mod api;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod policy;
pub mod session;
pub mod transport;

pub use client::SecretClient;
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use policy::LeaseAction;
pub use session::{Session, SessionCache};
pub use transport::{HttpSecretStore, SecretStore};

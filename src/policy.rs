//! Lease renewal decision logic.
//!
//! Pure function over the cached session and the current time. The rule
//! order is load-bearing: an expired session is always re-bootstrapped,
//! never renewed in place, regardless of its renewable flag.

use crate::session::Session;
use std::time::{Duration, Instant};

/// What to do with the cached session before serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaseAction {
    /// The cached session is valid and not near expiry
    UseCached,
    /// The cached session is valid but inside the renewal threshold
    Renew,
    /// No usable session; a full login is required
    Rebootstrap,
}

/// Decide how to obtain a usable session for a request arriving at `now`.
///
/// `threshold` is the remaining lease time at or below which a renewable
/// session is renewed. The boundary is inclusive on the renew side:
/// exactly `threshold` remaining triggers a renewal.
#[must_use]
pub fn decide(session: Option<&Session>, now: Instant, threshold: Duration) -> LeaseAction {
    let Some(session) = session else {
        return LeaseAction::Rebootstrap;
    };
    if !session.is_authenticated() {
        return LeaseAction::Rebootstrap;
    }
    if now >= session.expires_at {
        return LeaseAction::Rebootstrap;
    }
    if session.renewable && session.expires_at - now <= threshold {
        return LeaseAction::Renew;
    }
    LeaseAction::UseCached
}

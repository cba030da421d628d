//! Single-use tokens embedded in forms as `form_nonce`.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::NonceError;

#[derive(Debug, Clone)]
struct IssuedNonce {
    form_id: String,
    expires_at: DateTime<Utc>,
}

/// Issues and consumes form nonces.
///
/// Tokens are hex-encoded SHA-256 digests of the secret, the form id, a
/// per-store counter and the issue time, so two tokens never collide within
/// a store.
#[derive(Debug, Clone)]
pub struct NonceStore {
    secret: String,
    ttl: TimeDelta,
    counter: u64,
    issued: BTreeMap<String, IssuedNonce>,
}

impl NonceStore {
    /// Lifetime in seconds used when none is configured.
    pub const DEFAULT_TTL_SECS: i64 = 600;

    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: TimeDelta::seconds(Self::DEFAULT_TTL_SECS),
            counter: 0,
            issued: BTreeMap::new(),
        }
    }

    /// Set the lifetime handed out by [`NonceStore::ttl`]. Non-positive
    /// values fall back to the default.
    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = if ttl > TimeDelta::zero() {
            ttl
        } else {
            warn!(ttl_secs = ttl.num_seconds(), "ignoring non-positive nonce lifetime");
            TimeDelta::seconds(Self::DEFAULT_TTL_SECS)
        };
        self
    }

    /// Configured token lifetime.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a token for `form_id`, valid for `ttl` from `now`.
    pub fn issue(&mut self, form_id: &str, now: DateTime<Utc>, ttl: TimeDelta) -> String {
        self.counter += 1;

        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b"\0");
        hasher.update(form_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.counter.to_be_bytes());
        hasher.update(now.timestamp_micros().to_be_bytes());
        let token = hex::encode(hasher.finalize());

        let expires_at = now + ttl;
        debug!(form_id, %expires_at, "issued form nonce");
        self.issued.insert(
            token.clone(),
            IssuedNonce {
                form_id: form_id.to_string(),
                expires_at,
            },
        );
        token
    }

    /// Consume `token` for `form_id`.
    ///
    /// The token is removed whether or not verification succeeds.
    pub fn verify(
        &mut self,
        form_id: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), NonceError> {
        let Some(issued) = self.issued.remove(token) else {
            warn!(form_id, "rejected unknown form nonce");
            return Err(NonceError::Unknown);
        };
        if issued.form_id != form_id {
            warn!(form_id, issued_for = %issued.form_id, "rejected form nonce for another form");
            return Err(NonceError::FormMismatch {
                form_id: form_id.to_string(),
                issued_for: issued.form_id,
            });
        }
        if now >= issued.expires_at {
            warn!(form_id, expired_at = %issued.expires_at, "rejected expired form nonce");
            return Err(NonceError::Expired {
                expired_at: issued.expires_at,
            });
        }
        Ok(())
    }

    /// Drop expired tokens, returning how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.issued.len();
        self.issued.retain(|_, issued| issued.expires_at > now);
        before - self.issued.len()
    }

    /// Number of outstanding tokens.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn token_is_hex_sha256() {
        let mut store = NonceStore::new("secret");
        let token = store.issue("login_form", at(0), TimeDelta::seconds(60));
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique_and_single_use() {
        let mut store = NonceStore::new("secret");
        let first = store.issue("login_form", at(0), TimeDelta::seconds(60));
        let second = store.issue("login_form", at(0), TimeDelta::seconds(60));
        assert_ne!(first, second);

        assert_eq!(store.verify("login_form", &first, at(1)), Ok(()));
        assert_eq!(store.verify("login_form", &first, at(2)), Err(NonceError::Unknown));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut store = NonceStore::new("secret");
        let token = store.issue("resetpasswordform", at(0), TimeDelta::seconds(60));
        let err = store.verify("resetpasswordform", &token, at(60)).unwrap_err();
        assert_eq!(err, NonceError::Expired { expired_at: at(60) });
    }

    #[test]
    fn token_is_bound_to_its_form() {
        let mut store = NonceStore::new("secret");
        let token = store.issue("login_form", at(0), TimeDelta::seconds(60));
        let err = store.verify("resetpasswordform", &token, at(1)).unwrap_err();
        assert!(matches!(err, NonceError::FormMismatch { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn configured_ttl_replaces_default() {
        assert_eq!(NonceStore::new("s").ttl(), TimeDelta::minutes(10));
        let store = NonceStore::new("s").with_ttl(TimeDelta::seconds(30));
        assert_eq!(store.ttl(), TimeDelta::seconds(30));
        let store = NonceStore::new("s").with_ttl(TimeDelta::seconds(-5));
        assert_eq!(store.ttl(), TimeDelta::seconds(NonceStore::DEFAULT_TTL_SECS));
    }

    #[test]
    fn purge_drops_only_expired() {
        let mut store = NonceStore::new("secret");
        store.issue("a", at(0), TimeDelta::seconds(10));
        store.issue("b", at(0), TimeDelta::seconds(100));
        assert_eq!(store.purge_expired(at(50)), 1);
        assert_eq!(store.len(), 1);
    }
}

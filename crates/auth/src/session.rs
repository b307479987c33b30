use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Identity;

/// Lifetime of a freshly issued session, in hours.
pub const SESSION_TTL_HOURS: i64 = 8;

pub fn session_ttl() -> Duration {
    Duration::hours(SESSION_TTL_HOURS)
}

/// An authenticated session: who, since when, until when.
///
/// A session is valid iff `now < expires_at`. This type only carries the
/// record; deciding what "now" is belongs to the session manager's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    identity: Identity,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    /// Opaque bearer token issued by the live backend; `None` for simulated
    /// sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionValidationError {
    #[error("session has expired")]
    Expired,

    #[error("invalid session time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

impl Session {
    /// Issue a session with the standard TTL.
    pub fn issue(identity: Identity, now: DateTime<Utc>) -> Self {
        Self::issue_until(identity, now, now + session_ttl())
    }

    /// Issue a session with an explicit expiry (backend-issued sessions).
    pub fn issue_until(identity: Identity, now: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            identity,
            issued_at: now,
            expires_at,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.validate(now).is_ok()
    }

    /// Check the session's time window against `now`.
    ///
    /// Unlike token claims there is no "not yet valid" state: a restored
    /// session whose `issued_at` lies in the future (clock skew between
    /// launches) is still accepted as long as it has not expired.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), SessionValidationError> {
        if self.expires_at <= self.issued_at {
            return Err(SessionValidationError::InvalidTimeWindow);
        }
        if now >= self.expires_at {
            return Err(SessionValidationError::Expired);
        }
        Ok(())
    }
}

//! Portal error model.
//!
//! Every failure the session core or the data façade can produce maps onto one
//! of these variants. None of them is meant to escape as a panic: the session
//! manager returns them as `Err`, the façade folds them into an [`Envelope`].
//!
//! [`Envelope`]: crate::Envelope

use thiserror::Error;

/// Result type used across the portal core.
pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// Wrong credentials or a backend-rejected login.
    ///
    /// The message is deliberately generic: it never says whether the
    /// identifier exists.
    #[error("invalid credentials")]
    AuthenticationRejected,

    /// A session's expiry has already passed, e.g. a live login answered with
    /// an expired grant. A stored session that lapses is dropped quietly
    /// instead.
    #[error("session expired")]
    SessionExpired,

    /// The caller is not allowed to do this (missing capability, role switch
    /// in live mode, ...).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A requested key is absent from the backend.
    #[error("{0} not found")]
    NotFound(String),

    /// The live backend could not be reached or answered with a failure.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The operation is not legal for the record's current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl PortalError {
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable machine-readable code, used in logs and the live wire format.
    pub fn code(&self) -> &'static str {
        match self {
            PortalError::AuthenticationRejected => "authentication_rejected",
            PortalError::SessionExpired => "session_expired",
            PortalError::PermissionDenied(_) => "permission_denied",
            PortalError::NotFound(_) => "not_found",
            PortalError::BackendUnavailable(_) => "backend_unavailable",
            PortalError::Conflict(_) => "conflict",
            PortalError::Validation(_) => "validation_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::NotFound(_))
    }
}

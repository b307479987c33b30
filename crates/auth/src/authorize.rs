use serde::Serialize;
use thiserror::Error;

use crate::{Identity, Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    #[error("forbidden: role '{0}' is not allowed here")]
    RoleNotAllowed(Role),
}

/// Capability check.
///
/// - no identity → deny
/// - wildcard → allow
/// - otherwise exact string membership, nothing else
///
/// No IO, no panics.
pub fn allows(identity: Option<&Identity>, capability: &str) -> bool {
    let Some(identity) = identity else {
        return false;
    };

    identity
        .permissions()
        .iter()
        .any(|p| p.is_wildcard() || p.as_str() == capability)
}

/// Role-membership check, for surfaces gated by role rather than capability
/// (the 112 operator console).
pub fn has_role(identity: Option<&Identity>, roles: &[Role]) -> bool {
    identity.is_some_and(|identity| roles.contains(&identity.role()))
}

/// `Result` form of [`allows`], for call sites that surface a rejection.
pub fn authorize(identity: Option<&Identity>, required: &Permission) -> Result<(), AuthzError> {
    match identity {
        None => Err(AuthzError::Unauthenticated),
        Some(_) if allows(identity, required.as_str()) => Ok(()),
        Some(_) => Err(AuthzError::Forbidden(required.as_str().to_string())),
    }
}

/// `Result` form of [`has_role`].
pub fn authorize_role(identity: Option<&Identity>, roles: &[Role]) -> Result<(), AuthzError> {
    match identity {
        None => Err(AuthzError::Unauthenticated),
        Some(identity) if roles.contains(&identity.role()) => Ok(()),
        Some(identity) => Err(AuthzError::RoleNotAllowed(identity.role())),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation
// ─────────────────────────────────────────────────────────────────────────────

/// Why a capability check came out the way it did.
///
/// Surfaces use `reason` as the text of an "access denied" message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: String,
    pub granted: bool,
    pub reason: String,
    pub role: Option<Role>,
    pub has_wildcard: bool,
    pub denial: Option<DenialKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingPermission,
}

pub fn explain(identity: Option<&Identity>, required: &Permission) -> AuthorizationExplanation {
    let required_str = required.as_str().to_string();

    let Some(identity) = identity else {
        return AuthorizationExplanation {
            required_permission: required_str,
            granted: false,
            reason: "Not authenticated; sign in to continue".to_string(),
            role: None,
            has_wildcard: false,
            denial: Some(DenialKind::Unauthenticated),
        };
    };

    let has_wildcard = identity.has_wildcard();
    let granted = allows(Some(identity), required.as_str());

    let reason = if has_wildcard {
        format!("{} has full system access", identity.role().label())
    } else if granted {
        format!("{} has permission '{}'", identity.role().label(), required_str)
    } else {
        format!(
            "{} does not have permission '{}'",
            identity.role().label(),
            required_str
        )
    };

    AuthorizationExplanation {
        required_permission: required_str,
        granted,
        reason,
        role: Some(identity.role()),
        has_wildcard,
        denial: (!granted).then_some(DenialKind::MissingPermission),
    }
}

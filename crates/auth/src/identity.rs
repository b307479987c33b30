use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use portal_core::IdentityId;

use crate::{Permission, Role};

/// An authenticated principal.
///
/// Identities are issued whole (by the credential store or the live backend)
/// and never edited afterwards: a login or role switch replaces the identity,
/// it does not patch it. Fields are therefore private and the only
/// constructors are [`Identity::new`] plus the consuming `with_*` builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    id: IdentityId,
    email: String,
    role: Role,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
    #[serde(default)]
    permissions: BTreeSet<Permission>,
}

impl Identity {
    pub fn new(
        id: impl Into<IdentityId>,
        email: impl Into<String>,
        role: Role,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            name: name.into(),
            badge: None,
            unit: None,
            permissions: BTreeSet::new(),
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn badge(&self) -> Option<&str> {
        self.badge.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn permissions(&self) -> &BTreeSet<Permission> {
        &self.permissions
    }

    pub fn has_wildcard(&self) -> bool {
        self.permissions.contains(&Permission::WILDCARD)
    }

    /// Initials for the profile chip ("Officer Sarah Chen" → "OSC").
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

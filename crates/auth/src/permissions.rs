use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Capability identifier.
///
/// Capabilities are opaque dotted strings (e.g. `"incidents.read"`). There is
/// no hierarchy: `"incidents.read"` says nothing about `"incidents.assign"`.
/// The single wildcard `"*"` grants everything.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

/// Capabilities the portal's surfaces check for.
pub mod caps {
    use super::Permission;

    pub const DASHBOARD_VIEW: Permission = Permission::from_static("dashboard.view");
    pub const INCIDENTS_READ: Permission = Permission::from_static("incidents.read");
    pub const INCIDENTS_CREATE: Permission = Permission::from_static("incidents.create");
    pub const INCIDENTS_ASSIGN: Permission = Permission::from_static("incidents.assign");
    pub const INCIDENTS_VIEW_OWN: Permission = Permission::from_static("incidents.view_own");
    pub const ZONES_READ: Permission = Permission::from_static("zones.read");
    pub const ZONES_MANAGE: Permission = Permission::from_static("zones.manage");
    pub const DIGITAL_ID_VERIFY: Permission = Permission::from_static("digital_id.verify");
    pub const TOURIST_READ: Permission = Permission::from_static("tourist.read");
    pub const CALLS_HANDLE: Permission = Permission::from_static("calls.handle");
    pub const EMERGENCY_DISPATCH: Permission = Permission::from_static("emergency.dispatch");
    pub const AUDIT_READ: Permission = Permission::from_static("audit.read");
}

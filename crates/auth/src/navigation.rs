//! Navigation entries and their visibility gates.
//!
//! An entry can be gated by a role list, a capability, both, or neither. When
//! both are present the identity must satisfy both.

use serde::Serialize;

use crate::{Identity, Permission, Role, allows, caps, has_role};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
    pub capability: Option<Permission>,
    pub roles: Option<&'static [Role]>,
    pub badge: Option<&'static str>,
}

impl NavItem {
    pub fn is_visible_to(&self, identity: Option<&Identity>) -> bool {
        if let Some(roles) = self.roles {
            if !has_role(identity, roles) {
                return false;
            }
        }
        if let Some(capability) = &self.capability {
            if !allows(identity, capability.as_str()) {
                return false;
            }
        }
        true
    }
}

fn item(
    title: &'static str,
    href: &'static str,
    capability: Option<Permission>,
    roles: Option<&'static [Role]>,
) -> NavItem {
    NavItem {
        title,
        href,
        capability,
        roles,
        badge: None,
    }
}

const OPERATOR_ONLY: &[Role] = &[Role::Operator112];
const COMMAND_STAFF: &[Role] = &[Role::Admin, Role::Police];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// The portal's sidebar, in display order.
pub fn navigation() -> Vec<NavItem> {
    vec![
        item("Dashboard", "/dashboard", Some(caps::DASHBOARD_VIEW), None),
        item("Incidents", "/incidents", Some(caps::INCIDENTS_READ), None),
        item("Risk Heatmap", "/heatmap", Some(caps::ZONES_READ), None),
        item("Digital IDs", "/digital-ids", Some(caps::DIGITAL_ID_VERIFY), None),
        NavItem {
            badge: Some("LIVE"),
            ..item("Emergency Console", "/operator", None, Some(OPERATOR_ONLY))
        },
        item(
            "Zone Management",
            "/zones",
            Some(caps::ZONES_MANAGE),
            Some(COMMAND_STAFF),
        ),
        item("User Management", "/users", None, Some(ADMIN_ONLY)),
        item(
            "Audit Logs",
            "/audit",
            Some(caps::AUDIT_READ),
            Some(COMMAND_STAFF),
        ),
        item("Settings", "/settings", None, None),
    ]
}

/// Entries `identity` may see, in display order.
pub fn visible_navigation(identity: Option<&Identity>) -> Vec<NavItem> {
    navigation()
        .into_iter()
        .filter(|entry| entry.is_visible_to(identity))
        .collect()
}

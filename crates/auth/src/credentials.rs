//! Fixed credential store used when the portal runs against simulated data.
//!
//! Secrets are compared as plain strings: this is demo data, not an
//! authentication protocol.

use serde::Serialize;

use crate::{Identity, Role, caps};
use crate::permissions::Permission;

/// Identifier used for the automatic login when switching into simulated mode.
pub const DEFAULT_IDENTIFIER: &str = "admin@demo.local";

#[derive(Debug, Clone)]
struct CredentialEntry {
    identifier: String,
    secret: String,
    identity: Identity,
}

/// A demo login shown on the login screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoCredential {
    pub identifier: String,
    pub secret: String,
    pub role: Role,
    pub label: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: Vec<CredentialEntry>,
}

impl CredentialStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add (or replace) an entry. Lookup order for role switching follows
    /// insertion order.
    pub fn with_entry(mut self, identifier: impl Into<String>, secret: impl Into<String>, identity: Identity) -> Self {
        let identifier = identifier.into();
        self.entries.retain(|e| e.identifier != identifier);
        self.entries.push(CredentialEntry {
            identifier,
            secret: secret.into(),
            identity,
        });
        self
    }

    /// The six demo principals, one per role.
    pub fn demo() -> Self {
        Self::empty()
            .with_entry(
                DEFAULT_IDENTIFIER,
                "Admin@1234",
                Identity::new("admin-1", DEFAULT_IDENTIFIER, Role::Admin, "Admin User")
                    .with_badge("ADM001")
                    .with_permissions([Permission::WILDCARD]),
            )
            .with_entry(
                "police1@demo.local",
                "Police@1234",
                Identity::new("police-1", "police1@demo.local", Role::Police, "Officer Sarah Chen")
                    .with_badge("POL001")
                    .with_unit("District 1")
                    .with_permissions([
                        caps::INCIDENTS_READ,
                        caps::INCIDENTS_ASSIGN,
                        caps::DIGITAL_ID_VERIFY,
                        caps::ZONES_READ,
                    ]),
            )
            .with_entry(
                "tourism1@demo.local",
                "Tourism@1234",
                Identity::new("tourism-1", "tourism1@demo.local", Role::Tourism, "Tourism Officer Raj Patel")
                    .with_badge("TOU001")
                    .with_unit("Tourism Board")
                    .with_permissions([
                        caps::INCIDENTS_READ,
                        caps::DIGITAL_ID_VERIFY,
                        caps::ZONES_READ,
                        caps::TOURIST_READ,
                    ]),
            )
            .with_entry(
                "operator112@demo.local",
                "Operator@1234",
                Identity::new("operator-1", "operator112@demo.local", Role::Operator112, "112 Operator Maya Singh")
                    .with_badge("OPR001")
                    .with_unit("Emergency Response")
                    .with_permissions([
                        caps::INCIDENTS_CREATE,
                        caps::INCIDENTS_ASSIGN,
                        caps::CALLS_HANDLE,
                        caps::EMERGENCY_DISPATCH,
                    ]),
            )
            .with_entry(
                "hotel1@demo.local",
                "Hotel@1234",
                Identity::new("hotel-1", "hotel1@demo.local", Role::Hotel, "Hotel Manager")
                    .with_badge("HTL001")
                    .with_unit("Grand Palace Hotel")
                    .with_permissions([caps::INCIDENTS_READ, caps::DIGITAL_ID_VERIFY]),
            )
            .with_entry(
                "tourist_demo@demo.local",
                "Tourist@1234",
                Identity::new("tourist-1", "tourist_demo@demo.local", Role::Tourist, "Demo Tourist")
                    .with_permissions([caps::INCIDENTS_VIEW_OWN]),
            )
    }

    /// Return the identity iff `identifier` exists and `secret` matches.
    ///
    /// Unknown identifier and wrong secret are indistinguishable to the caller.
    pub fn verify(&self, identifier: &str, secret: &str) -> Option<&Identity> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .filter(|e| e.secret == secret)
            .map(|e| &e.identity)
    }

    /// First entry whose identity has `role`.
    pub fn find_by_role(&self, role: Role) -> Option<&Identity> {
        self.entries
            .iter()
            .find(|e| e.identity.role() == role)
            .map(|e| &e.identity)
    }

    /// Identity used for the automatic simulated-mode login.
    pub fn default_identity(&self) -> Option<&Identity> {
        self.entries
            .iter()
            .find(|e| e.identifier == DEFAULT_IDENTIFIER)
            .map(|e| &e.identity)
            .or_else(|| self.find_by_role(Role::Admin))
    }

    pub fn demo_hints(&self) -> Vec<DemoCredential> {
        self.entries
            .iter()
            .map(|e| DemoCredential {
                identifier: e.identifier.clone(),
                secret: e.secret.clone(),
                role: e.identity.role(),
                label: e.identity.role().label(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_store_has_exactly_one_entry_per_role() {
        let store = CredentialStore::demo();
        assert_eq!(store.len(), Role::ALL.len());
        for role in Role::ALL {
            assert_eq!(store.find_by_role(role).map(|i| i.role()), Some(role));
        }
    }

    #[test]
    fn verify_requires_matching_secret() {
        let store = CredentialStore::demo();
        let admin = store.verify("admin@demo.local", "Admin@1234").unwrap();
        assert_eq!(admin.role(), Role::Admin);
        assert!(admin.has_wildcard());
        assert!(store.verify("admin@demo.local", "admin@1234").is_none());
        assert!(store.verify("nobody@demo.local", "Admin@1234").is_none());
    }

    #[test]
    fn with_entry_replaces_same_identifier() {
        let store = CredentialStore::demo().with_entry(
            "hotel1@demo.local",
            "changed",
            Identity::new("hotel-2", "hotel1@demo.local", Role::Hotel, "Night Manager"),
        );
        assert_eq!(store.len(), 6);
        assert_eq!(store.verify("hotel1@demo.local", "changed").unwrap().name(), "Night Manager");
    }

    #[test]
    fn default_identity_is_administrator() {
        let store = CredentialStore::demo();
        assert_eq!(store.default_identity().unwrap().id().as_str(), "admin-1");
    }

    #[test]
    fn hints_carry_role_labels() {
        let hints = CredentialStore::demo().demo_hints();
        let operator = hints.iter().find(|h| h.role == Role::Operator112).unwrap();
        assert_eq!(operator.identifier, "operator112@demo.local");
        assert_eq!(operator.label, "112 Operator");
    }
}

//! Strongly-typed identifiers used across the portal.
//!
//! Resource keys are human-readable strings (`INC-2024-001`, `DID-12345`,
//! `zone-1`) because that is what operators type and read over the radio.
//! Only synthetic events use UUIDs.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PortalError;

macro_rules! impl_key_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = PortalError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(PortalError::validation(format!("{}: empty key", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }
        }
    };
}

impl_key_newtype!(
    /// Identifier of an authenticated principal (`admin-1`, `police-1`, ...).
    IdentityId,
    "IdentityId"
);
impl_key_newtype!(
    /// Incident key (`INC-2024-001`).
    IncidentId,
    "IncidentId"
);
impl_key_newtype!(
    /// Zone key (`zone-1`).
    ZoneId,
    "ZoneId"
);
impl_key_newtype!(
    /// Tourist digital identity key (`DID-12345`).
    DigitalId,
    "DigitalId"
);
impl_key_newtype!(
    /// Operator call key (`CALL-001`).
    CallId,
    "CallId"
);
impl_key_newtype!(
    /// Audit entry key (`AUDIT-001`).
    AuditId,
    "AuditId"
);
impl_key_newtype!(
    /// Alert key (`ALERT-001`).
    AlertId,
    "AlertId"
);

/// Identifier of a synthetic real-time event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_rejects_empty() {
        let id: DigitalId = "  DID-12345 ".parse().unwrap();
        assert_eq!(id.as_str(), "DID-12345");
        assert!("   ".parse::<IncidentId>().is_err());
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let json = serde_json::to_string(&ZoneId::new("zone-1")).unwrap();
        assert_eq!(json, "\"zone-1\"");
    }
}

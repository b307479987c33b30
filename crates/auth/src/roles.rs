use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role of an authority-portal principal.
///
/// The set is closed: every table keyed by role (labels, icons, navigation
/// gates) is an exhaustive `match`, so adding a role fails to compile until
/// every consumer handles it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Police,
    Tourism,
    #[serde(rename = "operator_112")]
    Operator112,
    Hotel,
    Tourist,
}

/// Icon shown next to a role in the role switcher and profile chip.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleIcon {
    Shield,
    MapPin,
    Phone,
    Building,
    Plane,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    /// All roles, in the order the role switcher lists them.
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Police,
        Role::Tourism,
        Role::Operator112,
        Role::Hotel,
        Role::Tourist,
    ];

    /// Wire name (`"operator_112"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Police => "police",
            Role::Tourism => "tourism",
            Role::Operator112 => "operator_112",
            Role::Hotel => "hotel",
            Role::Tourist => "tourist",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Police => "Police Officer",
            Role::Tourism => "Tourism Officer",
            Role::Operator112 => "112 Operator",
            Role::Hotel => "Hotel Staff",
            Role::Tourist => "Tourist",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Admin => "Full system access",
            Role::Police => "Law enforcement operations",
            Role::Tourism => "Tourist assistance & monitoring",
            Role::Operator112 => "Emergency response center",
            Role::Hotel => "Hospitality services",
            Role::Tourist => "Limited tourist view",
        }
    }

    pub fn icon(&self) -> RoleIcon {
        match self {
            Role::Admin | Role::Police => RoleIcon::Shield,
            Role::Tourism => RoleIcon::MapPin,
            Role::Operator112 => RoleIcon::Phone,
            Role::Hotel => RoleIcon::Building,
            Role::Tourist => RoleIcon::Plane,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

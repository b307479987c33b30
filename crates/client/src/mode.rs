use serde::{Deserialize, Serialize};
use std::fmt;

/// Which backend the data façade routes to.
///
/// Persisted on its own (independent of any session) as a JSON boolean,
/// `true` meaning simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    #[default]
    Simulated,
    Live,
}

impl BackendMode {
    pub fn is_simulated(self) -> bool {
        matches!(self, BackendMode::Simulated)
    }

    pub fn from_flag(simulated: bool) -> Self {
        if simulated {
            BackendMode::Simulated
        } else {
            BackendMode::Live
        }
    }

    pub fn as_flag(self) -> bool {
        self.is_simulated()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BackendMode::Simulated => "simulated",
            BackendMode::Live => "live",
        }
    }

    /// Decodes the persisted record. `None` for anything but a JSON boolean.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str::<bool>(raw).ok().map(Self::from_flag)
    }

    pub fn encode(self) -> String {
        self.as_flag().to_string()
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_simulated() {
        assert_eq!(BackendMode::default(), BackendMode::Simulated);
    }

    #[test]
    fn persisted_form_is_a_boolean() {
        assert_eq!(BackendMode::Simulated.encode(), "true");
        assert_eq!(BackendMode::Live.encode(), "false");
        assert_eq!(BackendMode::decode(" false "), Some(BackendMode::Live));
        assert_eq!(BackendMode::decode("true"), Some(BackendMode::Simulated));
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert_eq!(BackendMode::decode("yes"), None);
        assert_eq!(BackendMode::decode("\"true\""), None);
        assert_eq!(BackendMode::decode(""), None);
    }
}

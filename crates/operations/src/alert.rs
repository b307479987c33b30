use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{AlertId, DigitalId};

use crate::Priority;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Emergency,
    Incident,
    Warning,
    Info,
}

/// A notification-centre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub priority: Priority,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_id: Option<DigitalId>,
}

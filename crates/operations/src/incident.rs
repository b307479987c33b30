use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{DigitalId, IncidentId, PortalError, PortalResult};

use crate::{GeoPoint, Priority};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    Theft,
    Assault,
    Emergency,
    Harassment,
    Fraud,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Reported,
    Acknowledged,
    Dispatched,
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    pub priority: Priority,
    pub status: IncidentStatus,
    pub location: String,
    pub coordinates: GeoPoint,
    pub reported_by: String,
    pub reported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_id: Option<DigitalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_response: Option<String>,
}

impl Incident {
    /// Hand the incident to a responder and mark it dispatched.
    ///
    /// Resolved incidents cannot be reassigned.
    pub fn assign(&mut self, assignee: &str, now: DateTime<Utc>) -> PortalResult<()> {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            return Err(PortalError::validation("assignee must not be empty"));
        }
        if self.status == IncidentStatus::Resolved {
            return Err(PortalError::conflict(format!("incident {} is already resolved", self.id)));
        }
        self.assigned_to = Some(assignee.to_string());
        self.assigned_at = Some(now);
        self.status = IncidentStatus::Dispatched;
        Ok(())
    }
}

/// List filter. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive match on title, location or key.
    pub search: Option<String>,
}

impl IncidentFilter {
    pub fn status(status: IncidentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Build a filter from the select-box values of the incident list, where
    /// `"all"` (or an empty string) means "don't filter".
    pub fn from_labels(status: &str, priority: &str) -> PortalResult<Self> {
        Ok(Self {
            status: parse_label(status)?,
            priority: parse_label(priority)?,
            search: None,
        })
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn matches(&self, incident: &Incident) -> bool {
        if self.status.is_some_and(|s| s != incident.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != incident.priority) {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = incident.title.to_lowercase().contains(&term)
                || incident.location.to_lowercase().contains(&term)
                || incident.id.as_str().to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        true
    }
}

fn parse_label<T: serde::de::DeserializeOwned>(label: &str) -> PortalResult<Option<T>> {
    let label = label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    serde_json::from_value(serde_json::Value::String(label.to_lowercase()))
        .map(Some)
        .map_err(|_| PortalError::validation(format!("unknown filter value '{label}'")))
}

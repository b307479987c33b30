use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{AlertId, DigitalId, EventId, IncidentId, ZoneId};
use portal_operations::{AlertKind, Priority, RiskLevel};

/// The closed set of real-time event kinds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "incident.created")]
    IncidentCreated,
    #[serde(rename = "alert.created")]
    AlertCreated,
    #[serde(rename = "risk.updated")]
    RiskUpdated,
    #[serde(rename = "sos.triggered")]
    SosTriggered,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::IncidentCreated,
        EventKind::AlertCreated,
        EventKind::RiskUpdated,
        EventKind::SosTriggered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::IncidentCreated => "incident.created",
            EventKind::AlertCreated => "alert.created",
            EventKind::RiskUpdated => "risk.updated",
            EventKind::SosTriggered => "sos.triggered",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wire shape: `{"id", "occurredAt", "type": "incident.created", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EventPayload {
    #[serde(rename = "incident.created", rename_all = "camelCase")]
    IncidentCreated {
        incident_id: IncidentId,
        title: String,
        priority: Priority,
        location: String,
    },
    #[serde(rename = "alert.created", rename_all = "camelCase")]
    AlertCreated {
        alert_id: AlertId,
        title: String,
        kind: AlertKind,
        location: String,
    },
    #[serde(rename = "risk.updated", rename_all = "camelCase")]
    RiskUpdated {
        zone_id: ZoneId,
        new_risk_level: RiskLevel,
    },
    #[serde(rename = "sos.triggered", rename_all = "camelCase")]
    SosTriggered {
        digital_id: DigitalId,
        location: String,
        priority: Priority,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            EventPayload::IncidentCreated { .. } => EventKind::IncidentCreated,
            EventPayload::AlertCreated { .. } => EventKind::AlertCreated,
            EventPayload::RiskUpdated { .. } => EventKind::RiskUpdated,
            EventPayload::SosTriggered { .. } => EventKind::SosTriggered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortalEvent {
    pub id: EventId,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl PortalEvent {
    pub fn new(payload: EventPayload, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            occurred_at,
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_type_plus_data() {
        let event = PortalEvent::new(
            EventPayload::RiskUpdated {
                zone_id: ZoneId::new("zone-1"),
                new_risk_level: RiskLevel::High,
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "risk.updated");
        assert_eq!(json["data"]["zoneId"], "zone-1");
        assert_eq!(json["data"]["newRiskLevel"], "high");
        assert!(json.get("occurredAt").is_some());

        let back: PortalEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), EventKind::RiskUpdated);
    }
}

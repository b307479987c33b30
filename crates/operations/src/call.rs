use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{CallId, IncidentId, PortalError, PortalResult};

use crate::Priority;

/// Lifecycle: `Incoming → Active → Completed`, or `Incoming → Declined`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    Incoming,
    Active,
    Completed,
    Declined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorCall {
    pub id: CallId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<IncidentId>,
    pub caller_id: String,
    pub caller_location: String,
    pub call_type: String,
    pub priority: Priority,
    pub status: CallStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds between start and end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_name: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_detected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

impl OperatorCall {
    fn expect_status(&self, expected: CallStatus, action: &str) -> PortalResult<()> {
        if self.status != expected {
            return Err(PortalError::conflict(format!(
                "cannot {action} call {}: it is {:?}",
                self.id, self.status
            )));
        }
        Ok(())
    }

    /// Pick up an incoming call.
    pub fn accept(&mut self, operator_id: &str, operator_name: &str) -> PortalResult<()> {
        self.expect_status(CallStatus::Incoming, "accept")?;
        self.status = CallStatus::Active;
        self.operator_id = Some(operator_id.to_string());
        self.operator_name = Some(operator_name.to_string());
        Ok(())
    }

    /// Decline an incoming call; it is forwarded elsewhere.
    pub fn decline(&mut self) -> PortalResult<()> {
        self.expect_status(CallStatus::Incoming, "decline")?;
        self.status = CallStatus::Declined;
        self.outcome = Some("Call declined and forwarded".to_string());
        Ok(())
    }

    /// Hang up an active call, keeping the operator's notes as the summary
    /// when they wrote any.
    pub fn end(&mut self, notes: Option<&str>, now: DateTime<Utc>) -> PortalResult<()> {
        self.expect_status(CallStatus::Active, "end")?;
        self.status = CallStatus::Completed;
        self.end_time = Some(now);
        self.duration = Some((now - self.start_time).num_seconds().max(0));
        if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
            self.summary = notes.to_string();
        }
        self.outcome = Some("Call completed successfully".to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFilter {
    pub status: Option<CallStatus>,
}

impl CallFilter {
    pub fn status(status: CallStatus) -> Self {
        Self { status: Some(status) }
    }

    pub fn matches(&self, call: &OperatorCall) -> bool {
        self.status.is_none_or(|s| s == call.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn incoming(now: DateTime<Utc>) -> OperatorCall {
        OperatorCall {
            id: CallId::new("CALL-002"),
            incident_id: None,
            caller_id: "caller-x".to_string(),
            caller_location: "India Gate".to_string(),
            call_type: "Medical".to_string(),
            priority: Priority::High,
            status: CallStatus::Incoming,
            start_time: now,
            end_time: None,
            duration: None,
            operator_id: None,
            operator_name: None,
            summary: "New incoming emergency call".to_string(),
            actions: vec![],
            language_detected: None,
            outcome: None,
        }
    }

    #[test]
    fn accept_then_end_records_duration_and_notes() {
        let start = Utc::now();
        let mut call = incoming(start);
        call.accept("operator-1", "Maya Singh").unwrap();
        assert_eq!(call.status, CallStatus::Active);

        call.end(Some("Ambulance dispatched"), start + Duration::seconds(95)).unwrap();
        assert_eq!(call.status, CallStatus::Completed);
        assert_eq!(call.duration, Some(95));
        assert_eq!(call.summary, "Ambulance dispatched");
    }

    #[test]
    fn blank_notes_keep_existing_summary() {
        let start = Utc::now();
        let mut call = incoming(start);
        call.accept("operator-1", "Maya Singh").unwrap();
        call.end(Some("   "), start).unwrap();
        assert_eq!(call.summary, "New incoming emergency call");
    }

    #[test]
    fn illegal_transitions_are_conflicts() {
        let mut call = incoming(Utc::now());
        assert!(matches!(call.end(None, Utc::now()), Err(PortalError::Conflict(_))));
        call.decline().unwrap();
        assert_eq!(call.status, CallStatus::Declined);
        assert!(matches!(call.accept("o", "O"), Err(PortalError::Conflict(_))));
        assert!(matches!(call.decline(), Err(PortalError::Conflict(_))));
    }
}

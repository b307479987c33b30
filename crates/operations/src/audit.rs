use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use portal_core::{AuditId, PortalError, PortalResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Pending,
    Approved,
    Completed,
    Denied,
}

/// One line of the audit trail. Entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: AuditId,
    /// Upper-snake action code (`PII_ACCESS`, `INCIDENT_ASSIGN`, ...).
    pub action: String,
    pub user: String,
    pub resource: String,
    pub timestamp: DateTime<Utc>,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

/// Payload of an append; the backend assigns key and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuditEntry {
    pub action: String,
    pub user: String,
    pub resource: String,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
}

impl NewAuditEntry {
    pub fn new(
        action: impl Into<String>,
        user: impl Into<String>,
        resource: impl Into<String>,
        status: AuditStatus,
    ) -> Self {
        Self {
            action: action.into(),
            user: user.into(),
            resource: resource.into(),
            status,
            approved_by: None,
        }
    }

    pub fn approved_by(mut self, approver: impl Into<String>) -> Self {
        self.approved_by = Some(approver.into());
        self
    }

    pub fn validate(&self) -> PortalResult<()> {
        for (field, value) in [("action", &self.action), ("user", &self.user), ("resource", &self.resource)] {
            if value.trim().is_empty() {
                return Err(PortalError::validation(format!("audit entry {field} must not be empty")));
            }
        }
        Ok(())
    }

    pub fn into_entry(self, id: AuditId, now: DateTime<Utc>) -> PortalResult<AuditEntry> {
        self.validate()?;
        Ok(AuditEntry {
            id,
            action: self.action,
            user: self.user,
            resource: self.resource,
            timestamp: now,
            status: self.status,
            approved_by: self.approved_by,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFilter {
    pub action: Option<String>,
    pub status: Option<AuditStatus>,
    pub user: Option<String>,
}

impl AuditFilter {
    pub fn action(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: AuditStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.as_deref().is_none_or(|a| a.eq_ignore_ascii_case(&entry.action))
            && self.status.is_none_or(|s| s == entry.status)
            && self.user.as_deref().is_none_or(|u| u == entry.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_payload_requires_all_text_fields() {
        let ok = NewAuditEntry::new("PII_ACCESS", "Officer Sarah Chen", "Tourist Profile DID-12345", AuditStatus::Pending);
        assert!(ok.validate().is_ok());

        let missing = NewAuditEntry::new("PII_ACCESS", " ", "x", AuditStatus::Pending);
        assert!(matches!(missing.into_entry(AuditId::new("AUDIT-9"), Utc::now()), Err(PortalError::Validation(_))));
    }

    #[test]
    fn filter_action_is_case_insensitive() {
        let entry = NewAuditEntry::new("INCIDENT_ASSIGN", "Dispatcher Kumar", "INC-2024-001", AuditStatus::Completed)
            .into_entry(AuditId::new("AUDIT-2"), Utc::now())
            .unwrap();
        assert!(AuditFilter::action("incident_assign").matches(&entry));
        assert!(!AuditFilter::action("incident_assign").with_status(AuditStatus::Denied).matches(&entry));
    }
}

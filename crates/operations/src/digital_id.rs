use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use portal_core::DigitalId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Flagged,
}

/// A tourist's digital identity as seen by authorities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalIdentity {
    pub digital_id: DigitalId,
    pub name: String,
    pub nationality: String,
    pub status: VerificationStatus,
    pub visa_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub last_seen: DateTime<Utc>,
    pub location: String,
    pub verification_count: u32,
    pub blockchain_tx: String,
    #[serde(default)]
    pub consent_scope: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified_at: Option<DateTime<Utc>>,
}

/// Proof handed back by a verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReceipt {
    pub digital_id: DigitalId,
    pub transaction_id: String,
    pub verified_at: DateTime<Utc>,
    pub verification_count: u32,
}

/// Result of a verification: the updated record plus its receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub identity: DigitalIdentity,
    pub receipt: VerificationReceipt,
}

impl DigitalIdentity {
    /// Count one more verification. The verification status itself is not
    /// touched: a flagged identity stays flagged however often it is checked.
    pub fn record_verification(
        &mut self,
        transaction_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> VerificationReceipt {
        self.verification_count = self.verification_count.saturating_add(1);
        self.last_verified_at = Some(now);
        VerificationReceipt {
            digital_id: self.digital_id.clone(),
            transaction_id: transaction_id.into(),
            verified_at: now,
            verification_count: self.verification_count,
        }
    }

    pub fn is_expired_on(&self, day: NaiveDate) -> bool {
        day > self.expiry_date
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalIdentityFilter {
    pub status: Option<VerificationStatus>,
    /// Case-insensitive match on key, nationality or location.
    pub search: Option<String>,
}

impl DigitalIdentityFilter {
    pub fn status(status: VerificationStatus) -> Self {
        Self {
            status: Some(status),
            search: None,
        }
    }

    pub fn search(term: impl Into<String>) -> Self {
        Self {
            status: None,
            search: Some(term.into()),
        }
    }

    pub fn matches(&self, record: &DigitalIdentity) -> bool {
        if self.status.is_some_and(|s| s != record.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => true,
            Some(term) => {
                let term = term.to_lowercase();
                record.digital_id.as_str().to_lowercase().contains(&term)
                    || record.nationality.to_lowercase().contains(&term)
                    || record.location.to_lowercase().contains(&term)
            }
        }
    }
}

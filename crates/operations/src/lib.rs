//! `portal-operations`: the resource records the portal reads and mutates.
//!
//! Each module owns one resource kind: its record, its status enumeration,
//! the list filter the backends apply, and the state transitions the data
//! façade exposes. Transitions are plain methods that take `now` explicitly so
//! they stay deterministic.

pub mod alert;
pub mod audit;
pub mod call;
pub mod digital_id;
pub mod incident;
pub mod zone;

mod common;

pub use alert::{Alert, AlertKind};
pub use audit::{AuditEntry, AuditFilter, AuditStatus, NewAuditEntry};
pub use call::{CallFilter, CallStatus, OperatorCall};
pub use common::{GeoPoint, Priority, RiskLevel};
pub use digital_id::{
    DigitalIdentity, DigitalIdentityFilter, Verification, VerificationReceipt, VerificationStatus,
};
pub use incident::{Incident, IncidentFilter, IncidentKind, IncidentStatus};
pub use zone::{HeatmapZone, Zone, ZoneFilter, ZoneStatus};

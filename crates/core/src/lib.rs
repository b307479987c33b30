//! `portal-core`: shared building blocks for the authority portal.
//!
//! This crate contains **pure** primitives (no storage, no network).

pub mod clock;
pub mod envelope;
pub mod error;
pub mod id;

pub use clock::{Clock, ManualClock, SystemClock};
pub use envelope::Envelope;
pub use error::{PortalError, PortalResult};
pub use id::{AlertId, AuditId, CallId, DigitalId, EventId, IdentityId, IncidentId, ZoneId};

//! Process-wide tracing setup shared by the portal binaries.

/// Tracing subscriber configuration.
pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};

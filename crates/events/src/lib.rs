//! Real-time portal events and the in-process bus that carries them.
//!
//! In live mode these would arrive over a socket; in simulated mode the client's
//! event simulator publishes them on an [`InMemoryEventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::{EventKind, EventPayload, PortalEvent};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};

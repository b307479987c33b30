//! `portal-client`
//!
//! **Responsibility:** the stateful half of the authority portal.
//!
//! This crate provides:
//! - The session manager (login, logout, role switch, mode switch, restore)
//! - Client-local persistence of the session and the mode flag
//! - The data façade and its simulated and live backends
//! - The event simulator feeding the in-process event bus
//!
//! Presentation code talks to a [`Portal`] and never to a backend directly.

pub mod backend;
pub mod config;
pub mod facade;
pub mod mode;
pub mod portal;
pub mod session;
pub mod simulator;
pub mod storage;

pub use backend::{Actor, AuthGrant, Authenticator, Backend, Fixtures, LiveBackend, RequestContext, SimulatedBackend};
pub use config::ClientConfig;
pub use facade::DataFacade;
pub use mode::BackendMode;
pub use portal::{Portal, PortalBuilder};
pub use session::SessionManager;
pub use simulator::{EventSimulator, SimulatorConfig, SimulatorHandle};
pub use storage::{KeyValueStore, MODE_KEY, MemoryStore, SESSION_KEY, SqliteStore, StorageError};

//! `portal-auth`: identities, sessions and authorization for the authority portal.
//!
//! This crate is intentionally decoupled from HTTP and storage: everything in
//! it is a value type or a pure function.

pub mod authorize;
pub mod credentials;
pub mod identity;
pub mod navigation;
pub mod permissions;
pub mod roles;
pub mod session;

pub use authorize::{
    AuthorizationExplanation, AuthzError, DenialKind, allows, authorize, authorize_role, explain,
    has_role,
};
pub use credentials::{CredentialStore, DEFAULT_IDENTIFIER, DemoCredential};
pub use identity::Identity;
pub use navigation::{NavItem, navigation, visible_navigation};
pub use permissions::{Permission, caps};
pub use roles::{Role, RoleIcon, UnknownRole};
pub use session::{SESSION_TTL_HOURS, Session, SessionValidationError, session_ttl};

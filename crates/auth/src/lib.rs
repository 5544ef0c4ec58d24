//! `deliveryhub-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it owns the
//! session state machine and the role/permission policy, nothing else.

pub mod access;
pub mod authorize;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod user;

pub use access::{Action, Resource};
pub use authorize::{
    AccessDecision, AccessExplanation, AccessRule, can_access, evaluate_access, explain_access,
    has_any_role, has_permission, has_role,
};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{NO_TOKEN_MESSAGE, Session, SessionEvent, SessionView};
pub use user::{Tenant, User, UserPatch};

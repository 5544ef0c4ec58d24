//! Session state machine.
//!
//! The session is a closed set of states driven by [`SessionEvent`]s through
//! the pure [`Session::transition`]. The manager that performs I/O lives in the
//! client crate and only ever changes state through this function.
//!
//! # Invariants
//! - `is_authenticated() == user().is_some()`
//! - `tenant().is_some() == user().is_some()`
//! - `is_loading()` implies `error().is_none()`

use serde::Serialize;

use crate::{Action, Permission, Resource, Role, Tenant, User, UserPatch, authorize};

/// Error reported when hydration finds no stored credentials.
pub const NO_TOKEN_MESSAGE: &str = "No token found";

/// Current authentication state of the client.
///
/// Every session starts out hydrating.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Session {
    /// A hydrate/login/register call is in flight.
    #[default]
    Loading,
    Authenticated { user: User, tenant: Tenant },
    Unauthenticated { error: Option<String> },
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A hydrate, login or register call started.
    Started,
    /// The server confirmed an identity.
    Established { user: User, tenant: Tenant },
    /// A hydrate, login or register call failed with a displayable message.
    Failed(String),
    LoggedOut,
    UserUpdated(UserPatch),
    ErrorCleared,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Started => "started",
            SessionEvent::Established { .. } => "established",
            SessionEvent::Failed(_) => "failed",
            SessionEvent::LoggedOut => "logged_out",
            SessionEvent::UserUpdated(_) => "user_updated",
            SessionEvent::ErrorCleared => "error_cleared",
        }
    }
}

impl Session {
    /// Apply one event and return the resulting state.
    pub fn transition(self, event: SessionEvent) -> Session {
        match event {
            SessionEvent::Started => Session::Loading,
            SessionEvent::Established { user, tenant } => Session::Authenticated { user, tenant },
            SessionEvent::Failed(message) => Session::Unauthenticated { error: Some(message) },
            SessionEvent::LoggedOut => Session::Unauthenticated { error: None },
            SessionEvent::UserUpdated(patch) => match self {
                Session::Authenticated { mut user, tenant } => {
                    user.merge(patch);
                    Session::Authenticated { user, tenant }
                }
                other => other,
            },
            SessionEvent::ErrorCleared => match self {
                Session::Unauthenticated { .. } => Session::Unauthenticated { error: None },
                other => other,
            },
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn tenant(&self) -> Option<&Tenant> {
        match self {
            Session::Authenticated { tenant, .. } => Some(tenant),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Session::Unauthenticated { error } => error.as_deref(),
            _ => None,
        }
    }

    pub fn has_permission(&self, permission: &Permission) -> bool {
        authorize::has_permission(self.user(), permission)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        authorize::has_role(self.user(), role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        authorize::has_any_role(self.user(), roles)
    }

    pub fn can_access(&self, resource: &Resource, action: &Action) -> bool {
        authorize::can_access(self.user(), resource, action)
    }

    /// `can_access` with the default `read` action.
    pub fn can_read(&self, resource: &Resource) -> bool {
        self.can_access(resource, &Action::READ)
    }

    /// Flat view of the session, as UI layers consume it.
    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user().cloned(),
            tenant: self.tenant().cloned(),
            is_authenticated: self.is_authenticated(),
            is_loading: self.is_loading(),
            error: self.error().map(str::to_string),
        }
    }
}

/// Flattened, serializable snapshot of a [`Session`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: Option<User>,
    pub tenant: Option<Tenant>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

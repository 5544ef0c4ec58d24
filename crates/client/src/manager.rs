//! Session manager: drives the session state machine from backend calls.
//!
//! The manager is the single owner of the client's [`Session`]. Callers hold it
//! (usually behind an `Arc`) and pass it to whatever needs the session; there
//! is no process-wide instance.
//!
//! # Concurrency
//! Operations are expected to run one at a time per client. Overlap is still
//! tolerated: every state-changing call takes a ticket when it starts, and a
//! result is applied only if no newer call has started since. A stale result is
//! dropped without touching the session or the token store, and the stale call
//! returns [`SessionError::Superseded`].

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use deliveryhub_auth::{
    Action, NO_TOKEN_MESSAGE, Permission, Resource, Role, Session, SessionEvent, UserPatch,
};

use crate::api::{AuthApi, AuthPayload, Credentials, Registration};
use crate::error::{ApiError, SessionError};
use crate::token_store::TokenStore;

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const LOAD_USER_FAILED: &str = "Failed to load user";
pub const FORGOT_PASSWORD_FAILED: &str = "Failed to send reset email";
pub const RESET_PASSWORD_FAILED: &str = "Failed to reset password";
pub const STORE_CREDENTIALS_FAILED: &str = "Failed to store credentials";

/// Call-start ticket of the newest state-changing operation.
#[derive(Debug, Default)]
struct Fence {
    latest: u64,
}

pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    fence: Mutex<Fence>,
}

impl SessionManager {
    /// Create a manager in the initial `Loading` state. Call
    /// [`hydrate`](Self::hydrate) once at startup.
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            api,
            tokens,
            state,
            fence: Mutex::new(Fence::default()),
        }
    }

    /// Owned copy of the current session.
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────

    /// Restore a session from the stored token.
    ///
    /// Without a stored token the backend is not contacted. If the backend
    /// rejects the token, the stored tokens are cleared.
    pub async fn hydrate(&self) -> Result<(), SessionError> {
        let ticket = self.begin(true);

        if self.tokens.access_token().is_none() {
            debug!("no stored access token; skipping verification");
            return self.settle(ticket, |_| SessionEvent::Failed(NO_TOKEN_MESSAGE.to_string()));
        }

        match self.api.current_user().await {
            Ok(me) => self.settle(ticket, |_| SessionEvent::Established {
                user: me.user,
                tenant: me.tenant,
            }),
            Err(err) => {
                warn!(kind = err.kind(), error = %err, "session hydration failed");
                let message = err.user_message(LOAD_USER_FAILED);
                self.settle(ticket, |tokens| {
                    tokens.clear_tokens();
                    SessionEvent::Failed(message)
                })
            }
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        let ticket = self.begin(true);
        let result = self.api.login(credentials).await;
        self.settle_sign_in(ticket, "login", result, LOGIN_FAILED)
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), SessionError> {
        let ticket = self.begin(true);
        let result = self.api.register(registration).await;
        self.settle_sign_in(ticket, "register", result, REGISTRATION_FAILED)
    }

    /// End the session. The backend call is best effort: local tokens and
    /// state are cleared whatever it returns.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let ticket = self.begin(false);

        if let Err(err) = self.api.logout().await {
            warn!(
                kind = err.kind(),
                error = %err,
                "remote logout failed; clearing local session anyway"
            );
        }

        self.settle(ticket, |tokens| {
            tokens.clear_tokens();
            SessionEvent::LoggedOut
        })
    }

    /// Request a password reset email. Does not touch the session.
    pub async fn forgot_password(&self, email: &str) -> Result<(), SessionError> {
        self.api.forgot_password(email).await.map_err(|err| {
            warn!(kind = err.kind(), error = %err, "forgot-password request failed");
            SessionError::Failed(err.user_message(FORGOT_PASSWORD_FAILED))
        })
    }

    /// Set a new password with a reset token. Does not touch the session.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), SessionError> {
        self.api.reset_password(token, new_password).await.map_err(|err| {
            warn!(kind = err.kind(), error = %err, "reset-password request failed");
            SessionError::Failed(err.user_message(RESET_PASSWORD_FAILED))
        })
    }

    /// Shallow-merge `patch` into the signed-in user.
    pub fn update_user(&self, patch: UserPatch) -> Result<(), SessionError> {
        let _fence = self.fence.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.state.borrow().is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        self.apply(SessionEvent::UserUpdated(patch));
        Ok(())
    }

    pub fn clear_error(&self) {
        let _fence = self.fence.lock().unwrap_or_else(PoisonError::into_inner);
        self.apply(SessionEvent::ErrorCleared);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Authorization predicates over the current session
    // ─────────────────────────────────────────────────────────────────────

    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.state.borrow().has_permission(permission)
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.state.borrow().has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.state.borrow().has_any_role(roles)
    }

    pub fn can_access(&self, resource: &Resource, action: &Action) -> bool {
        self.state.borrow().can_access(resource, action)
    }

    pub fn can_read(&self, resource: &Resource) -> bool {
        self.state.borrow().can_read(resource)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────

    /// Take a ticket for a new state-changing call, entering `Loading` if
    /// the call is a hydrate/login/register.
    fn begin(&self, enter_loading: bool) -> u64 {
        let mut fence = self.fence.lock().unwrap_or_else(PoisonError::into_inner);
        fence.latest += 1;
        if enter_loading {
            self.apply(SessionEvent::Started);
        }
        fence.latest
    }

    /// Apply the terminal transition of the call holding `ticket`, unless a
    /// newer call has started. `effect` performs the token store side effect
    /// and returns the event to apply.
    fn settle<F>(&self, ticket: u64, effect: F) -> Result<(), SessionError>
    where
        F: FnOnce(&dyn TokenStore) -> SessionEvent,
    {
        let fence = self.fence.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket != fence.latest {
            debug!(ticket, latest = fence.latest, "dropping stale session result");
            return Err(SessionError::Superseded);
        }

        let event = effect(self.tokens.as_ref());
        self.apply(event);

        match self.state.borrow().error() {
            Some(message) => Err(SessionError::Failed(message.to_string())),
            None => Ok(()),
        }
    }

    fn settle_sign_in(
        &self,
        ticket: u64,
        operation: &'static str,
        result: Result<AuthPayload, ApiError>,
        fallback: &'static str,
    ) -> Result<(), SessionError> {
        match result {
            Ok(payload) => self.settle(ticket, |store| match store.set_tokens(&payload.tokens) {
                Ok(()) => SessionEvent::Established {
                    user: payload.user,
                    tenant: payload.tenant,
                },
                Err(err) => {
                    warn!(operation, error = %err, "failed to persist tokens");
                    SessionEvent::Failed(STORE_CREDENTIALS_FAILED.to_string())
                }
            }),
            Err(err) => {
                warn!(operation, kind = err.kind(), error = %err, "sign-in rejected");
                let message = err.user_message(fallback);
                self.settle(ticket, |_| SessionEvent::Failed(message))
            }
        }
    }

    /// Must be called with the fence held.
    fn apply(&self, event: SessionEvent) {
        let name = event.name();
        self.state
            .send_modify(|session| *session = std::mem::take(session).transition(event));

        let session = self.state.borrow();
        info!(
            event = name,
            authenticated = session.is_authenticated(),
            user_id = session.user().map(|u| u.id.as_str()),
            tenant_id = session.tenant().map(|t| t.id.as_str()),
            "session transition"
        );
    }
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

//! Shared stubs for client integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use deliveryhub_auth::{Role, Tenant, User};
use deliveryhub_client::{
    ApiError, AuthApi, AuthPayload, Credentials, CurrentUser, DashboardApi, DashboardStats,
    Registration, TokenPair, TokenStore, TokenStoreError,
};
use deliveryhub_core::{TenantId, UserId};

pub fn user(id: u64, role: Role) -> User {
    let mut user = User::new(UserId::from(id), role);
    user.email = format!("user{id}@example.com");
    user.first_name = "Amina".to_string();
    user.last_name = "Benali".to_string();
    user
}

pub fn tenant(id: u64) -> Tenant {
    let mut tenant = Tenant::new(TenantId::from(id));
    tenant.name = "Atlas Deliveries".to_string();
    tenant.subscription_plan = Some("pro".to_string());
    tenant
}

pub fn payload(user: User, access: &str) -> AuthPayload {
    AuthPayload {
        user,
        tenant: tenant(1),
        tokens: TokenPair::new(access, format!("{access}-refresh")),
    }
}

fn unstubbed<T>() -> Result<T, ApiError> {
    Err(ApiError::Transport("not stubbed".to_string()))
}

/// Canned-response `AuthApi` that records which endpoints were called.
pub struct StubAuthApi {
    login: Mutex<Result<AuthPayload, ApiError>>,
    register: Mutex<Result<AuthPayload, ApiError>>,
    current_user: Mutex<Result<CurrentUser, ApiError>>,
    logout: Mutex<Result<(), ApiError>>,
    forgot_password: Mutex<Result<(), ApiError>>,
    reset_password: Mutex<Result<(), ApiError>>,
    calls: Mutex<Vec<&'static str>>,
}

impl Default for StubAuthApi {
    fn default() -> Self {
        Self {
            login: Mutex::new(unstubbed()),
            register: Mutex::new(unstubbed()),
            current_user: Mutex::new(unstubbed()),
            logout: Mutex::new(Ok(())),
            forgot_password: Mutex::new(Ok(())),
            reset_password: Mutex::new(Ok(())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubAuthApi {
    pub fn with_login(self, result: Result<AuthPayload, ApiError>) -> Self {
        *self.login.lock().unwrap() = result;
        self
    }

    pub fn with_register(self, result: Result<AuthPayload, ApiError>) -> Self {
        *self.register.lock().unwrap() = result;
        self
    }

    pub fn with_current_user(self, result: Result<CurrentUser, ApiError>) -> Self {
        *self.current_user.lock().unwrap() = result;
        self
    }

    pub fn with_logout(self, result: Result<(), ApiError>) -> Self {
        *self.logout.lock().unwrap() = result;
        self
    }

    pub fn with_forgot_password(self, result: Result<(), ApiError>) -> Self {
        *self.forgot_password.lock().unwrap() = result;
        self
    }

    pub fn with_reset_password(self, result: Result<(), ApiError>) -> Self {
        *self.reset_password.lock().unwrap() = result;
        self
    }

    pub fn set_login(&self, result: Result<AuthPayload, ApiError>) {
        *self.login.lock().unwrap() = result;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl AuthApi for StubAuthApi {
    async fn login(&self, _credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        self.record("login");
        self.login.lock().unwrap().clone()
    }

    async fn register(&self, _registration: &Registration) -> Result<AuthPayload, ApiError> {
        self.record("register");
        self.register.lock().unwrap().clone()
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record("logout");
        self.logout.lock().unwrap().clone()
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        self.record("current_user");
        self.current_user.lock().unwrap().clone()
    }

    async fn forgot_password(&self, _email: &str) -> Result<(), ApiError> {
        self.record("forgot_password");
        self.forgot_password.lock().unwrap().clone()
    }

    async fn reset_password(&self, _token: &str, _new_password: &str) -> Result<(), ApiError> {
        self.record("reset_password");
        self.reset_password.lock().unwrap().clone()
    }
}

/// Token store whose writes always fail.
#[derive(Debug, Default)]
pub struct ReadOnlyTokenStore;

impl TokenStore for ReadOnlyTokenStore {
    fn access_token(&self) -> Option<String> {
        None
    }

    fn refresh_token(&self) -> Option<String> {
        None
    }

    fn set_tokens(&self, _tokens: &TokenPair) -> Result<(), TokenStoreError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }

    fn clear_tokens(&self) {}
}

/// `DashboardApi` replaying a scripted sequence of results.
pub struct ScriptedDashboardApi {
    results: Mutex<Vec<Result<DashboardStats, ApiError>>>,
    calls: Mutex<Vec<TenantId>>,
}

impl ScriptedDashboardApi {
    pub fn new(mut results: Vec<Result<DashboardStats, ApiError>>) -> Self {
        results.reverse();
        Self {
            results: Mutex::new(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TenantId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardApi for ScriptedDashboardApi {
    async fn dashboard_stats(&self, tenant_id: &TenantId) -> Result<DashboardStats, ApiError> {
        self.calls.lock().unwrap().push(tenant_id.clone());
        self.results.lock().unwrap().pop().unwrap_or_else(unstubbed)
    }
}

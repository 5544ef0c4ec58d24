//! Backend contracts consumed by the session manager and the dashboard.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use deliveryhub_auth::{Tenant, User};
use deliveryhub_core::TenantId;

use crate::dashboard::DashboardStats;
use crate::error::ApiError;
use crate::token_store::TokenPair;

/// Email/password login request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Sign-up request. Registering creates the tenant and its owner in one call.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl core::fmt::Debug for Registration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("company_name", &self.company_name)
            .field("phone", &self.phone)
            .finish()
    }
}

/// Result of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: User,
    pub tenant: Tenant,
    pub tokens: TokenPair,
}

/// Result of verifying the stored token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user: User,
    pub tenant: Tenant,
}

/// Authentication endpoints of the backend.
///
/// Implementations report every failure as an [`ApiError`]; none of these
/// calls may panic on a network or server error.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError>;

    /// Invalidate the current tokens server-side.
    async fn logout(&self) -> Result<(), ApiError>;

    /// Verify the stored access token and return who it belongs to.
    async fn current_user(&self) -> Result<CurrentUser, ApiError>;

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError>;
}

/// Landing dashboard statistics endpoint.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn dashboard_stats(&self, tenant_id: &TenantId) -> Result<DashboardStats, ApiError>;
}

//! HTTP implementation of the backend contracts (reqwest).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use deliveryhub_core::TenantId;

use crate::api::{AuthApi, AuthPayload, Credentials, CurrentUser, DashboardApi, Registration};
use crate::config::ClientConfig;
use crate::dashboard::DashboardStats;
use crate::error::ApiError;
use crate::token_store::TokenStore;

/// Header carrying the active tenant on tenant-scoped endpoints.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: Option<bool>,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed client for the DeliveryHub API.
///
/// Bearer tokens are read from the injected [`TokenStore`] on every request,
/// so a login performed through the session manager is picked up immediately.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.access_token().ok_or(ApiError::NoToken)?;
        Ok(request.bearer_auth(token))
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best effort: any `message` field is surfaced.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|e| e.message);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    /// Send and unwrap `data` from the envelope.
    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(request).await?;
        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        if envelope.success == Some(false) {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: envelope.message,
            });
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Decode("response has no data".to_string()))
    }

    /// Send, check the status and an explicit `success: false`, ignore any data.
    async fn execute(request: RequestBuilder) -> Result<(), ApiError> {
        let response = Self::send(request).await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            Ok(Envelope {
                success: Some(false),
                message,
                ..
            }) => Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, ApiError> {
        Self::fetch(self.http.post(self.url("auth/login")).json(credentials)).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, ApiError> {
        Self::fetch(self.http.post(self.url("auth/register")).json(registration)).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let mut request = self.http.post(self.url("auth/logout"));
        if let Some(refresh) = self.tokens.refresh_token() {
            request = request.json(&json!({ "refreshToken": refresh }));
        }
        Self::execute(self.authorized(request)?).await
    }

    async fn current_user(&self) -> Result<CurrentUser, ApiError> {
        let request = self.authorized(self.http.get(self.url("auth/me")))?;
        Self::fetch(request).await
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url("auth/forgot-password"))
            .json(&json!({ "email": email }));
        Self::execute(request).await
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.url("auth/reset-password"))
            .json(&json!({ "token": token, "password": new_password }));
        Self::execute(request).await
    }
}

#[async_trait]
impl DashboardApi for HttpApiClient {
    async fn dashboard_stats(&self, tenant_id: &TenantId) -> Result<DashboardStats, ApiError> {
        let request = self
            .http
            .get(self.url("dashboard/stats"))
            .header(TENANT_HEADER, tenant_id.as_str());
        Self::fetch(self.authorized(request)?).await
    }
}

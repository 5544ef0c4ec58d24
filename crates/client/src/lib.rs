//! `deliveryhub-client`
//!
//! **Responsibility:** the I/O side of the dashboard client.
//!
//! This crate provides:
//! - The backend contracts (`AuthApi`, `DashboardApi`) and their HTTP implementation
//! - Credential storage (`TokenStore`)
//! - The `SessionManager` driving the session state machine from `deliveryhub-auth`
//! - Dashboard summary and navigation gating built on the session
//!
//! Policy decisions stay in `deliveryhub-auth`; nothing here re-implements them.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod manager;
pub mod sections;
pub mod token_store;

pub use api::{AuthApi, AuthPayload, Credentials, CurrentUser, DashboardApi, Registration};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::{DashboardOverview, DashboardService, DashboardStats, SummaryCard};
pub use error::{ApiError, SessionError, TokenStoreError};
pub use http::HttpApiClient;
pub use manager::SessionManager;
pub use sections::{RouteDecision, Section};
pub use token_store::{FileTokenStore, InMemoryTokenStore, TokenPair, TokenStore};

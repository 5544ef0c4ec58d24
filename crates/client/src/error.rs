//! Client error types.

use thiserror::Error;

/// Failure of a backend call.
///
/// The variants exist for logging; callers only ever see the normalized
/// message from [`ApiError::user_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No access token is stored for an endpoint that needs one.
    #[error("no access token stored")]
    NoToken,

    /// The server answered with a failure (bad credentials, duplicate
    /// registration, expired reset token, ...).
    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    /// The server could not be reached or the request timed out.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a payload we could not read.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// Short tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::NoToken => "no_token",
            ApiError::Rejected { .. } => "auth_rejected",
            ApiError::Transport(_) => "transport_failure",
            ApiError::Decode(_) => "decode_failure",
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Displayable message: the server's own message if it sent one,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("token storage is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure reported by [`crate::SessionManager`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The operation failed; the message is safe to show to the user.
    #[error("{0}")]
    Failed(String),

    /// The operation needs an authenticated session.
    #[error("no authenticated user")]
    NotAuthenticated,

    /// A newer session change started while this call was in flight; its
    /// result was discarded.
    #[error("superseded by a newer session change")]
    Superseded,
}

//! Credential storage.
//!
//! The session manager treats tokens as opaque: it writes them after a
//! successful login/register, reads the access token to decide whether to
//! hydrate, and clears them on logout or failed hydration.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::TokenStoreError;

/// Access + refresh token pair issued by the backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

// Tokens never reach logs.
impl core::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Storage for the current credential pair.
///
/// `clear_tokens` must be safe to call any number of times.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), TokenStoreError>;
    fn clear_tokens(&self);
}

impl<S> TokenStore for Arc<S>
where
    S: TokenStore + ?Sized,
{
    fn access_token(&self) -> Option<String> {
        (**self).access_token()
    }

    fn refresh_token(&self) -> Option<String> {
        (**self).refresh_token()
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        (**self).set_tokens(tokens)
    }

    fn clear_tokens(&self) {
        (**self).clear_tokens()
    }
}

/// In-memory token store for tests and short-lived clients.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    inner: RwLock<Option<TokenPair>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            inner: RwLock::new(Some(tokens)),
        }
    }

    fn current(&self) -> Option<TokenPair> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn access_token(&self) -> Option<String> {
        self.current().map(|t| t.access_token).filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.current().map(|t| t.refresh_token).filter(|t| !t.is_empty())
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens.clone());
        Ok(())
    }

    fn clear_tokens(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Token store persisted as a JSON file, so a session survives restarts.
///
/// The file is read on every access; several processes sharing the path see
/// each other's writes.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<TokenPair>, TokenStoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn current(&self) -> Option<TokenPair> {
        match self.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "ignoring unreadable token file"
                );
                None
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Option<String> {
        self.current().map(|t| t.access_token).filter(|t| !t.is_empty())
    }

    fn refresh_token(&self) -> Option<String> {
        self.current().map(|t| t.refresh_token).filter(|t| !t.is_empty())
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(tokens)?)?;
        Ok(())
    }

    fn clear_tokens(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove token file"
                );
            }
        }
    }
}

//! User and tenant as served by the backend.
//!
//! Both are read models: the client never creates them, it only receives them
//! from login/register/me responses and patches profile fields locally.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use deliveryhub_core::de::null_as_default;
use deliveryhub_core::{TenantId, UserId};

use crate::{Permission, Role};

/// The authenticated user.
///
/// Profile fields the client has no typed use for are kept in `profile` so a
/// patched user serializes back with everything the server sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: BTreeSet<Permission>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn new(id: UserId, role: Role) -> Self {
        Self {
            id,
            role,
            permissions: BTreeSet::new(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            avatar: None,
            last_login_at: None,
            profile: Map::new(),
        }
    }

    pub fn with_permissions<I, P>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Permission>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }

    /// Shallow merge: every field set in `patch` replaces the current value,
    /// everything else is left untouched.
    pub fn merge(&mut self, patch: UserPatch) {
        let UserPatch {
            role,
            permissions,
            email,
            first_name,
            last_name,
            phone,
            avatar,
            profile,
        } = patch;

        if let Some(role) = role {
            self.role = role;
        }
        if let Some(permissions) = permissions {
            self.permissions = permissions;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if phone.is_some() {
            self.phone = phone;
        }
        if avatar.is_some() {
            self.avatar = avatar;
        }
        self.profile.extend(profile);
    }
}

/// Partial user update applied by [`User::merge`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeSet<Permission>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserPatch {
    pub fn first_name(value: impl Into<String>) -> Self {
        Self {
            first_name: Some(value.into()),
            ..Default::default()
        }
    }
}

/// The tenant (customer organization) the session is scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: TenantId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan: Option<String>,
}

impl Tenant {
    pub fn new(id: TenantId) -> Self {
        Self {
            id,
            name: String::new(),
            subscription_plan: None,
        }
    }
}

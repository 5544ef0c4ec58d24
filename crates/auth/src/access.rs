//! Resources and actions named by `can_access` checks.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A protected area of the dashboard (e.g. "orders", "billing").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Cow<'static, str>);

/// An operation on a resource (e.g. "read", "write", "delete").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Resource {
    pub const ORDERS: Resource = Resource(Cow::Borrowed("orders"));
    pub const CUSTOMERS: Resource = Resource(Cow::Borrowed("customers"));
    pub const PRODUCTS: Resource = Resource(Cow::Borrowed("products"));
    pub const DELIVERY_PROVIDERS: Resource = Resource(Cow::Borrowed("delivery-providers"));
    pub const COMMUNICATIONS: Resource = Resource(Cow::Borrowed("communications"));
    pub const AUTOMATION: Resource = Resource(Cow::Borrowed("automation"));
    pub const ANALYTICS: Resource = Resource(Cow::Borrowed("analytics"));
    pub const USERS: Resource = Resource(Cow::Borrowed("users"));
    pub const SETTINGS: Resource = Resource(Cow::Borrowed("settings"));
    pub const BILLING: Resource = Resource(Cow::Borrowed("billing"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Action {
    pub const READ: Action = Action(Cow::Borrowed("read"));
    pub const WRITE: Action = Action(Cow::Borrowed("write"));
    pub const DELETE: Action = Action(Cow::Borrowed("delete"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks default to reading.
impl Default for Action {
    fn default() -> Self {
        Action::READ
    }
}

impl From<&'static str> for Resource {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Resource {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&'static str> for Action {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for Action {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

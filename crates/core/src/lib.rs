//! `deliveryhub-core`: shared identifiers, wire helpers and the domain error model.
//!
//! This crate contains no I/O and no authorization policy.

pub mod de;
pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{TenantId, UserId};

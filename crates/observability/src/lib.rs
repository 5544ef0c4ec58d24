//! Tracing/logging setup shared by DeliveryHub binaries.

/// Tracing configuration (filters, formats).
pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with_default};

//! Serde helpers for lenient wire formats.

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as the type's default.
///
/// Combine with `#[serde(default)]` so a missing key behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

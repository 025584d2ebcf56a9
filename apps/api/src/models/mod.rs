pub mod jobs;
pub mod resume;

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing field. Models often emit
/// `"website": null` where the schema says string.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

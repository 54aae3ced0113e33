//! Wire types of the mosparo API.
//!
//! Requests serialize and responses deserialize with camelCase keys. Response
//! fields are optional on the wire, so absent or `null` values fall back to
//! their defaults instead of failing the whole body.

mod health;
mod statistic;
mod verification;

pub use health::HealthCheckResult;
pub use statistic::{Statistic, StatisticData, StatisticResult};
pub use verification::{FieldStatus, Issue, VerificationRequest, VerificationResult};

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

//! Domain types shared between the db layer, services and controllers.

mod blog;
mod contact;
mod exclusive;
mod inquiry;
mod listing;
mod newsletter;

pub use blog::*;
pub use contact::*;
pub use exclusive::*;
pub use inquiry::*;
pub use listing::*;
pub use newsletter::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize an optional f64 from a number or a numeric string. Filter
/// forms submit numbers as strings depending on the transport.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize an optional i64 from a number or a numeric string.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize an optional u32 page number from a number or a string.
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().map(|v| v as u32),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

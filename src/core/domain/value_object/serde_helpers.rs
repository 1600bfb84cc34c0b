//! Serde helpers for the loosely-typed fields of Proxmox API payloads.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an optional `u32` that the API sends either as a number or a string
/// (LXC listings report `vmid` as `"200"`).
pub mod lenient_u32 {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid id: {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid id: {:?}", s))),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected number or string, got {}",
                other
            ))),
        }
    }
}

/// Deserializes a flag the API sends as `0`/`1`, `"0"`/`"1"`, or a JSON bool.
/// Missing or null flags are `false`.
pub mod lenient_bool {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_u64().is_some_and(|n| n != 0),
            Some(Value::String(s)) => matches!(s.as_str(), "1" | "true"),
            _ => false,
        })
    }
}

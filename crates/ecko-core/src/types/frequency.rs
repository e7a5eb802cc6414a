//! Frequency policy: how many times a registered response may be served.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};
use std::num::NonZeroU32;

/// How often a registered response may be served before it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// Served on every request until cleared or replaced by another `Always`
    Always,
    /// Served exactly one time
    Once,
    /// Served `remaining` more times
    Limit { remaining: NonZeroU32 },
}

/// What happens to a response after it has been served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// Stays in its stack
    Keep,
    /// Must be removed from its stack
    Remove,
}

impl Frequency {
    /// `Limit` frequency; `None` when `limit` is zero.
    pub fn limit(limit: u32) -> Option<Self> {
        NonZeroU32::new(limit).map(|remaining| Frequency::Limit { remaining })
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Frequency::Always)
    }

    /// Record one serving and report whether the response survives it.
    ///
    /// A `Limit` counter is decremented in place; it never reaches zero while
    /// the response is kept.
    pub fn consume(&mut self) -> Consumption {
        match self {
            Frequency::Always => Consumption::Keep,
            Frequency::Once => Consumption::Remove,
            Frequency::Limit { remaining } => match NonZeroU32::new(remaining.get() - 1) {
                Some(left) => {
                    *remaining = left;
                    Consumption::Keep
                }
                None => Consumption::Remove,
            },
        }
    }
}

impl Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Frequency::Always => serializer.serialize_str("always"),
            Frequency::Once => serializer.serialize_str("once"),
            Frequency::Limit { remaining } => {
                json!({ "type": "limit", "limit": remaining.get() }).serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(s) if s == "always" => Ok(Frequency::Always),
            Value::String(s) if s == "once" => Ok(Frequency::Once),
            Value::Object(map) if map.get("type").and_then(Value::as_str) == Some("limit") => {
                let limit = map
                    .get("limit")
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| serde::de::Error::custom("Limit must be a positive integer"))?;
                Frequency::limit(limit)
                    .ok_or_else(|| serde::de::Error::custom("Limit must be a positive integer"))
            }
            _ => Err(serde::de::Error::custom(
                "Frequency must be \"always\", \"once\" or { type: limit, limit: n }",
            )),
        }
    }
}

//! Custom serde deserializers for flexible type handling
//!
//! Portal middleware is loose about numeric types: counters such as
//! `total_items` arrive as `"10"` on some portal versions and `10` on
//! others, and identifiers may be either strings or integers. These
//! deserializers accept both forms.

use serde::{Deserialize, Deserializer, de};

/// Deserialize a counter that may be a JSON integer or a numeric string.
pub fn deserialize_flexible_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleCount {
        Int(u32),
        String(String),
    }

    let value: Option<FlexibleCount> = Option::deserialize(deserializer)?;

    match value {
        None => Ok(0),
        Some(FlexibleCount::Int(n)) => Ok(n),
        Some(FlexibleCount::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid count: {}", s))),
    }
}

/// Deserialize an identifier that may be a JSON string or a number.
pub fn deserialize_flexible_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleId {
        String(String),
        Int(i64),
    }

    let value: Option<FlexibleId> = Option::deserialize(deserializer)?;

    Ok(match value {
        None => None,
        Some(FlexibleId::String(s)) => Some(s),
        Some(FlexibleId::Int(n)) => Some(n.to_string()),
    })
}

/// Deserialize an episode list whose entries may be integers or numeric
/// strings. Non-numeric entries are rejected.
pub fn deserialize_flexible_episodes<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleEpisode {
        Int(u32),
        String(String),
    }

    let value: Option<Vec<FlexibleEpisode>> = Option::deserialize(deserializer)?;

    value
        .unwrap_or_default()
        .into_iter()
        .map(|entry| match entry {
            FlexibleEpisode::Int(n) => Ok(n),
            FlexibleEpisode::String(s) => s
                .trim()
                .parse()
                .map_err(|_| de::Error::custom(format!("invalid episode number: {}", s))),
        })
        .collect()
}

//! Typed parsing of raw configuration strings.

use super::error::ConfigError;
use super::key::ConfigKey;
use std::str::FromStr;
use std::time::Duration;

/// Parse a boolean token.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn bool_value(key: ConfigKey, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value.trim()).ok_or_else(|| ConfigError::InvalidBool {
        key,
        value: value.to_string(),
    })
}

pub(crate) fn duration_value(key: ConfigKey, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        key,
        value: value.to_string(),
        source,
    })
}

pub(crate) fn number_value<T>(key: ConfigKey, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidNumber {
            key,
            value: value.to_string(),
            source,
        })
}

//! Configuration error types.

use super::key::ConfigKey;
use thiserror::Error;

/// Errors that can occur while resolving the registry.
///
/// All of them are fatal: a service must not start with a value it cannot
/// parse.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A duration value is not in `humantime` syntax.
    #[error("invalid duration for {key}: {value:?}: {source}")]
    InvalidDuration {
        key: ConfigKey,
        value: String,
        source: humantime::DurationError,
    },

    /// A boolean value is not one of the accepted tokens.
    #[error("invalid boolean for {key}: {value:?}")]
    InvalidBool { key: ConfigKey, value: String },

    /// An integer value does not parse or is out of range.
    #[error("invalid number for {key}: {value:?}: {source}")]
    InvalidNumber {
        key: ConfigKey,
        value: String,
        source: std::num::ParseIntError,
    },

    /// A redirect whitelist entry is neither an absolute URL nor a valid pattern.
    #[error("invalid redirect entry for {key}: {value:?}: {message}")]
    InvalidRedirectEntry {
        key: ConfigKey,
        value: String,
        message: String,
    },

    /// An environment domain name is not recognized.
    #[error("unknown environment domain for {key}: {value:?}")]
    UnknownEnvironmentDomain { key: ConfigKey, value: String },
}

impl ConfigError {
    /// The key whose value failed to parse.
    pub fn key(&self) -> ConfigKey {
        match self {
            Self::InvalidDuration { key, .. }
            | Self::InvalidBool { key, .. }
            | Self::InvalidNumber { key, .. }
            | Self::InvalidRedirectEntry { key, .. }
            | Self::UnknownEnvironmentDomain { key, .. } => *key,
        }
    }
}

//! Configuration registry resolved from environment variables.
//!
//! Every service reads its settings from `F8_`-prefixed variables once at
//! startup. Unset variables fall back to compiled-in development defaults.

mod error;
mod key;
mod parse;
mod registry;
mod store;

pub use error::ConfigError;
pub use key::ConfigKey;
pub use parse::{parse_bool, parse_list};
pub use registry::{
    Registry, DEFAULT_LOG_LEVEL, DEV_MODE_KEYCLOAK_REALM, DEV_MODE_VALID_REDIRECT_URLS,
};
pub use store::{ValueStore, ENV_PREFIX};

//! Service Config - Shared configuration for backend services.
//!
//! This crate provides the configuration building blocks every service needs:
//!
//! - **config**: Immutable registry resolved from `F8_*` environment variables
//! - **service_url**: Sibling service URLs derived from the inbound request host
//! - **redirect**: Post-authentication redirect validation
//! - **guard**: Middleware rejecting requests with unsafe redirect targets
//! - **bootstrap**: Tracing initialization utilities
//!
//! # Features
//!
//! - `guard` - Redirect guard middleware (enabled by default)
//! - `bootstrap` - Tracing setup (enabled by default)
//! - `full` - All features
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use service_config::{init_tracing_from, RedirectGuardLayer, Registry};
//!
//! fn main() -> Result<(), service_config::ConfigError> {
//!     let config = Arc::new(Registry::from_env()?);
//!     init_tracing_from(&config);
//!
//!     let router = my_routes().layer(RedirectGuardLayer::new(config.clone()));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod redirect;
pub mod service_url;

#[cfg(feature = "guard")]
pub mod guard;

#[cfg(feature = "bootstrap")]
pub mod bootstrap;

// Re-exports for convenience
pub use config::{ConfigError, ConfigKey, Registry, ValueStore, ENV_PREFIX};
pub use redirect::{EnvironmentDomain, RedirectError, RedirectValidator, RedirectWhitelist};
pub use service_url::{replace_domain_prefix, service_url, InboundRequest, RequestInfo, ServiceUrlError};

#[cfg(feature = "guard")]
pub use guard::{RedirectGuardLayer, RedirectGuardService};

#[cfg(feature = "bootstrap")]
pub use bootstrap::{init_tracing, init_tracing_from};

//! Tracing initialization utilities.

use crate::config::Registry;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing with the given default filter.
///
/// The filter can be overridden by the `RUST_LOG` environment variable.
///
/// # Example
///
/// ```rust,no_run
/// use service_config::init_tracing;
///
/// // Enable debug logging for your crate, info for everything else
/// init_tracing("my_service=debug,info");
/// ```
///
/// # Filter Syntax
///
/// The filter follows the `tracing_subscriber::EnvFilter` syntax:
/// - `info` - Enable info level for all targets
/// - `my_crate=debug` - Enable debug level for `my_crate`
/// - `my_crate=debug,info` - Debug for `my_crate`, info for everything else
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(build_filter(default_filter))
        .init();
}

/// Initialize tracing with the registry's `F8_LOG_LEVEL` as default filter.
///
/// Level names used by other services are accepted: `warning` means `warn`,
/// `fatal` and `panic` mean `error`. `RUST_LOG` still takes precedence.
pub fn init_tracing_from(registry: &Registry) {
    init_tracing(&level_directive(registry.log_level()));
}

/// `RUST_LOG` if set and valid, else [`default_filter`].
fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| self::default_filter(default_filter))
}

/// `directives` if valid, else `info`.
fn default_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Translate a bare level name into an `EnvFilter` level.
///
/// Anything that is not a known level name is returned unchanged, so full
/// filter expressions keep working.
fn level_directive(level: &str) -> String {
    let trimmed = level.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "fatal" | "panic" => "error".to_string(),
        known @ ("trace" | "debug" | "info" | "warn" | "error" | "off") => known.to_string(),
        _ => trimmed.to_string(),
    }
}

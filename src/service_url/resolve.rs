//! Domain prefix substitution.

use super::request::InboundRequest;
use thiserror::Error;

/// Errors from service URL resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceUrlError {
    /// The request carries no host at all.
    #[error("request has no host")]
    MissingHost,

    /// The host has no domain left once its leading label is removed.
    #[error("host {host:?} is too short: must contain more than one domain label")]
    HostTooShort { host: String },
}

/// Replace the leading label of `host` with `prefix`.
///
/// Everything after the first `.` is kept verbatim, including a port.
///
/// ```rust
/// use service_config::replace_domain_prefix;
///
/// assert_eq!(
///     replace_domain_prefix("api.service.domain.org", "sso").unwrap(),
///     "sso.service.domain.org"
/// );
/// assert!(replace_domain_prefix("org", "sso").is_err());
/// ```
pub fn replace_domain_prefix(host: &str, prefix: &str) -> Result<String, ServiceUrlError> {
    match host.split_once('.') {
        Some((_, rest)) if !rest.is_empty() => Ok(format!("{prefix}.{rest}")),
        _ => Err(ServiceUrlError::HostTooShort {
            host: host.to_string(),
        }),
    }
}

/// Build the URL of a sibling service reached under `prefix`.
///
/// The scheme follows the inbound request: `https` when it came in over
/// HTTPS, `http` otherwise. Exactly one `/` separates host and `path`.
pub fn service_url<R>(req: &R, prefix: &str, path: &str) -> Result<String, ServiceUrlError>
where
    R: InboundRequest + ?Sized,
{
    let host = req.host().ok_or(ServiceUrlError::MissingHost)?;
    let host = replace_domain_prefix(host, prefix)?;
    Ok(format!(
        "{}://{host}/{}",
        req.scheme(),
        path.trim_start_matches('/')
    ))
}

//! Redirect decision.

use super::exception::{EnvironmentDomain, SameOriginException};
use super::whitelist::RedirectWhitelist;
use crate::service_url::InboundRequest;
use thiserror::Error;
use url::Url;

/// Errors that prevent a redirect from being evaluated.
///
/// These are distinct from a rejection. Callers must not redirect in either
/// case.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    /// The request carries no host.
    #[error("request has no host")]
    MissingHost,

    /// The request host is not a valid `host[:port]`.
    #[error("invalid request host {host:?}")]
    InvalidHost { host: String },

    /// The redirect target is not an absolute URL.
    #[error("invalid redirect URL {candidate:?}: {source}")]
    InvalidCandidate {
        candidate: String,
        source: url::ParseError,
    },
}

/// Decides whether a redirect target is safe to honor.
///
/// Usually obtained from [`Registry::redirect_validator`](crate::Registry::redirect_validator).
#[derive(Clone, Copy, Debug)]
pub struct RedirectValidator<'a> {
    whitelist: &'a RedirectWhitelist,
    domains: &'a [EnvironmentDomain],
}

impl<'a> RedirectValidator<'a> {
    pub fn new(whitelist: &'a RedirectWhitelist, domains: &'a [EnvironmentDomain]) -> Self {
        Self { whitelist, domains }
    }

    /// Evaluate `candidate` for a redirect issued while handling `req`.
    pub fn validate<R>(&self, req: &R, candidate: &str) -> Result<bool, RedirectError>
    where
        R: InboundRequest + ?Sized,
    {
        let host = req.host().ok_or(RedirectError::MissingHost)?;
        self.validate_for_host(host, candidate)
    }

    /// Evaluate `candidate` for a request addressed to `host` (port optional).
    ///
    /// A whitelist match is sufficient. Otherwise the same-origin exception
    /// for `host` decides.
    pub fn validate_for_host(&self, host: &str, candidate: &str) -> Result<bool, RedirectError> {
        let target = Url::parse(candidate).map_err(|source| RedirectError::InvalidCandidate {
            candidate: candidate.to_string(),
            source,
        })?;
        let exception = self.exception_for_host(host)?;

        let accepted = self.whitelist.matches(candidate, &target) || exception.allows(&target);
        tracing::debug!(host, candidate, ?exception, accepted, "evaluated redirect");
        Ok(accepted)
    }

    /// The same-origin exception that applies to requests for `host`.
    pub fn exception_for_host(&self, host: &str) -> Result<SameOriginException, RedirectError> {
        let host = normalize_host(host)?;
        Ok(SameOriginException::for_host(&host, self.domains))
    }
}

/// Lower-case `host[:port]` and drop the port.
fn normalize_host(host: &str) -> Result<String, RedirectError> {
    let invalid = || RedirectError::InvalidHost {
        host: host.to_string(),
    };
    if host.is_empty() || host.contains(['/', '?', '#', '@', '\\']) {
        return Err(invalid());
    }
    let url = Url::parse(&format!("http://{host}/")).map_err(|_| invalid())?;
    url.host_str().map(str::to_string).ok_or_else(invalid)
}

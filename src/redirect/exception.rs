//! Same-origin exception for recognized environment domains.

use std::fmt;
use url::Url;

/// Environment domains that get a redirect exception.
///
/// The set is closed on purpose. Adding a variant widens who may redirect
/// where and needs a security review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvironmentDomain {
    /// The preview environment, `prod-preview.openshift.io`.
    ProdPreview,
    /// The public production environment, `openshift.io`.
    Production,
}

impl EnvironmentDomain {
    pub const ALL: [EnvironmentDomain; 2] = [Self::ProdPreview, Self::Production];

    /// The domain the environment's API hosts live under.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::ProdPreview => "prod-preview.openshift.io",
            Self::Production => "openshift.io",
        }
    }

    /// The name used in configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ProdPreview => "prod-preview",
            Self::Production => "production",
        }
    }

    /// Whether redirects back to a local development server are allowed.
    pub const fn allows_loopback(self) -> bool {
        matches!(self, Self::ProdPreview)
    }

    /// Look up a domain by its configuration name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Look up a domain by its exact suffix.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|domain| domain.suffix() == suffix)
    }
}

impl fmt::Display for EnvironmentDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The exception rule that applies to one request host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameOriginException {
    /// Unrecognized host: nothing beyond the whitelist.
    None,
    /// Host under a recognized environment domain.
    Environment(EnvironmentDomain),
}

impl SameOriginException {
    /// Derive the exception for a normalized (lower-case, port-free) host.
    ///
    /// The host minus its leading label must equal an enabled environment
    /// suffix exactly. Deeper subdomains don't qualify.
    pub fn for_host(host: &str, enabled: &[EnvironmentDomain]) -> Self {
        host.split_once('.')
            .and_then(|(_, rest)| EnvironmentDomain::from_suffix(rest))
            .filter(|domain| enabled.contains(domain))
            .map_or(Self::None, Self::Environment)
    }

    /// Whether this exception accepts `target`.
    pub fn allows(&self, target: &Url) -> bool {
        let Self::Environment(domain) = self else {
            return false;
        };
        if !matches!(target.scheme(), "http" | "https") {
            return false;
        }
        // userinfo could disguise the real host in naive consumers
        if !target.username().is_empty() || target.password().is_some() {
            return false;
        }
        match target.host_str() {
            Some(host) if host == domain.suffix() => true,
            Some("localhost" | "127.0.0.1") => domain.allows_loopback(),
            _ => false,
        }
    }
}

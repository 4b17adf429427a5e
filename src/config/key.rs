//! Known configuration keys.

use super::store::ENV_PREFIX;
use std::fmt;

/// Keys understood by the [`Registry`](super::Registry).
///
/// The environment variable for a key is [`ENV_PREFIX`] followed by
/// [`as_str`](Self::as_str), e.g. `F8_KEYCLOAK_REALM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    KeycloakRealm,
    KeycloakDomainPrefix,
    KeycloakUrl,
    LogLevel,
    DeveloperModeEnabled,
    HttpAddress,
    PostgresHost,
    PostgresPort,
    PostgresUser,
    PostgresPassword,
    PostgresDatabase,
    PostgresSslMode,
    PostgresConnectionTimeout,
    PostgresConnectionRetrySleep,
    PostgresTransactionTimeout,
    RedirectValid,
    RedirectExceptionDomains,
    OpenshiftProxyUrl,
}

impl ConfigKey {
    /// All keys, in documentation order.
    pub const ALL: [ConfigKey; 18] = [
        Self::KeycloakRealm,
        Self::KeycloakDomainPrefix,
        Self::KeycloakUrl,
        Self::LogLevel,
        Self::DeveloperModeEnabled,
        Self::HttpAddress,
        Self::PostgresHost,
        Self::PostgresPort,
        Self::PostgresUser,
        Self::PostgresPassword,
        Self::PostgresDatabase,
        Self::PostgresSslMode,
        Self::PostgresConnectionTimeout,
        Self::PostgresConnectionRetrySleep,
        Self::PostgresTransactionTimeout,
        Self::RedirectValid,
        Self::RedirectExceptionDomains,
        Self::OpenshiftProxyUrl,
    ];

    /// The normalized (unprefixed, upper-case) key name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeycloakRealm => "KEYCLOAK_REALM",
            Self::KeycloakDomainPrefix => "KEYCLOAK_DOMAIN_PREFIX",
            Self::KeycloakUrl => "KEYCLOAK_URL",
            Self::LogLevel => "LOG_LEVEL",
            Self::DeveloperModeEnabled => "DEVELOPER_MODE_ENABLED",
            Self::HttpAddress => "HTTP_ADDRESS",
            Self::PostgresHost => "POSTGRES_HOST",
            Self::PostgresPort => "POSTGRES_PORT",
            Self::PostgresUser => "POSTGRES_USER",
            Self::PostgresPassword => "POSTGRES_PASSWORD",
            Self::PostgresDatabase => "POSTGRES_DATABASE",
            Self::PostgresSslMode => "POSTGRES_SSLMODE",
            Self::PostgresConnectionTimeout => "POSTGRES_CONNECTION_TIMEOUT",
            Self::PostgresConnectionRetrySleep => "POSTGRES_CONNECTION_RETRYSLEEP",
            Self::PostgresTransactionTimeout => "POSTGRES_TRANSACTION_TIMEOUT",
            Self::RedirectValid => "REDIRECT_VALID",
            Self::RedirectExceptionDomains => "REDIRECT_EXCEPTION_DOMAINS",
            Self::OpenshiftProxyUrl => "OPENSHIFT_PROXY_URL",
        }
    }

    /// The environment variable name, including [`ENV_PREFIX`].
    pub fn env_var(self) -> String {
        format!("{ENV_PREFIX}{}", self.as_str())
    }

    /// Whether the value must be kept out of logs.
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::PostgresPassword)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_env_var_is_prefixed() {
        assert_eq!(ConfigKey::KeycloakRealm.env_var(), "F8_KEYCLOAK_REALM");
        assert_eq!(
            ConfigKey::PostgresTransactionTimeout.env_var(),
            "F8_POSTGRES_TRANSACTION_TIMEOUT"
        );
    }

    #[test]
    fn test_key_names_are_unique_and_upper_case() {
        let names: HashSet<_> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), ConfigKey::ALL.len());
        assert!(names.iter().all(|n| *n == n.to_ascii_uppercase()));
    }

    #[test]
    fn test_only_password_is_secret() {
        let secrets: Vec<_> = ConfigKey::ALL.iter().filter(|k| k.is_secret()).collect();
        assert_eq!(secrets, vec![&ConfigKey::PostgresPassword]);
    }
}

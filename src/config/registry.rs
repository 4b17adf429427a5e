//! The resolved configuration registry.

use super::error::ConfigError;
use super::key::ConfigKey;
use super::parse::{bool_value, duration_value, number_value, parse_list};
use super::store::ValueStore;
use crate::redirect::{EnvironmentDomain, RedirectError, RedirectValidator, RedirectWhitelist};
use crate::service_url::{service_url, InboundRequest, ServiceUrlError};
use std::fmt;
use std::time::Duration;

/// Keycloak realm used when `F8_KEYCLOAK_REALM` is unset.
pub const DEV_MODE_KEYCLOAK_REALM: &str = "fabric8-test";

/// Log level used when `F8_LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Redirect whitelist used when `F8_REDIRECT_VALID` is unset or empty.
pub const DEV_MODE_VALID_REDIRECT_URLS: &[&str] = &[
    "http://localhost:3000/",
    "http://localhost:8080/",
    "http://127.0.0.1:3000/",
    "http://127.0.0.1:8080/",
];

const DEFAULT_KEYCLOAK_DOMAIN_PREFIX: &str = "sso";
const DEFAULT_HTTP_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_POSTGRES_HOST: &str = "localhost";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "postgres";
const DEFAULT_POSTGRES_PASSWORD: &str = "mysecretpassword";
const DEFAULT_POSTGRES_DATABASE: &str = "postgres";
const DEFAULT_POSTGRES_SSLMODE: &str = "disable";
const DEFAULT_POSTGRES_CONNECTION_TIMEOUT: &str = "5s";
const DEFAULT_POSTGRES_CONNECTION_RETRYSLEEP: &str = "1s";
const DEFAULT_POSTGRES_TRANSACTION_TIMEOUT: &str = "5m";
const DEFAULT_REDIRECT_EXCEPTION_DOMAINS: &str = "prod-preview,production";

/// Immutable configuration snapshot for a process.
///
/// Every value is resolved once, at construction, from `F8_*` environment
/// variables with the defaults below. To pick up new values build a new
/// registry and swap it in; there is no live reload.
///
/// | Variable | Default |
/// |----------|---------|
/// | `F8_KEYCLOAK_REALM` | `fabric8-test` |
/// | `F8_KEYCLOAK_DOMAIN_PREFIX` | `sso` |
/// | `F8_KEYCLOAK_URL` | (derived from the request) |
/// | `F8_LOG_LEVEL` | `info` |
/// | `F8_DEVELOPER_MODE_ENABLED` | `false` |
/// | `F8_HTTP_ADDRESS` | `0.0.0.0:8080` |
/// | `F8_POSTGRES_HOST` | `localhost` |
/// | `F8_POSTGRES_PORT` | `5432` |
/// | `F8_POSTGRES_USER` | `postgres` |
/// | `F8_POSTGRES_PASSWORD` | `mysecretpassword` |
/// | `F8_POSTGRES_DATABASE` | `postgres` |
/// | `F8_POSTGRES_SSLMODE` | `disable` |
/// | `F8_POSTGRES_CONNECTION_TIMEOUT` | `5s` |
/// | `F8_POSTGRES_CONNECTION_RETRYSLEEP` | `1s` |
/// | `F8_POSTGRES_TRANSACTION_TIMEOUT` | `5m` |
/// | `F8_REDIRECT_VALID` | local development URLs |
/// | `F8_REDIRECT_EXCEPTION_DOMAINS` | `prod-preview,production` |
/// | `F8_OPENSHIFT_PROXY_URL` | (disabled) |
///
/// # Example
///
/// ```rust
/// use service_config::{Registry, ValueStore};
/// use std::time::Duration;
///
/// let store = ValueStore::from_vars([("F8_POSTGRES_TRANSACTION_TIMEOUT", "6m")]);
/// let config = Registry::from_store(&store).unwrap();
/// assert_eq!(config.postgres_transaction_timeout(), Duration::from_secs(360));
/// ```
#[derive(Clone)]
pub struct Registry {
    keycloak_realm: String,
    keycloak_domain_prefix: String,
    keycloak_url: String,
    log_level: String,
    developer_mode_enabled: bool,
    http_address: String,
    postgres_host: String,
    postgres_port: u16,
    postgres_user: String,
    postgres_password: String,
    postgres_database: String,
    postgres_sslmode: String,
    postgres_connection_timeout: Duration,
    postgres_connection_retry_sleep: Duration,
    postgres_transaction_timeout: Duration,
    valid_redirect_urls: RedirectWhitelist,
    redirect_exception_domains: Vec<EnvironmentDomain>,
    openshift_proxy_url: String,
}

impl Registry {
    /// Resolve the registry from the current process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_store(&ValueStore::from_env())
    }

    /// Resolve the registry from an explicit store.
    pub fn from_store(store: &ValueStore) -> Result<Self, ConfigError> {
        let string = |key, default: &str| store.resolve(key, default).to_string();

        let registry = Self {
            keycloak_realm: string(ConfigKey::KeycloakRealm, DEV_MODE_KEYCLOAK_REALM),
            keycloak_domain_prefix: string(
                ConfigKey::KeycloakDomainPrefix,
                DEFAULT_KEYCLOAK_DOMAIN_PREFIX,
            ),
            keycloak_url: string(ConfigKey::KeycloakUrl, ""),
            log_level: string(ConfigKey::LogLevel, DEFAULT_LOG_LEVEL),
            developer_mode_enabled: bool_value(
                ConfigKey::DeveloperModeEnabled,
                store.resolve(ConfigKey::DeveloperModeEnabled, "false"),
            )?,
            http_address: string(ConfigKey::HttpAddress, DEFAULT_HTTP_ADDRESS),
            postgres_host: string(ConfigKey::PostgresHost, DEFAULT_POSTGRES_HOST),
            postgres_port: number_value(
                ConfigKey::PostgresPort,
                store.resolve(ConfigKey::PostgresPort, DEFAULT_POSTGRES_PORT),
            )?,
            postgres_user: string(ConfigKey::PostgresUser, DEFAULT_POSTGRES_USER),
            postgres_password: string(ConfigKey::PostgresPassword, DEFAULT_POSTGRES_PASSWORD),
            postgres_database: string(ConfigKey::PostgresDatabase, DEFAULT_POSTGRES_DATABASE),
            postgres_sslmode: string(ConfigKey::PostgresSslMode, DEFAULT_POSTGRES_SSLMODE),
            postgres_connection_timeout: duration(
                store,
                ConfigKey::PostgresConnectionTimeout,
                DEFAULT_POSTGRES_CONNECTION_TIMEOUT,
            )?,
            postgres_connection_retry_sleep: duration(
                store,
                ConfigKey::PostgresConnectionRetrySleep,
                DEFAULT_POSTGRES_CONNECTION_RETRYSLEEP,
            )?,
            postgres_transaction_timeout: duration(
                store,
                ConfigKey::PostgresTransactionTimeout,
                DEFAULT_POSTGRES_TRANSACTION_TIMEOUT,
            )?,
            valid_redirect_urls: redirect_whitelist(store)?,
            redirect_exception_domains: exception_domains(store)?,
            openshift_proxy_url: string(ConfigKey::OpenshiftProxyUrl, ""),
        };

        let overridden: Vec<_> = store.overridden().map(ConfigKey::as_str).collect();
        tracing::debug!(?overridden, "resolved configuration registry");
        Ok(registry)
    }

    /// Identity provider realm.
    pub fn keycloak_realm(&self) -> &str {
        &self.keycloak_realm
    }

    /// Leading host label of the identity provider, e.g. `sso`.
    pub fn keycloak_domain_prefix(&self) -> &str {
        &self.keycloak_domain_prefix
    }

    /// Explicit identity provider base URL, if configured.
    pub fn keycloak_url(&self) -> Option<&str> {
        (!self.keycloak_url.is_empty()).then_some(self.keycloak_url.as_str())
    }

    /// Log level name, e.g. `info` or `warning`.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Whether local developer mode is on.
    pub fn is_developer_mode_enabled(&self) -> bool {
        self.developer_mode_enabled
    }

    /// Address the HTTP server binds to.
    pub fn http_address(&self) -> &str {
        &self.http_address
    }

    /// Database host.
    pub fn postgres_host(&self) -> &str {
        &self.postgres_host
    }

    /// Database port.
    pub fn postgres_port(&self) -> u16 {
        self.postgres_port
    }

    /// Database user.
    pub fn postgres_user(&self) -> &str {
        &self.postgres_user
    }

    /// Database password. Never logged.
    pub fn postgres_password(&self) -> &str {
        &self.postgres_password
    }

    /// Database name.
    pub fn postgres_database(&self) -> &str {
        &self.postgres_database
    }

    /// libpq `sslmode`, e.g. `disable` or `require`.
    pub fn postgres_sslmode(&self) -> &str {
        &self.postgres_sslmode
    }

    /// Timeout for establishing a database connection.
    pub fn postgres_connection_timeout(&self) -> Duration {
        self.postgres_connection_timeout
    }

    /// Pause between database connection attempts.
    pub fn postgres_connection_retry_sleep(&self) -> Duration {
        self.postgres_connection_retry_sleep
    }

    /// Upper bound for a single database transaction.
    pub fn postgres_transaction_timeout(&self) -> Duration {
        self.postgres_transaction_timeout
    }

    /// libpq-style connection string for the configured database.
    pub fn postgres_config_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={} connect_timeout={}",
            self.postgres_host,
            self.postgres_port,
            self.postgres_user,
            self.postgres_password,
            self.postgres_database,
            self.postgres_sslmode,
            self.postgres_connection_timeout.as_secs(),
        )
    }

    /// Configured redirect whitelist.
    pub fn valid_redirect_urls(&self) -> &RedirectWhitelist {
        &self.valid_redirect_urls
    }

    /// Environment domains that get the same-origin redirect exception.
    pub fn redirect_exception_domains(&self) -> &[EnvironmentDomain] {
        &self.redirect_exception_domains
    }

    /// Proxy URL, or an empty string when the proxy is disabled.
    pub fn openshift_proxy_url(&self) -> &str {
        &self.openshift_proxy_url
    }

    /// Whether a proxy URL is configured.
    pub fn is_openshift_proxy_enabled(&self) -> bool {
        !self.openshift_proxy_url.is_empty()
    }

    /// Path of an OpenID Connect endpoint relative to the identity provider.
    pub fn open_id_connect_path(&self, suffix: &str) -> String {
        format!(
            "auth/realms/{}/protocol/openid-connect/{suffix}",
            self.keycloak_realm
        )
    }

    /// Absolute URL of an OpenID Connect endpoint.
    ///
    /// Uses `F8_KEYCLOAK_URL` when set, otherwise the sibling host of the
    /// request under [`keycloak_domain_prefix`](Self::keycloak_domain_prefix).
    pub fn keycloak_endpoint<R>(&self, req: &R, suffix: &str) -> Result<String, ServiceUrlError>
    where
        R: InboundRequest + ?Sized,
    {
        let path = self.open_id_connect_path(suffix);
        match self.keycloak_url() {
            Some(base) => Ok(format!("{}/{path}", base.trim_end_matches('/'))),
            None => service_url(req, &self.keycloak_domain_prefix, &path),
        }
    }

    /// OpenID Connect authorization endpoint.
    pub fn keycloak_endpoint_auth<R>(&self, req: &R) -> Result<String, ServiceUrlError>
    where
        R: InboundRequest + ?Sized,
    {
        self.keycloak_endpoint(req, "auth")
    }

    /// OpenID Connect token endpoint.
    pub fn keycloak_endpoint_token<R>(&self, req: &R) -> Result<String, ServiceUrlError>
    where
        R: InboundRequest + ?Sized,
    {
        self.keycloak_endpoint(req, "token")
    }

    /// OpenID Connect userinfo endpoint.
    pub fn keycloak_endpoint_userinfo<R>(&self, req: &R) -> Result<String, ServiceUrlError>
    where
        R: InboundRequest + ?Sized,
    {
        self.keycloak_endpoint(req, "userinfo")
    }

    /// OpenID Connect logout endpoint.
    pub fn keycloak_endpoint_logout<R>(&self, req: &R) -> Result<String, ServiceUrlError>
    where
        R: InboundRequest + ?Sized,
    {
        self.keycloak_endpoint(req, "logout")
    }

    /// Validator over this registry's whitelist and exception domains.
    pub fn redirect_validator(&self) -> RedirectValidator<'_> {
        RedirectValidator::new(&self.valid_redirect_urls, &self.redirect_exception_domains)
    }

    /// Whether `candidate` is a safe redirect target for `req`.
    pub fn is_valid_redirect<R>(&self, req: &R, candidate: &str) -> Result<bool, RedirectError>
    where
        R: InboundRequest + ?Sized,
    {
        self.redirect_validator().validate(req, candidate)
    }

    /// Whether `candidate` is a safe redirect target for a request
    /// addressed to `host` (port optional).
    pub fn is_valid_redirect_for_host(
        &self,
        host: &str,
        candidate: &str,
    ) -> Result<bool, RedirectError> {
        self.redirect_validator().validate_for_host(host, candidate)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keycloak_realm", &self.keycloak_realm)
            .field("keycloak_domain_prefix", &self.keycloak_domain_prefix)
            .field("keycloak_url", &self.keycloak_url)
            .field("log_level", &self.log_level)
            .field("developer_mode_enabled", &self.developer_mode_enabled)
            .field("http_address", &self.http_address)
            .field("postgres_host", &self.postgres_host)
            .field("postgres_port", &self.postgres_port)
            .field("postgres_user", &self.postgres_user)
            .field("postgres_password", &"<redacted>")
            .field("postgres_database", &self.postgres_database)
            .field("postgres_sslmode", &self.postgres_sslmode)
            .field("postgres_connection_timeout", &self.postgres_connection_timeout)
            .field("postgres_connection_retry_sleep", &self.postgres_connection_retry_sleep)
            .field("postgres_transaction_timeout", &self.postgres_transaction_timeout)
            .field("valid_redirect_urls", &self.valid_redirect_urls.entries())
            .field("redirect_exception_domains", &self.redirect_exception_domains)
            .field("openshift_proxy_url", &self.openshift_proxy_url)
            .finish()
    }
}

fn duration(store: &ValueStore, key: ConfigKey, default: &str) -> Result<Duration, ConfigError> {
    duration_value(key, store.resolve(key, default))
}

fn redirect_whitelist(store: &ValueStore) -> Result<RedirectWhitelist, ConfigError> {
    let entries = store
        .get(ConfigKey::RedirectValid)
        .map(parse_list)
        .unwrap_or_default();
    if entries.is_empty() {
        RedirectWhitelist::new(DEV_MODE_VALID_REDIRECT_URLS.iter().copied())
    } else {
        RedirectWhitelist::new(entries)
    }
}

fn exception_domains(store: &ValueStore) -> Result<Vec<EnvironmentDomain>, ConfigError> {
    let key = ConfigKey::RedirectExceptionDomains;
    let mut domains = Vec::new();
    for name in parse_list(store.resolve(key, DEFAULT_REDIRECT_EXCEPTION_DOMAINS)) {
        let domain = EnvironmentDomain::from_name(&name)
            .ok_or(ConfigError::UnknownEnvironmentDomain { key, value: name })?;
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    Ok(domains)
}

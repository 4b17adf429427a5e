//! Raw key/value store backing the registry.

use super::key::ConfigKey;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::ffi::OsString;

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "F8_";

/// Raw configuration overrides, read once from the environment.
///
/// Variable names are matched case-insensitively and stored without
/// [`ENV_PREFIX`], upper-cased. Empty values count as unset.
///
/// # Example
///
/// ```rust
/// use service_config::{ConfigKey, ValueStore};
///
/// let store = ValueStore::from_vars([("f8_log_level", "debug")]);
/// assert_eq!(store.resolve(ConfigKey::LogLevel, "info"), "debug");
/// assert_eq!(store.resolve(ConfigKey::KeycloakRealm, "fabric8-test"), "fabric8-test");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ValueStore {
    values: HashMap<String, String>,
}

impl ValueStore {
    /// Snapshot the `F8_*` variables of the current process.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars_os().filter_map(|(k, v): (OsString, OsString)| {
            Some((k.into_string().ok()?, v.into_string().ok()?))
        }))
    }

    /// Build a store from explicit name/value pairs.
    ///
    /// Names without the prefix are ignored, just like unrelated environment
    /// variables. When several spellings of one key are set, the exact
    /// upper-case name (`F8_LOG_LEVEL`) wins; among other spellings the
    /// lexicographically smallest name wins, so the result never depends on
    /// iteration order.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        // normalized key -> (original name, value)
        let mut found: HashMap<String, (String, String)> = HashMap::new();
        for (name, value) in vars {
            let name = name.as_ref();
            let Some(key) = strip_prefix(name) else {
                continue;
            };
            let value = value.into();
            if value.is_empty() {
                continue;
            }
            match found.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert((name.to_string(), value));
                }
                Entry::Occupied(mut slot) => {
                    if takes_precedence(name, &slot.get().0, slot.key()) {
                        slot.insert((name.to_string(), value));
                    }
                }
            }
        }
        let values = found
            .into_iter()
            .map(|(key, (_, value))| (key, value))
            .collect();
        Self { values }
    }

    /// Returns the override for `key`, if one is set.
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.values.get(key.as_str()).map(String::as_str)
    }

    /// Returns the override for `key`, or `default` when unset.
    pub fn resolve<'a>(&'a self, key: ConfigKey, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Known keys that carry an override.
    pub fn overridden(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| self.values.contains_key(key.as_str()))
    }
}

/// Whether `candidate` should replace `current` as the source of `key`.
fn takes_precedence(candidate: &str, current: &str, key: &str) -> bool {
    let canonical = |name: &str| name.strip_prefix(ENV_PREFIX) == Some(key);
    match (canonical(candidate), canonical(current)) {
        (true, false) => true,
        (false, true) => false,
        _ => candidate < current,
    }
}

fn strip_prefix(name: &str) -> Option<String> {
    let head = name.get(..ENV_PREFIX.len())?;
    if !head.eq_ignore_ascii_case(ENV_PREFIX) {
        return None;
    }
    let key = &name[ENV_PREFIX.len()..];
    (!key.is_empty()).then(|| key.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_returns_default_when_unset() {
        let store = ValueStore::from_vars(Vec::<(String, String)>::new());
        assert!(store.values.is_empty());
        assert_eq!(store.resolve(ConfigKey::LogLevel, "info"), "info");
        assert_eq!(store.get(ConfigKey::LogLevel), None);
    }

    #[test]
    fn test_resolve_returns_override() {
        let store = ValueStore::from_vars([("F8_LOG_LEVEL", "warning")]);
        assert_eq!(store.resolve(ConfigKey::LogLevel, "info"), "warning");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let store = ValueStore::from_vars([
            ("f8_keycloak_realm", "lower"),
            ("F8_Postgres_Host", "mixed"),
        ]);
        assert_eq!(store.get(ConfigKey::KeycloakRealm), Some("lower"));
        assert_eq!(store.get(ConfigKey::PostgresHost), Some("mixed"));
    }

    #[test]
    fn test_unprefixed_and_empty_values_are_ignored() {
        let store = ValueStore::from_vars([
            ("LOG_LEVEL", "debug"),
            ("F8_", "nothing"),
            ("F8_KEYCLOAK_REALM", ""),
            ("PATH", "/usr/bin"),
        ]);
        assert!(store.values.is_empty());
        assert_eq!(store.resolve(ConfigKey::KeycloakRealm, "dev"), "dev");
    }

    #[test]
    fn test_overridden_lists_known_keys_only() {
        let store = ValueStore::from_vars([
            ("F8_LOG_LEVEL", "debug"),
            ("F8_SOMETHING_ELSE", "x"),
        ]);
        assert_eq!(store.values.len(), 2);
        assert_eq!(store.overridden().collect::<Vec<_>>(), vec![ConfigKey::LogLevel]);
    }

    #[test]
    fn test_multibyte_names_do_not_panic() {
        let store = ValueStore::from_vars([("F\u{e9}", "x"), ("\u{e9}\u{e9}_LOG", "y")]);
        assert!(store.values.is_empty());
    }

    #[test]
    fn test_exact_name_wins_over_other_spellings() {
        let forward = ValueStore::from_vars([
            ("F8_KEYCLOAK_REALM", "exact"),
            ("f8_keycloak_realm", "lower"),
        ]);
        let backward = ValueStore::from_vars([
            ("f8_keycloak_realm", "lower"),
            ("F8_KEYCLOAK_REALM", "exact"),
        ]);
        assert_eq!(forward.get(ConfigKey::KeycloakRealm), Some("exact"));
        assert_eq!(backward.get(ConfigKey::KeycloakRealm), Some("exact"));
    }

    #[test]
    fn test_other_spellings_resolve_independent_of_order() {
        let forward = ValueStore::from_vars([("f8_log_level", "a"), ("F8_Log_Level", "b")]);
        let backward = ValueStore::from_vars([("F8_Log_Level", "b"), ("f8_log_level", "a")]);
        assert_eq!(forward.get(ConfigKey::LogLevel), Some("b"));
        assert_eq!(backward.get(ConfigKey::LogLevel), Some("b"));
    }

    #[test]
    fn test_empty_exact_name_does_not_shadow_other_spelling() {
        let store = ValueStore::from_vars([("F8_LOG_LEVEL", ""), ("f8_log_level", "debug")]);
        assert_eq!(store.get(ConfigKey::LogLevel), Some("debug"));
    }
}

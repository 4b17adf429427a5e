//! Configured redirect whitelist.

use crate::config::{ConfigError, ConfigKey};
use regex::Regex;
use url::Url;

#[derive(Clone, Debug)]
enum Entry {
    /// Matches a candidate that normalizes to the same URL.
    Exact(Url),
    /// Matches a candidate whose raw text matches the anchored pattern.
    Pattern(Regex),
}

/// Ordered redirect whitelist.
///
/// Entries starting with `^` are regular expressions matched against the raw
/// candidate. Every other entry must be an absolute URL and matches a
/// candidate that normalizes to the same URL, so `http://localhost:3000` and
/// `http://localhost:3000/` are equivalent.
#[derive(Clone, Debug)]
pub struct RedirectWhitelist {
    sources: Vec<String>,
    entries: Vec<Entry>,
}

impl RedirectWhitelist {
    /// Compile whitelist entries.
    ///
    /// Fails with [`ConfigError::InvalidRedirectEntry`] for URLs that don't
    /// parse and patterns that don't compile.
    pub fn new<I, S>(sources: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sources: Vec<String> = sources.into_iter().map(Into::into).collect();
        let entries = sources
            .iter()
            .map(|source| compile(source))
            .collect::<Result<_, _>>()?;
        Ok(Self { sources, entries })
    }

    /// The entries as configured.
    pub fn entries(&self) -> &[String] {
        &self.sources
    }

    /// Whether `candidate` (parsed as `target`) matches any entry.
    pub fn matches(&self, candidate: &str, target: &Url) -> bool {
        self.entries.iter().any(|entry| match entry {
            Entry::Exact(url) => url == target,
            Entry::Pattern(pattern) => pattern.is_match(candidate),
        })
    }
}

fn compile(source: &str) -> Result<Entry, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidRedirectEntry {
        key: ConfigKey::RedirectValid,
        value: source.to_string(),
        message,
    };

    if source.starts_with('^') {
        Regex::new(source)
            .map(Entry::Pattern)
            .map_err(|e| invalid(e.to_string()))
    } else {
        Url::parse(source)
            .map(Entry::Exact)
            .map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(whitelist: &RedirectWhitelist, candidate: &str) -> bool {
        let target = Url::parse(candidate).unwrap();
        whitelist.matches(candidate, &target)
    }

    #[test]
    fn test_exact_entry_matches_normalized_url() {
        let whitelist = RedirectWhitelist::new(["http://localhost:3000"]).unwrap();
        assert!(check(&whitelist, "http://localhost:3000/"));
        assert!(check(&whitelist, "HTTP://LOCALHOST:3000"));
        assert!(!check(&whitelist, "http://localhost:3000/api"));
        assert!(!check(&whitelist, "http://localhost:3001/"));
    }

    #[test]
    fn test_pattern_entry() {
        let whitelist =
            RedirectWhitelist::new([r"^https://([a-z0-9-]+\.)?someDomain\.org(/.*)?$"]).unwrap();
        assert!(check(&whitelist, "https://someDomain.org/redirect"));
        assert!(check(&whitelist, "https://app.someDomain.org"));
        assert!(!check(&whitelist, "https://someDomain.org.evil.com/"));
        assert!(!check(&whitelist, "http://someDomain.org/"));
    }

    #[test]
    fn test_entries_keep_configured_order() {
        let whitelist = RedirectWhitelist::new(["https://b.org/", "https://a.org/"]).unwrap();
        assert_eq!(whitelist.entries(), ["https://b.org/", "https://a.org/"]);
        assert_eq!(whitelist.entries().len(), 2);
    }

    #[test]
    fn test_empty_whitelist_matches_nothing() {
        let whitelist = RedirectWhitelist::new(Vec::<String>::new()).unwrap();
        assert!(whitelist.entries().is_empty());
        assert!(!check(&whitelist, "https://openshift.io/"));
    }

    #[test]
    fn test_invalid_entries_are_rejected() {
        let err = RedirectWhitelist::new(["not a url"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRedirectEntry { .. }));

        let err = RedirectWhitelist::new(["^https://(unclosed"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRedirectEntry { .. }));
        assert_eq!(err.key(), ConfigKey::RedirectValid);
    }
}

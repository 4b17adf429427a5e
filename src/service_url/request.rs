//! Read-only view of an inbound request.

/// The parts of an inbound request that URL resolution and redirect
/// validation look at.
pub trait InboundRequest {
    /// The host (and optional port) the request was addressed to.
    fn host(&self) -> Option<&str>;

    /// Whether the request reached the service over HTTPS.
    fn is_https(&self) -> bool;

    /// `"https"` or `"http"`, following [`is_https`](Self::is_https).
    fn scheme(&self) -> &'static str {
        if self.is_https() {
            "https"
        } else {
            "http"
        }
    }
}

/// A plain host/HTTPS pair for callers without an HTTP request at hand.
///
/// ```rust
/// use service_config::{service_url, RequestInfo};
///
/// let req = RequestInfo::new("api.domain.org").with_https(true);
/// assert_eq!(
///     service_url(&req, "sso", "auth").unwrap(),
///     "https://sso.domain.org/auth"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestInfo {
    pub host: String,
    pub https: bool,
}

impl RequestInfo {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            https: false,
        }
    }

    pub fn with_https(mut self, https: bool) -> Self {
        self.https = https;
        self
    }
}

impl InboundRequest for RequestInfo {
    fn host(&self) -> Option<&str> {
        Some(self.host.as_str())
    }

    fn is_https(&self) -> bool {
        self.https
    }
}

/// The `Host` header wins over the URI authority. `X-Forwarded-Proto`, when
/// present, wins over the URI scheme since TLS usually ends at the router.
#[cfg(feature = "guard")]
impl<B> InboundRequest for axum::http::Request<B> {
    fn host(&self) -> Option<&str> {
        self.headers()
            .get(axum::http::header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| self.uri().authority().map(|a| a.as_str()))
    }

    fn is_https(&self) -> bool {
        match self
            .headers()
            .get("x-forwarded-proto")
            .and_then(|h| h.to_str().ok())
        {
            Some(proto) => proto.trim().eq_ignore_ascii_case("https"),
            None => self.uri().scheme_str() == Some("https"),
        }
    }
}

#[cfg(all(test, feature = "guard"))]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_host_from_header() {
        let req = Request::builder()
            .uri("/path")
            .header("Host", "api.domain.org")
            .body(())
            .unwrap();
        assert_eq!(req.host(), Some("api.domain.org"));
        assert!(!req.is_https());
    }

    #[test]
    fn test_host_and_scheme_from_uri() {
        let req = Request::builder()
            .uri("https://sso.domain.org:8443/x")
            .body(())
            .unwrap();
        assert_eq!(req.host(), Some("sso.domain.org:8443"));
        assert!(req.is_https());
        assert_eq!(req.scheme(), "https");
    }

    #[test]
    fn test_forwarded_proto_overrides_uri_scheme() {
        let req = Request::builder()
            .uri("http://api.domain.org/")
            .header("X-Forwarded-Proto", "HTTPS")
            .body(())
            .unwrap();
        assert!(req.is_https());

        let req = Request::builder()
            .uri("https://api.domain.org/")
            .header("X-Forwarded-Proto", "http")
            .body(())
            .unwrap();
        assert!(!req.is_https());
    }

    #[test]
    fn test_missing_host() {
        let req = Request::builder().uri("/only/path").body(()).unwrap();
        assert_eq!(req.host(), None);
    }

    #[test]
    fn test_request_info() {
        let info = RequestInfo::new("api.domain.org");
        assert_eq!(info.host(), Some("api.domain.org"));
        assert_eq!(info.scheme(), "http");
        assert_eq!(info.with_https(true).scheme(), "https");
    }
}

//! Redirect guard middleware implementation.

use crate::config::Registry;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};

/// Layer that validates the redirect target of each request.
///
/// # Example
///
/// ```rust,ignore
/// use service_config::{RedirectGuardLayer, Registry};
///
/// let config = Arc::new(Registry::from_env()?);
/// let router = Router::new()
///     .route("/login", get(login))
///     .layer(RedirectGuardLayer::new(config));
/// ```
#[derive(Clone)]
pub struct RedirectGuardLayer {
    registry: Arc<Registry>,
    param: Arc<str>,
}

impl RedirectGuardLayer {
    /// Guard the `redirect` query parameter.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            param: Arc::from("redirect"),
        }
    }

    /// Guard a differently named query parameter.
    pub fn with_param(registry: Arc<Registry>, param: String) -> Self {
        Self {
            registry,
            param: Arc::from(param),
        }
    }
}

impl<S> Layer<S> for RedirectGuardLayer {
    type Service = RedirectGuardService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RedirectGuardService {
            inner,
            registry: self.registry.clone(),
            param: self.param.clone(),
        }
    }
}

/// Service that validates redirect targets.
///
/// - No redirect parameter: passed through
/// - Every occurrence acceptable: passed through
/// - Any rejected occurrence: `403 Forbidden`
/// - Any unparseable occurrence or host: `400 Bad Request`
///
/// Repeated parameters are checked in query order and the first failing
/// occurrence decides the status.
#[derive(Clone)]
pub struct RedirectGuardService<S> {
    inner: S,
    registry: Arc<Registry>,
    param: Arc<str>,
}

impl<S> Service<Request<Body>> for RedirectGuardService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let registry = self.registry.clone();
        let param = self.param.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // every occurrence is checked, whichever one the handler reads
            for target in query_values(&req, &param) {
                match registry.is_valid_redirect(&req, &target) {
                    Ok(true) => {}
                    Ok(false) => {
                        tracing::warn!(redirect = %target, "rejected redirect target");
                        return Ok(plain_response(StatusCode::FORBIDDEN, "Invalid redirect"));
                    }
                    Err(e) => {
                        tracing::warn!(
                            redirect = %target,
                            error = %e,
                            "could not evaluate redirect target"
                        );
                        return Ok(plain_response(StatusCode::BAD_REQUEST, "Malformed redirect"));
                    }
                }
            }
            inner.call(req).await
        })
    }
}

/// All values of query parameter `name`, in order.
fn query_values(req: &Request<Body>, name: &str) -> Vec<String> {
    let Some(query) = req.uri().query() else {
        return Vec::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .collect()
}

fn plain_response(status: StatusCode, message: &'static str) -> Response {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueStore;
    use axum::{extract::Query, routing::get, Router};
    use std::collections::HashMap;
    use tower::util::ServiceExt;

    async fn test_handler() -> &'static str {
        "OK"
    }

    // Query<HashMap> keeps the last occurrence of a repeated key
    async fn echo_redirect(Query(params): Query<HashMap<String, String>>) -> String {
        params.get("redirect").cloned().unwrap_or_default()
    }

    fn create_test_router(layer: RedirectGuardLayer) -> Router {
        Router::new()
            .route("/login", get(test_handler))
            .route("/echo", get(echo_redirect))
            .layer(layer)
    }

    fn default_registry() -> Arc<Registry> {
        Arc::new(Registry::from_store(&ValueStore::default()).unwrap())
    }

    fn request(host: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Host", host)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_no_redirect_param() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request("api.openshift.io", "/login"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_redirect() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request(
                "api.prod-preview.openshift.io",
                "/login?redirect=http%3A%2F%2Flocalhost%3A3000%2Fhome",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejected_redirect() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request(
                "api.openshift.io",
                "/login?redirect=http%3A%2F%2Flocalhost%3A3000%2Fapi",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_redirect() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request("api.openshift.io", "/login?redirect=not%20a%20url"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_custom_param() {
        let layer = RedirectGuardLayer::with_param(default_registry(), "next".to_string());
        let app = create_test_router(layer);

        let response = app
            .clone()
            .oneshot(request("api.openshift.io", "/login?next=http%3A%2F%2Fdomain.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // the default name is no longer inspected
        let response = app
            .oneshot(request("api.openshift.io", "/login?redirect=http%3A%2F%2Fdomain.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_whitelisted_redirect_on_unknown_host() {
        let registry = Registry::from_store(&ValueStore::from_vars([(
            "F8_REDIRECT_VALID",
            "https://someDomain.org/redirect",
        )]))
        .unwrap();
        let app = create_test_router(RedirectGuardLayer::new(Arc::new(registry)));

        let response = app
            .oneshot(request(
                "api.service.domain.org",
                "/login?redirect=https://someDomain.org/redirect",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_repeated_param_with_one_bad_value() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .clone()
            .oneshot(request(
                "api.prod-preview.openshift.io",
                "/echo?redirect=http%3A%2F%2Flocalhost%3A3000%2Fhome&redirect=http%3A%2F%2Fevil.com%2F",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(request(
                "api.prod-preview.openshift.io",
                "/echo?redirect=http%3A%2F%2Fevil.com%2F&redirect=http%3A%2F%2Flocalhost%3A3000%2Fhome",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_repeated_param_with_malformed_value() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request(
                "api.prod-preview.openshift.io",
                "/login?redirect=http%3A%2F%2Flocalhost%3A3000%2Fhome&redirect=not%20a%20url",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_repeated_param_all_valid_reaches_handler() {
        let app = create_test_router(RedirectGuardLayer::new(default_registry()));

        let response = app
            .oneshot(request(
                "api.prod-preview.openshift.io",
                "/echo?redirect=http%3A%2F%2Flocalhost%3A3000%2Fhome&redirect=http%3A%2F%2F127.0.0.1%3A8080%2F",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"http://127.0.0.1:8080/");
    }
}

//! In-process transport backed by the mock server's router.
//!
//! Requests are handed straight to the axum `Router` with
//! `tower::ServiceExt::oneshot`; no socket is opened. Only the path and query
//! of the request URL are used, so any scheme and host will do.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Uri};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::Db;
use storefront_core::http::canonical_reason;
use storefront_core::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
use tower::ServiceExt;
use tracing::debug;

/// Base URL handed to the client in mock mode.
pub const MOCK_BASE_URL: &str = "http://mock.local/api/v1";

#[derive(Clone)]
pub struct MockTransport {
    router: Router,
    // Builds the wire request; never sends it.
    encoder: ReqwestTransport,
}

impl MockTransport {
    /// A transport over a freshly seeded store.
    pub fn new() -> Self {
        Self::with_db(mock_server::seeded_db())
    }

    pub fn with_db(db: Db) -> Self {
        Self {
            router: mock_server::server(db),
            encoder: ReqwestTransport::new(),
        }
    }

    /// Encode `request` exactly as the network transport would, addressed to
    /// the router by path and query.
    fn to_router_request(&self, request: &HttpRequest) -> Result<Request<Body>, TransportError> {
        let prepared = self.encoder.prepare(request)?;
        let (mut parts, body) = Request::<reqwest::Body>::try_from(prepared)
            .map_err(|e| construction(e.to_string()))?
            .into_parts();
        parts.uri = origin_form(&parts.uri)?;
        Ok(Request::from_parts(parts, Body::new(body)))
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn construction(message: impl Into<String>) -> TransportError {
    TransportError::RequestConstruction {
        message: Some(message.into()),
    }
}

/// Drop scheme and authority from `uri`, keeping path and query.
fn origin_form(uri: &Uri) -> Result<Uri, TransportError> {
    let target = match uri.query() {
        Some(query) => format!("{}?{query}", uri.path()),
        None => uri.path().to_string(),
    };
    target.parse().map_err(|e: axum::http::uri::InvalidUri| construction(e.to_string()))
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, path = %request.path, "mock request");
        let router_request = self.to_router_request(&request)?;

        let response = match self.router.clone().oneshot(router_request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let status_text = canonical_reason(status).to_string();
        let bytes = match response.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                debug!(status, error = %err, "mock response body could not be read");
                return Err(TransportError::Response {
                    status,
                    status_text,
                    body: String::new(),
                });
            }
        };

        debug!(status, "mock response");
        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

//! The `HttpTransport` seam and its reqwest-backed implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::http::{
    canonical_reason, FormPart, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, TransportError,
    MULTIPART_FORM_DATA,
};

/// Executes an `HttpRequest`.
///
/// Every completed exchange is returned as `Ok`, whatever its status;
/// `Err` is reserved for exchanges that never produced a complete response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request).await
    }
}

/// Real network transport.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Turn `request` into a wire-ready reqwest request without sending it.
    ///
    /// Multipart bodies are encoded by reqwest, which also picks the boundary
    /// and escapes part names and file names.
    pub fn prepare(&self, request: &HttpRequest) -> Result<reqwest::Request, TransportError> {
        let url = reqwest::Url::parse(&request.path).map_err(|e| TransportError::RequestConstruction {
            message: Some(format!("invalid URL {}: {e}", request.path)),
        })?;
        let mut builder = self.client.request(to_reqwest(request.method), url);
        for (name, value) in &request.headers {
            // The multipart encoder supplies the boundary-qualified content type.
            if name.eq_ignore_ascii_case("content-type") && value == MULTIPART_FORM_DATA {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(json)) => builder.body(json.clone()),
            Some(RequestBody::Multipart(form)) => builder.multipart(to_reqwest_form(form)?),
            None => builder,
        };
        builder.build().map_err(map_reqwest_error)
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

fn to_reqwest_form(form: &MultipartForm) -> Result<Form, TransportError> {
    let mut out = Form::new();
    for part in form.parts() {
        out = match part {
            FormPart::Text { name, value } => out.text(name.clone(), value.clone()),
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let file = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(map_reqwest_error)?;
                out.part(name.clone(), file)
            }
        };
    }
    Ok(out)
}

/// Classify a reqwest failure into the closed transport-error set.
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::RequestConstruction {
            message: Some(err.to_string()),
        }
    } else {
        TransportError::NoResponse {
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(method = %request.method, path = %request.path, "sending request");

        let prepared = self.prepare(&request)?;
        let response = self.client.execute(prepared).await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let status_text = canonical_reason(status).to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        // The status line arrived, so a broken body is still a server response.
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(status, error = %err, "response body could not be read");
                return Err(TransportError::Response {
                    status,
                    status_text,
                    body: String::new(),
                });
            }
        };

        debug!(status, "received response");
        Ok(HttpResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}

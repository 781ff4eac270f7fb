//! Stateless HTTP request builder and response parser for the storefront API.
//!
//! # Design
//! `StorefrontClient` holds a `base_url` and an optional bearer token and
//! carries no other state between calls. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the actual HTTP round-trip,
//! keeping this module deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestBody, TransportError, MULTIPART_FORM_DATA};
use crate::query::ProductFilter;
use crate::types::{
    AuthResponse, ForgotPassword, LoginRequest, PasswordReset, PasswordUpdate, ProductForm,
    ProductListResponse, ProductResponse, ProfileForm, RegisterForm, StatusResponse, UserListResponse,
    UserResponse, UserUpdate,
};

/// Synchronous, stateless client for the storefront API.
#[derive(Debug, Clone)]
pub struct StorefrontClient {
    base_url: String,
    token: Option<String>,
}

impl StorefrontClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request built from here on.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    // -- products ----------------------------------------------------------

    pub fn build_list_products(&self, filter: &ProductFilter) -> HttpRequest {
        self.request(HttpMethod::Get, &filter.products_path(), None)
    }

    pub fn build_get_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/products/{id}"), None)
    }

    pub fn build_create_product(&self, form: &ProductForm) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/products",
            Some(RequestBody::Multipart(form.to_multipart())),
        )
    }

    pub fn build_update_product(&self, id: &str, form: &ProductForm) -> HttpRequest {
        self.request(
            HttpMethod::Put,
            &format!("/products/{id}"),
            Some(RequestBody::Multipart(form.to_multipart())),
        )
    }

    pub fn build_delete_product(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/products/{id}"), None)
    }

    pub fn parse_list_products(&self, response: HttpResponse) -> Result<ProductListResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_product(&self, response: HttpResponse) -> Result<ProductResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_product(&self, response: HttpResponse) -> Result<ProductResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<ProductResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<StatusResponse, ApiError> {
        parse_json(response)
    }

    // -- session -----------------------------------------------------------

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/login", input)
    }

    pub fn build_register(&self, form: &RegisterForm) -> HttpRequest {
        self.request(
            HttpMethod::Post,
            "/register",
            Some(RequestBody::Multipart(form.to_multipart())),
        )
    }

    pub fn build_logout(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/logout", None)
    }

    pub fn build_me(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/me", None)
    }

    pub fn build_update_password(&self, input: &PasswordUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, "/password/update", input)
    }

    pub fn build_update_profile(&self, form: &ProfileForm) -> HttpRequest {
        self.request(
            HttpMethod::Put,
            "/me/update",
            Some(RequestBody::Multipart(form.to_multipart())),
        )
    }

    pub fn build_forgot_password(&self, input: &ForgotPassword) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, "/password/forgot", input)
    }

    pub fn build_reset_password(&self, token: &str, input: &PasswordReset) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/password/reset/{token}"), input)
    }

    pub fn parse_auth(&self, response: HttpResponse) -> Result<AuthResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<UserResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_status(&self, response: HttpResponse) -> Result<StatusResponse, ApiError> {
        parse_json(response)
    }

    // -- admin -------------------------------------------------------------

    pub fn build_admin_list_users(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/admin/users", None)
    }

    pub fn build_admin_get_user(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/admin/user/{id}"), None)
    }

    pub fn build_admin_update_user(&self, id: &str, input: &UserUpdate) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &format!("/admin/user/{id}"), input)
    }

    pub fn build_admin_delete_user(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/admin/user/{id}"), None)
    }

    pub fn parse_user_list(&self, response: HttpResponse) -> Result<UserListResponse, ApiError> {
        parse_json(response)
    }

    // -- helpers -----------------------------------------------------------

    fn request(&self, method: HttpMethod, path: &str, body: Option<RequestBody>) -> HttpRequest {
        let mut headers = Vec::new();
        match &body {
            Some(RequestBody::Json(_)) => {
                headers.push(("content-type".to_string(), "application/json".to_string()));
            }
            Some(RequestBody::Multipart(_)) => {
                headers.push(("content-type".to_string(), MULTIPART_FORM_DATA.to_string()));
            }
            None => {}
        }
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers,
            body,
        }
    }

    fn json_request<B: Serialize>(&self, method: HttpMethod, path: &str, input: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(method, path, Some(RequestBody::Json(body))))
    }
}

/// Map non-2xx statuses to `TransportError::Response`, then decode the body.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    if !response.is_success() {
        return Err(TransportError::from_response(&response).into());
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

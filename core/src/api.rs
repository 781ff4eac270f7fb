//! Async service wrappers: build, execute, parse.
//!
//! `StorefrontApi` owns a transport and the session token. Calls that return
//! a token (login, register, password changes) store it; `logout` clears it,
//! even when the server call fails.

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::client::StorefrontClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::ProductFilter;
use crate::transport::HttpTransport;
use crate::types::{
    AuthResponse, ForgotPassword, LoginRequest, PasswordReset, PasswordUpdate, ProductForm,
    ProductListResponse, ProductResponse, ProfileForm, RegisterForm, StatusResponse, UserListResponse,
    UserResponse, UserUpdate,
};

pub struct StorefrontApi<T> {
    base_url: String,
    transport: T,
    token: RwLock<Option<String>>,
}

impl<T: HttpTransport> StorefrontApi<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            transport,
            token: RwLock::new(None),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn client(&self) -> StorefrontClient {
        StorefrontClient::new(&self.base_url).with_token(self.token().await)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "api call");
        Ok(self.transport.execute(request).await?)
    }

    async fn remember(&self, response: &AuthResponse) {
        if let Some(token) = &response.token {
            self.set_token(Some(token.clone())).await;
        }
    }

    // -- products ----------------------------------------------------------

    pub async fn list_products(&self, filter: &ProductFilter) -> Result<ProductListResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_list_products(filter)).await?;
        client.parse_list_products(response)
    }

    pub async fn get_product(&self, id: &str) -> Result<ProductResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_get_product(id)).await?;
        client.parse_get_product(response)
    }

    pub async fn create_product(&self, form: &ProductForm) -> Result<ProductResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_create_product(form)).await?;
        client.parse_create_product(response)
    }

    pub async fn update_product(&self, id: &str, form: &ProductForm) -> Result<ProductResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_update_product(id, form)).await?;
        client.parse_update_product(response)
    }

    pub async fn delete_product(&self, id: &str) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_delete_product(id)).await?;
        client.parse_delete_product(response)
    }

    // -- session -----------------------------------------------------------

    pub async fn login(&self, input: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_login(input)?).await?;
        let auth = client.parse_auth(response)?;
        self.remember(&auth).await;
        info!(email = %input.email, "logged in");
        Ok(auth)
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<AuthResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_register(form)).await?;
        let auth = client.parse_auth(response)?;
        self.remember(&auth).await;
        Ok(auth)
    }

    pub async fn logout(&self) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        // The local session ends whatever the server says.
        self.set_token(None).await;
        let response = self.send(client.build_logout()).await?;
        client.parse_status(response)
    }

    pub async fn me(&self) -> Result<UserResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_me()).await?;
        client.parse_user(response)
    }

    pub async fn update_password(&self, input: &PasswordUpdate) -> Result<AuthResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_update_password(input)?).await?;
        let auth = client.parse_auth(response)?;
        self.remember(&auth).await;
        Ok(auth)
    }

    pub async fn update_profile(&self, form: &ProfileForm) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_update_profile(form)).await?;
        client.parse_status(response)
    }

    pub async fn forgot_password(&self, input: &ForgotPassword) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_forgot_password(input)?).await?;
        client.parse_status(response)
    }

    pub async fn reset_password(&self, token: &str, input: &PasswordReset) -> Result<AuthResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_reset_password(token, input)?).await?;
        let auth = client.parse_auth(response)?;
        self.remember(&auth).await;
        Ok(auth)
    }

    // -- admin -------------------------------------------------------------

    pub async fn admin_list_users(&self) -> Result<UserListResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_admin_list_users()).await?;
        client.parse_user_list(response)
    }

    pub async fn admin_get_user(&self, id: &str) -> Result<UserResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_admin_get_user(id)).await?;
        client.parse_user(response)
    }

    pub async fn admin_update_user(&self, id: &str, input: &UserUpdate) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_admin_update_user(id, input)?).await?;
        client.parse_status(response)
    }

    pub async fn admin_delete_user(&self, id: &str) -> Result<StatusResponse, ApiError> {
        let client = self.client().await;
        let response = self.send(client.build_admin_delete_user(id)).await?;
        client.parse_status(response)
    }
}

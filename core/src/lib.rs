//! Async API client core for the storefront service.
//!
//! # Overview
//! `StorefrontClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). An
//! `HttpTransport` executes the round-trip; `StorefrontApi` strings the two
//! together per endpoint. `FetchHandle` drives any async producer through a
//! loading/success/error state machine and turns failures into display
//! messages.
//!
//! # Design
//! - `StorefrontClient` is stateless apart from an optional bearer token.
//! - Each endpoint is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit and testable with canned responses.
//! - Transport failures are a closed enum (`TransportError`) produced at the
//!   transport boundary; the fetch hook pattern-matches on it.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;

pub use api::StorefrontApi;
pub use client::StorefrontClient;
pub use config::{parse_flag, ConfigError, StorefrontConfig};
pub use error::{ApiError, FetchFailure};
pub use fetch::{classify, FetchHandle, FetchState};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody, TransportError};
pub use query::{PriceRange, ProductFilter, RatingFilter};
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    AuthResponse, ForgotPassword, Image, LoginRequest, PasswordReset, PasswordUpdate, Product, ProductForm,
    ProductListResponse, ProductResponse, ProfileForm, RegisterForm, Review, StatusResponse, Upload, User,
    UserListResponse, UserResponse, UserUpdate,
};

//! In-memory storefront backend.
//!
//! Serves the product and account endpoints the storefront client talks to,
//! backed by a seeded `Store` behind a `tokio` `RwLock`. `app()` exposes the
//! bare routes for in-process tests; `run` serves them under `/api/v1`.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

pub mod auth;
pub mod error;
pub mod form;
pub mod products;
pub mod seed;
pub mod store;

pub use error::MockError;
pub use store::{Image, Product, Review, Store, User};

pub const API_PREFIX: &str = "/api/v1";

pub type Db = Arc<RwLock<Store>>;

/// A fresh database holding the seed catalogue and accounts.
pub fn seeded_db() -> Db {
    Arc::new(RwLock::new(seed::store()))
}

/// Routes without the API prefix.
pub fn routes(db: Db) -> Router {
    Router::new()
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/me", get(auth::me))
        .route("/me/update", put(auth::update_profile))
        .route("/password/update", put(auth::update_password))
        .route("/password/forgot", post(auth::forgot_password))
        .route("/password/reset/{token}", put(auth::reset_password))
        .route("/admin/users", get(auth::admin_list_users))
        .route(
            "/admin/user/{id}",
            get(auth::admin_get_user)
                .put(auth::admin_update_user)
                .delete(auth::admin_delete_user),
        )
        .with_state(db)
}

/// Seeded routes without the API prefix.
pub fn app() -> Router {
    routes(seeded_db())
}

/// Routes nested under [`API_PREFIX`], as served over the network.
pub fn server(db: Db) -> Router {
    Router::new().nest(API_PREFIX, routes(db))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, server(seeded_db())).await
}

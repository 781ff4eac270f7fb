//! End-to-end runs against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the service
//! wrappers over real HTTP using `ReqwestTransport`. Validates request
//! building, multipart encoding, and response parsing against the actual
//! server, and that the fetch hook reports its failures with the right
//! messages.

use std::sync::Arc;

use mock_server::seed;
use storefront_core::{
    ApiError, FetchHandle, FetchState, LoginRequest, PriceRange, ProductFilter, ProductForm, RatingFilter,
    ReqwestTransport, StorefrontApi, TransportError, Upload, UserUpdate,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}{}", mock_server::API_PREFIX)
}

async fn api() -> StorefrontApi<ReqwestTransport> {
    StorefrontApi::new(&start_server().await, ReqwestTransport::new())
}

#[tokio::test(flavor = "multi_thread")]
async fn filtered_listing() {
    let api = api().await;

    let all = api.list_products(&ProductFilter::default()).await.unwrap();
    assert!(all.success);
    assert_eq!(all.products_count, 10);
    assert_eq!(all.products.len(), 8);

    let filter = ProductFilter {
        category: Some("Laptop".into()),
        price: Some(PriceRange {
            gte: Some(1000.0),
            lte: Some(1500.0),
        }),
        ratings: Some(RatingFilter::AtLeast(4.0)),
        ..Default::default()
    };
    let laptops = api.list_products(&filter).await.unwrap();
    assert_eq!(laptops.filtered_products_count, Some(1));
    assert_eq!(laptops.products[0].name, "Ultrabook 14");
}

#[tokio::test(flavor = "multi_thread")]
async fn product_lifecycle() {
    let api = api().await;

    let form = ProductForm {
        name: Some("Walnut Desk".into()),
        description: Some("Solid walnut".into()),
        price: Some(650.0),
        category: Some("Furniture".into()),
        stock: Some(3),
        images: vec![Upload {
            file_name: "desk.png".into(),
            content_type: "image/png".into(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }],
    };
    let created = api.create_product(&form).await.unwrap();
    let product = created.product.unwrap();
    assert_eq!(product.name, "Walnut Desk");
    assert_eq!(product.stock, 3);
    assert_eq!(product.images.len(), 1);

    let fetched = api.get_product(&product.id).await.unwrap();
    assert_eq!(fetched.product.as_ref().map(|p| p.price), Some(650.0));

    let update = ProductForm {
        price: Some(599.5),
        ..Default::default()
    };
    let updated = api.update_product(&product.id, &update).await.unwrap();
    let updated = updated.product.unwrap();
    assert_eq!(updated.price, 599.5);
    assert_eq!(updated.name, "Walnut Desk");

    let deleted = api.delete_product(&product.id).await.unwrap();
    assert!(deleted.success);

    let err = api.get_product(&product.id).await.unwrap_err();
    match err {
        ApiError::Transport(TransportError::Response { status, body, .. }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Product not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn session_flow() {
    let api = api().await;

    let err = api.me().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let bad = api
        .login(&LoginRequest {
            email: seed::USER_EMAIL.into(),
            password: "wrong-password".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(bad.status(), Some(401));
    assert!(api.token().await.is_none());

    let auth = api
        .login(&LoginRequest {
            email: seed::USER_EMAIL.into(),
            password: seed::USER_PASSWORD.into(),
        })
        .await
        .unwrap();
    assert!(auth.success);
    assert_eq!(api.token().await, auth.token);

    let me = api.me().await.unwrap();
    assert_eq!(me.user.unwrap().email, seed::USER_EMAIL);

    // Regular users are kept out of the admin area.
    assert_eq!(api.admin_list_users().await.unwrap_err().status(), Some(403));

    api.logout().await.unwrap();
    assert!(api.token().await.is_none());
    assert_eq!(api.me().await.unwrap_err().status(), Some(401));
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_logout_still_forgets_the_token() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = StorefrontApi::new(&format!("http://127.0.0.1:{port}/api/v1"), ReqwestTransport::new());
    api.set_token(Some("stale".into())).await;

    let err = api.logout().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::NoResponse { .. })));
    assert!(api.token().await.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn quoted_file_name_survives_the_network() {
    let api = api().await;
    let created = api
        .create_product(&ProductForm {
            name: Some("Quoted".into()),
            price: Some(10.0),
            category: Some("Furniture".into()),
            images: vec![Upload {
                file_name: r#"my "best" shelf.jpg"#.into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xff, 0xd8, 0xff],
            }],
            ..Default::default()
        })
        .await
        .unwrap();
    let image = &created.product.unwrap().images[0];
    assert!(image.url.ends_with(r#"/my "best" shelf.jpg"#), "{}", image.url);
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_flow() {
    let api = api().await;
    api.login(&LoginRequest {
        email: seed::ADMIN_EMAIL.into(),
        password: seed::ADMIN_PASSWORD.into(),
    })
    .await
    .unwrap();

    let users = api.admin_list_users().await.unwrap();
    assert_eq!(users.users.len(), 2);

    let shopper = seed::seed_id(101);
    api.admin_update_user(
        &shopper,
        &UserUpdate {
            role: Some("admin".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let user = api.admin_get_user(&shopper).await.unwrap().user.unwrap();
    assert_eq!(user.role, "admin");

    api.admin_delete_user(&shopper).await.unwrap();
    assert_eq!(api.admin_get_user(&shopper).await.unwrap_err().status(), Some(404));
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_hook_over_the_wire() {
    let api = Arc::new(api().await);

    let list_api = Arc::clone(&api);
    let listing = FetchHandle::spawn(
        move || {
            let api = Arc::clone(&list_api);
            async move { api.list_products(&ProductFilter::default()).await }
        },
        (),
    );
    let state = listing.settled().await;
    assert_eq!(state.data().map(|list| list.products.len()), Some(8));

    let detail_api = Arc::clone(&api);
    let missing = FetchHandle::spawn(
        move || {
            let api = Arc::clone(&detail_api);
            async move { api.get_product("missing").await }
        },
        (),
    );
    assert_eq!(
        missing.settled().await,
        FetchState::Error("Server error: 404 - Not Found".to_string())
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn fetch_hook_without_server() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let api = Arc::new(StorefrontApi::new(
        &format!("http://127.0.0.1:{port}/api/v1"),
        ReqwestTransport::new(),
    ));
    let handle = FetchHandle::spawn(
        move || {
            let api = Arc::clone(&api);
            async move { api.list_products(&ProductFilter::default()).await }
        },
        (),
    );
    assert_eq!(
        handle.settled().await.error(),
        Some("No response from server. Please check your network connection.")
    );
}

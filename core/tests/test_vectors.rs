//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and either the expected parse result or the expected failure. Comparing
//! parsed JSON (not raw strings) avoids false negatives from field ordering.

use serde::de::DeserializeOwned;
use serde_json::Value;
use storefront_core::{
    classify, ApiError, HttpMethod, HttpRequest, HttpResponse, LoginRequest, ProductFilter, ProductListResponse,
    ProductResponse, StatusResponse, StorefrontClient,
};

const BASE_URL: &str = "http://localhost:4000/api/v1";

fn load(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(
        req.method,
        parse_method(expected["method"].as_str().unwrap()),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );

    let expected_headers: Vec<(String, String)> = expected["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(req.headers, expected_headers, "{name}: headers");

    match expected.get("body") {
        Some(body) => {
            let json = req.body.as_ref().and_then(|b| b.as_json()).unwrap();
            let sent: Value = serde_json::from_str(json).unwrap();
            assert_eq!(&sent, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Check a parse outcome against `expected_result` or `expected_error`.
fn assert_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug,
{
    match case.get("expected_error") {
        Some(expected) => {
            let err = result.unwrap_err();
            assert_eq!(
                err.status(),
                expected["status"].as_u64().map(|s| s as u16),
                "{name}: status"
            );
            assert_eq!(
                classify(&err),
                expected["message"].as_str().unwrap(),
                "{name}: message"
            );
        }
        None => {
            let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[test]
fn list_products_vectors() {
    let vectors = load(include_str!("../../test-vectors/list_products.json"));
    let c = StorefrontClient::new(BASE_URL);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let filter: ProductFilter = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_list_products(&filter);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_list_products(simulated(case));
        assert_outcome::<ProductListResponse>(name, case, result);
    }
}

#[test]
fn get_product_vectors() {
    let vectors = load(include_str!("../../test-vectors/get_product.json"));
    let c = StorefrontClient::new(BASE_URL);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_get_product(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_product(simulated(case));
        assert_outcome::<ProductResponse>(name, case, result);
    }
}

#[test]
fn delete_product_vectors() {
    let vectors = load(include_str!("../../test-vectors/delete_product.json"));
    let token = vectors["token"].as_str().map(str::to_string);
    let c = StorefrontClient::new(BASE_URL).with_token(token);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_delete_product(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_product(simulated(case));
        assert_outcome::<StatusResponse>(name, case, result);
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn login_vectors() {
    let vectors = load(include_str!("../../test-vectors/login.json"));
    let c = StorefrontClient::new(BASE_URL);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: LoginRequest = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_login(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_auth(simulated(case));
        assert_outcome(name, case, result);
    }
}

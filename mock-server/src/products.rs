//! Product catalogue handlers.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::MockError;
use crate::form::FormData;
use crate::store::{Image, Product};
use crate::Db;

pub const RESULT_PER_PAGE: u32 = 8;

/// Parsed `GET /products` query.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub price_gte: Option<f64>,
    pub price_lte: Option<f64>,
    pub ratings_gte: Option<f64>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            category: None,
            page: 1,
            limit: RESULT_PER_PAGE,
            price_gte: None,
            price_lte: None,
            ratings_gte: None,
        }
    }
}

fn parse_param<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Result<Option<T>, MockError> {
    params
        .get(key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| MockError::BadRequest(format!("Invalid value for {key}: {raw}")))
        })
        .transpose()
}

impl ListQuery {
    pub fn parse(params: &HashMap<String, String>) -> Result<Self, MockError> {
        let page = parse_param::<u32>(params, "page")?.unwrap_or(1).max(1);
        let limit = parse_param::<u32>(params, "limit")?
            .filter(|&limit| limit > 0)
            .unwrap_or(RESULT_PER_PAGE);
        // A bare `ratings` is read as a minimum, same as `ratings[gte]`.
        let ratings_gte = match parse_param(params, "ratings[gte]")? {
            Some(min) => Some(min),
            None => parse_param(params, "ratings")?,
        };
        Ok(Self {
            keyword: params.get("keyword").filter(|k| !k.is_empty()).cloned(),
            category: params.get("category").filter(|c| !c.is_empty()).cloned(),
            page,
            limit,
            price_gte: parse_param(params, "price[gte]")?,
            price_lte: parse_param(params, "price[lte]")?,
            ratings_gte,
        })
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(keyword) = &self.keyword {
            if !product.name.to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if self.price_gte.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_lte.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.ratings_gte.is_some_and(|min| product.ratings < min) {
            return false;
        }
        true
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductList {
    pub success: bool,
    pub products: Vec<Product>,
    pub products_count: usize,
    pub result_per_page: u32,
    pub filtered_products_count: usize,
}

pub async fn list_products(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ProductList>, MockError> {
    let query = ListQuery::parse(&params)?;
    let store = db.read().await;
    let filtered: Vec<&Product> = store.products.iter().filter(|p| query.matches(p)).collect();
    let skip = (query.page as usize - 1).saturating_mul(query.limit as usize);
    let products = filtered
        .iter()
        .skip(skip)
        .take(query.limit as usize)
        .map(|p| (*p).clone())
        .collect();
    Ok(Json(ProductList {
        success: true,
        products,
        products_count: store.products.len(),
        result_per_page: query.limit,
        filtered_products_count: filtered.len(),
    }))
}

pub async fn get_product(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    let product = store
        .product(&id)
        .ok_or_else(|| MockError::NotFound("Product not found".to_string()))?;
    Ok(Json(json!({ "success": true, "product": product })))
}

fn hosted_images(form: &FormData) -> Vec<Image> {
    form.files_named("images")
        .map(|file| Image::hosted("products", &file.file_name))
        .collect()
}

pub async fn create_product(
    State(db): State<Db>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), MockError> {
    let form = FormData::collect(multipart).await?;
    let product = Product {
        id: Uuid::new_v4().simple().to_string(),
        name: form.require("name", "Please Enter product Name")?,
        description: form.text("description").unwrap_or_default().to_string(),
        price: form
            .number("price")?
            .ok_or_else(|| MockError::BadRequest("Please Enter product Price".to_string()))?,
        ratings: 0.0,
        images: hosted_images(&form),
        category: form.require("category", "Please Enter Product Category")?,
        stock: form.number("stock")?.unwrap_or(1),
        num_of_reviews: 0,
        reviews: Vec::new(),
        created_at: Utc::now(),
    };
    info!(id = %product.id, name = %product.name, "product created");
    db.write().await.products.push(product.clone());
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "product": product })),
    ))
}

pub async fn update_product(
    State(db): State<Db>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Value>, MockError> {
    let form = FormData::collect(multipart).await?;
    let price = form.number("price")?;
    let stock = form.number("stock")?;
    let images = hosted_images(&form);

    let mut store = db.write().await;
    let product = store
        .product_mut(&id)
        .ok_or_else(|| MockError::NotFound("Product not found".to_string()))?;
    if let Some(name) = form.text("name") {
        product.name = name.to_string();
    }
    if let Some(description) = form.text("description") {
        product.description = description.to_string();
    }
    if let Some(category) = form.text("category") {
        product.category = category.to_string();
    }
    if let Some(price) = price {
        product.price = price;
    }
    if let Some(stock) = stock {
        product.stock = stock;
    }
    if !images.is_empty() {
        product.images = images;
    }
    Ok(Json(json!({ "success": true, "product": product })))
}

pub async fn delete_product(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, MockError> {
    let mut store = db.write().await;
    let index = store
        .products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| MockError::NotFound("Product not found".to_string()))?;
    let removed = store.products.remove(index);
    info!(id = %removed.id, "product deleted");
    Ok(Json(json!({ "success": true, "message": "Product Delete Successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_when_empty() {
        assert_eq!(ListQuery::parse(&HashMap::new()).unwrap(), ListQuery::default());
    }

    #[test]
    fn parses_bracket_keys() {
        let query = ListQuery::parse(&params(&[
            ("price[gte]", "100"),
            ("price[lte]", "500"),
            ("ratings[gte]", "4"),
            ("page", "2"),
            ("limit", "5"),
        ]))
        .unwrap();
        assert_eq!(query.price_gte, Some(100.0));
        assert_eq!(query.price_lte, Some(500.0));
        assert_eq!(query.ratings_gte, Some(4.0));
        assert_eq!((query.page, query.limit), (2, 5));
    }

    #[test]
    fn bare_ratings_is_a_minimum() {
        let query = ListQuery::parse(&params(&[("ratings", "3")])).unwrap();
        assert_eq!(query.ratings_gte, Some(3.0));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let err = ListQuery::parse(&params(&[("page", "two")])).unwrap_err();
        assert!(matches!(err, MockError::BadRequest(_)));
    }

    #[test]
    fn matches_keyword_case_insensitively() {
        let product = crate::seed::products().remove(0);
        let query = ListQuery {
            keyword: Some("ULTRA".into()),
            ..Default::default()
        };
        assert!(query.matches(&product));
        let query = ListQuery {
            keyword: Some("boots".into()),
            ..Default::default()
        };
        assert!(!query.matches(&product));
    }
}

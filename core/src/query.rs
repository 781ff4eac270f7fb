//! Product-listing filters and their query-string encoding.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

/// Minimum-rating filter. Accepts either a bare number or `{ "gte": n }`;
/// both mean "rated at least n" and encode as `ratings[gte]=n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingFilter {
    AtLeast(f64),
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gte: Option<f64>,
    },
}

impl RatingFilter {
    pub fn minimum(&self) -> Option<f64> {
        match *self {
            RatingFilter::AtLeast(value) => Some(value),
            RatingFilter::Range { gte } => gte,
        }
    }
}

/// Filters for `GET /products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings: Option<RatingFilter>,
}

impl ProductFilter {
    /// Encode the filter, or `None` when no field is set.
    ///
    /// Keys are emitted in a fixed order: keyword, category, page, limit,
    /// price bounds, then the rating threshold.
    pub fn to_query_string(&self) -> Option<String> {
        let mut pairs = form_urlencoded::Serializer::new(String::new());
        let mut any = false;
        let mut push = |key: &str, value: String| {
            pairs.append_pair(key, &value);
            any = true;
        };

        if let Some(keyword) = &self.keyword {
            push("keyword", keyword.clone());
        }
        if let Some(category) = &self.category {
            push("category", category.clone());
        }
        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(limit) = self.limit {
            push("limit", limit.to_string());
        }
        if let Some(price) = &self.price {
            if let Some(gte) = price.gte {
                push("price[gte]", gte.to_string());
            }
            if let Some(lte) = price.lte {
                push("price[lte]", lte.to_string());
            }
        }
        if let Some(min) = self.ratings.as_ref().and_then(RatingFilter::minimum) {
            push("ratings[gte]", min.to_string());
        }

        any.then(|| pairs.finish())
    }

    /// `/products` with the encoded filter appended, if any.
    pub fn products_path(&self) -> String {
        match self.to_query_string() {
            Some(query) => format!("/products?{query}"),
            None => "/products".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_has_no_query() {
        let filter = ProductFilter::default();
        assert_eq!(filter.to_query_string(), None);
        assert_eq!(filter.products_path(), "/products");
    }

    #[test]
    fn price_range_is_bracket_encoded() {
        let filter = ProductFilter {
            price: Some(PriceRange {
                gte: Some(100.0),
                lte: Some(500.0),
            }),
            ..Default::default()
        };
        let query = filter.to_query_string().unwrap();
        assert!(query.contains("price%5Bgte%5D=100"));
        assert!(query.contains("price%5Blte%5D=500"));
    }

    #[test]
    fn full_filter_matches_expected_path() {
        let filter = ProductFilter {
            keyword: Some("test".into()),
            category: Some("electronics".into()),
            page: Some(1),
            limit: Some(10),
            price: Some(PriceRange {
                gte: Some(100.0),
                lte: Some(500.0),
            }),
            ratings: Some(RatingFilter::AtLeast(4.0)),
        };
        assert_eq!(
            filter.products_path(),
            "/products?keyword=test&category=electronics&page=1&limit=10\
             &price%5Bgte%5D=100&price%5Blte%5D=500&ratings%5Bgte%5D=4"
        );
    }

    #[test]
    fn rating_shapes_encode_identically() {
        let scalar: ProductFilter = serde_json::from_str(r#"{"ratings":4}"#).unwrap();
        let range: ProductFilter = serde_json::from_str(r#"{"ratings":{"gte":4}}"#).unwrap();
        assert_eq!(scalar.to_query_string().as_deref(), Some("ratings%5Bgte%5D=4"));
        assert_eq!(scalar.to_query_string(), range.to_query_string());
    }

    #[test]
    fn empty_bounds_are_omitted() {
        let filter = ProductFilter {
            price: Some(PriceRange::default()),
            ratings: Some(RatingFilter::Range { gte: None }),
            ..Default::default()
        };
        assert_eq!(filter.to_query_string(), None);
    }

    #[test]
    fn keyword_is_form_encoded() {
        let filter = ProductFilter {
            keyword: Some("desk lamp & shade".into()),
            ..Default::default()
        };
        assert_eq!(
            filter.to_query_string().as_deref(),
            Some("keyword=desk+lamp+%26+shade")
        );
    }

    #[test]
    fn fractional_values_keep_precision() {
        let filter = ProductFilter {
            ratings: Some(RatingFilter::AtLeast(3.5)),
            ..Default::default()
        };
        assert_eq!(filter.to_query_string().as_deref(), Some("ratings%5Bgte%5D=3.5"));
    }
}

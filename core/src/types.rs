//! Domain DTOs for the storefront API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates. Wire
//! names follow the backend: `_id` for identifiers, camelCase elsewhere,
//! snake_case inside image/avatar objects.

use serde::{Deserialize, Serialize};

use crate::http::MultipartForm;

/// Hosted image reference attached to products and user avatars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub user: String,
    pub name: String,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
}

/// A catalogue product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub ratings: f64,
    #[serde(default)]
    pub images: Vec<Image>,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub num_of_reviews: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Image>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// `GET /products` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub success: bool,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub products_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_per_page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered_products_count: Option<u64>,
}

/// Single-product response (detail, create, update).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Login, register and password-change response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListResponse {
    pub success: bool,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Bare `{ success, message? }` acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPassword {
    pub email: String,
}

/// Admin edit of another user. Only the fields present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// ---------------------------------------------------------------------------
// Multipart forms
// ---------------------------------------------------------------------------

/// A file to upload as part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    fn attach(&self, form: MultipartForm, field: &str) -> MultipartForm {
        form.file(field, &self.file_name, &self.content_type, self.bytes.clone())
    }
}

/// Product create/update submission. Omitted fields are left out of the form,
/// so an update only touches what is set.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub images: Vec<Upload>,
}

impl ProductForm {
    pub fn to_multipart(&self) -> MultipartForm {
        let mut form = MultipartForm::new();
        if let Some(name) = &self.name {
            form = form.text("name", name);
        }
        if let Some(description) = &self.description {
            form = form.text("description", description);
        }
        if let Some(price) = self.price {
            form = form.text("price", price.to_string());
        }
        if let Some(category) = &self.category {
            form = form.text("category", category);
        }
        if let Some(stock) = self.stock {
            form = form.text("stock", stock.to_string());
        }
        for image in &self.images {
            form = image.attach(form, "images");
        }
        form
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<Upload>,
}

impl RegisterForm {
    pub fn to_multipart(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("name", &self.name)
            .text("email", &self.email)
            .text("password", &self.password);
        match &self.avatar {
            Some(avatar) => avatar.attach(form, "avatar"),
            None => form,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Upload>,
}

impl ProfileForm {
    pub fn to_multipart(&self) -> MultipartForm {
        let mut form = MultipartForm::new();
        if let Some(name) = &self.name {
            form = form.text("name", name);
        }
        if let Some(email) = &self.email {
            form = form.text("email", email);
        }
        if let Some(avatar) = &self.avatar {
            form = avatar.attach(form, "avatar");
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FormPart;

    #[test]
    fn product_reads_backend_field_names() {
        let product: Product = serde_json::from_str(
            r#"{"_id":"p1","name":"Lamp","price":25,"category":"Home","numOfReviews":2,"images":[{"public_id":"i1","url":"/i1.png"}]}"#,
        )
        .unwrap();
        assert_eq!(product.id, "p1");
        assert_eq!(product.num_of_reviews, 2);
        assert_eq!(product.images[0].public_id, "i1");
        assert_eq!(product.stock, 0);
        assert!(product.created_at.is_none());
    }

    #[test]
    fn list_response_optional_counts() {
        let list: ProductListResponse =
            serde_json::from_str(r#"{"success":true,"products":[],"productsCount":0}"#).unwrap();
        assert!(list.result_per_page.is_none());
        assert!(list.filtered_products_count.is_none());
    }

    #[test]
    fn user_role_defaults_to_user() {
        let user: User =
            serde_json::from_str(r#"{"_id":"u1","name":"Ann","email":"ann@example.com"}"#).unwrap();
        assert_eq!(user.role, "user");
    }

    #[test]
    fn password_update_uses_camel_case() {
        let body = serde_json::to_value(PasswordUpdate {
            old_password: "a".into(),
            new_password: "b".into(),
            confirm_password: "b".into(),
        })
        .unwrap();
        assert_eq!(body["oldPassword"], "a");
        assert_eq!(body["confirmPassword"], "b");
    }

    #[test]
    fn product_form_skips_unset_fields() {
        let form = ProductForm {
            price: Some(12.5),
            images: vec![Upload {
                file_name: "a.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![1, 2],
            }],
            ..Default::default()
        }
        .to_multipart();
        let names: Vec<&str> = form.parts().iter().map(FormPart::name).collect();
        assert_eq!(names, vec!["price", "images"]);
        assert_eq!(form.text_value("price"), Some("12.5"));
    }

    #[test]
    fn register_form_attaches_avatar_last() {
        let form = RegisterForm {
            name: "Ann".into(),
            email: "ann@example.com".into(),
            password: "secret123".into(),
            avatar: Some(Upload {
                file_name: "me.png".into(),
                content_type: "image/png".into(),
                bytes: vec![0],
            }),
        }
        .to_multipart();
        let names: Vec<&str> = form.parts().iter().map(FormPart::name).collect();
        assert_eq!(names, vec!["name", "email", "password", "avatar"]);
    }
}

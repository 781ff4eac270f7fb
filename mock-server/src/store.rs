//! Records and the in-memory store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub public_id: String,
    pub url: String,
}

impl Image {
    /// Pretend to host an uploaded file.
    pub fn hosted(folder: &str, file_name: &str) -> Self {
        let public_id = format!("{folder}/{}", Uuid::new_v4().simple());
        Self {
            url: format!("https://res.example.com/{public_id}/{file_name}"),
            public_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Review {
    pub user: String,
    pub name: String,
    pub rating: f64,
    pub comment: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub ratings: f64,
    pub images: Vec<Image>,
    pub category: String,
    pub stock: u32,
    pub num_of_reviews: u32,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<Image>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// A user plus the secret the mock checks at login. Passwords are kept in
/// clear text; this backend only ever holds fixtures.
#[derive(Clone, Debug)]
pub struct Account {
    pub user: User,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub products: Vec<Product>,
    pub accounts: Vec<Account>,
    /// Session token -> user id.
    pub sessions: HashMap<String, String>,
    /// Password-reset token -> user id.
    pub reset_tokens: HashMap<String, String>,
}

impl Store {
    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn product_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.user.id == id)
    }

    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.user.id == id)
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    /// Open a session for `user_id` and return its bearer token.
    pub fn issue_token(&mut self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn user_for_token(&self, token: &str) -> Option<&User> {
        let id = self.sessions.get(token)?;
        self.account(id).map(|a| &a.user)
    }

    /// Single-use token for the forgot/reset password flow.
    pub fn issue_reset_token(&mut self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.reset_tokens.insert(token.clone(), user_id.to_string());
        token
    }

    /// An outstanding reset token for `email`, if any.
    pub fn reset_token_for(&self, email: &str) -> Option<String> {
        let id = self.account_by_email(email)?.user.id.as_str();
        self.reset_tokens
            .iter()
            .find(|(_, user_id)| user_id.as_str() == id)
            .map(|(token, _)| token.clone())
    }

    /// Remove a user and every session or reset token pointing at them.
    pub fn remove_account(&mut self, id: &str) -> Option<Account> {
        let index = self.accounts.iter().position(|a| a.user.id == id)?;
        self.sessions.retain(|_, user_id| user_id.as_str() != id);
        self.reset_tokens.retain(|_, user_id| user_id.as_str() != id);
        Some(self.accounts.remove(index))
    }
}

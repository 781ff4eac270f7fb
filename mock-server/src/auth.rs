//! Session, profile and admin user handlers.

use axum::{
    extract::{FromRequestParts, Multipart, Path, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::error::MockError;
use crate::form::FormData;
use crate::store::{Account, Image, User};
use crate::Db;

const MIN_PASSWORD_LEN: usize = 8;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The user behind the request's bearer token.
pub struct CurrentUser(pub User);

impl FromRequestParts<Db> for CurrentUser {
    type Rejection = MockError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            MockError::Unauthorized("Please Login to access this resource".to_string())
        })?;
        let store = db.read().await;
        store
            .user_for_token(token)
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| MockError::Unauthorized("Session expired, please login again".to_string()))
    }
}

/// A `CurrentUser` whose role is `admin`.
pub struct Admin(pub User);

impl FromRequestParts<Db> for Admin {
    type Rejection = MockError;

    async fn from_request_parts(parts: &mut Parts, db: &Db) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, db).await?;
        if !user.is_admin() {
            return Err(MockError::Forbidden(format!(
                "Role: {} is not allowed to access this resource",
                user.role
            )));
        }
        Ok(Admin(user))
    }
}

fn session(token: String, user: &User) -> Json<Value> {
    Json(json!({ "success": true, "token": token, "user": user }))
}

fn check_password(password: &str) -> Result<(), MockError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(MockError::BadRequest(format!(
            "Password should be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(State(db): State<Db>, Json(body): Json<LoginBody>) -> Result<Json<Value>, MockError> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(MockError::BadRequest("Please Enter Email & Password".to_string()));
    };
    let mut store = db.write().await;
    let user = match store.account_by_email(&email) {
        Some(account) if account.password == password => account.user.clone(),
        _ => return Err(MockError::Unauthorized("Invalid email or password".to_string())),
    };
    let token = store.issue_token(&user.id);
    info!(email = %user.email, "login");
    Ok(session(token, &user))
}

pub async fn register(
    State(db): State<Db>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), MockError> {
    let form = FormData::collect(multipart).await?;
    let name = form.require("name", "Please Enter Your Name")?;
    let email = form.require("email", "Please Enter Your Email")?;
    let password = form.require("password", "Please Enter Your Password")?;
    check_password(&password)?;

    let mut store = db.write().await;
    if store.account_by_email(&email).is_some() {
        return Err(MockError::BadRequest("Duplicate email Entered".to_string()));
    }
    let user = User {
        id: Uuid::new_v4().simple().to_string(),
        name,
        email,
        avatar: form
            .files_named("avatar")
            .next()
            .map(|file| Image::hosted("avatars", &file.file_name)),
        role: "user".to_string(),
        created_at: Utc::now(),
    };
    store.accounts.push(Account {
        user: user.clone(),
        password,
    });
    let token = store.issue_token(&user.id);
    info!(email = %user.email, "registered");
    Ok((StatusCode::CREATED, session(token, &user)))
}

pub async fn logout(State(db): State<Db>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = bearer_token(&headers) {
        db.write().await.sessions.remove(token);
    }
    Json(json!({ "success": true, "message": "Logged Out" }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "success": true, "user": user }))
}

// ---------------------------------------------------------------------------
// Profile and passwords
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateBody {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub async fn update_password(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<PasswordUpdateBody>,
) -> Result<Json<Value>, MockError> {
    let mut store = db.write().await;
    let account = store
        .account_mut(&user.id)
        .ok_or_else(|| MockError::NotFound("User not found".to_string()))?;
    if account.password != body.old_password {
        return Err(MockError::BadRequest("Old password is incorrect".to_string()));
    }
    if body.new_password != body.confirm_password {
        return Err(MockError::BadRequest("Password does not match".to_string()));
    }
    check_password(&body.new_password)?;
    account.password = body.new_password;
    let token = store.issue_token(&user.id);
    Ok(session(token, &user))
}

pub async fn update_profile(
    State(db): State<Db>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Json<Value>, MockError> {
    let form = FormData::collect(multipart).await?;
    let mut store = db.write().await;
    if let Some(email) = form.text("email") {
        if store
            .account_by_email(email)
            .is_some_and(|other| other.user.id != user.id)
        {
            return Err(MockError::BadRequest("Duplicate email Entered".to_string()));
        }
    }
    let account = store
        .account_mut(&user.id)
        .ok_or_else(|| MockError::NotFound("User not found".to_string()))?;
    if let Some(name) = form.text("name") {
        account.user.name = name.to_string();
    }
    if let Some(email) = form.text("email") {
        account.user.email = email.to_string();
    }
    if let Some(file) = form.files_named("avatar").next() {
        account.user.avatar = Some(Image::hosted("avatars", &file.file_name));
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct ForgotBody {
    pub email: String,
}

pub async fn forgot_password(State(db): State<Db>, Json(body): Json<ForgotBody>) -> Result<Json<Value>, MockError> {
    let mut store = db.write().await;
    let user_id = store
        .account_by_email(&body.email)
        .map(|a| a.user.id.clone())
        .ok_or_else(|| MockError::NotFound("User not found".to_string()))?;
    let token = store.issue_reset_token(&user_id);
    // No mail goes out; the link is only logged.
    info!(email = %body.email, reset_url = %format!("/password/reset/{token}"), "password reset requested");
    Ok(Json(json!({
        "success": true,
        "message": format!("Email sent to {} successfully", body.email),
    })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetBody {
    pub password: String,
    pub confirm_password: String,
}

pub async fn reset_password(
    State(db): State<Db>,
    Path(token): Path<String>,
    Json(body): Json<ResetBody>,
) -> Result<Json<Value>, MockError> {
    let mut store = db.write().await;
    let user_id = store.reset_tokens.get(&token).cloned().ok_or_else(|| {
        MockError::BadRequest("Reset Password Token is invalid or has been expired".to_string())
    })?;
    if body.password != body.confirm_password {
        return Err(MockError::BadRequest("Password does not match".to_string()));
    }
    check_password(&body.password)?;
    store.reset_tokens.remove(&token);
    let account = store
        .account_mut(&user_id)
        .ok_or_else(|| MockError::NotFound("User not found".to_string()))?;
    account.password = body.password;
    let user = account.user.clone();
    let session_token = store.issue_token(&user_id);
    Ok(session(session_token, &user))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

fn no_such_user(id: &str) -> MockError {
    MockError::NotFound(format!("User does not exist with Id: {id}"))
}

pub async fn admin_list_users(State(db): State<Db>, _admin: Admin) -> Json<Value> {
    let store = db.read().await;
    let users: Vec<&User> = store.accounts.iter().map(|a| &a.user).collect();
    Json(json!({ "success": true, "users": users }))
}

pub async fn admin_get_user(
    State(db): State<Db>,
    _admin: Admin,
    Path(id): Path<String>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    let account = store.account(&id).ok_or_else(|| no_such_user(&id))?;
    Ok(Json(json!({ "success": true, "user": account.user })))
}

#[derive(Deserialize)]
pub struct UserUpdateBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub async fn admin_update_user(
    State(db): State<Db>,
    _admin: Admin,
    Path(id): Path<String>,
    Json(body): Json<UserUpdateBody>,
) -> Result<Json<Value>, MockError> {
    let mut store = db.write().await;
    let account = store.account_mut(&id).ok_or_else(|| no_such_user(&id))?;
    if let Some(name) = body.name {
        account.user.name = name;
    }
    if let Some(email) = body.email {
        account.user.email = email;
    }
    if let Some(role) = body.role {
        account.user.role = role;
    }
    Ok(Json(json!({ "success": true })))
}

pub async fn admin_delete_user(
    State(db): State<Db>,
    _admin: Admin,
    Path(id): Path<String>,
) -> Result<Json<Value>, MockError> {
    let removed = db
        .write()
        .await
        .remove_account(&id)
        .ok_or_else(|| no_such_user(&id))?;
    info!(email = %removed.user.email, "user deleted");
    Ok(Json(json!({ "success": true, "message": "User Deleted Successfully" })))
}

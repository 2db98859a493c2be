use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{not_found, parse_path_id, ListQuery};
use crate::api::errors::ApiError;
use crate::api::response::ApiResponse;
use crate::api::state::AppState;
use crate::api::validation::{optional_text, required_text, FieldError, Validator};
use crate::auth::password::{hash_password, verify_password};
use crate::domain::pagination::Page;
use crate::domain::user::{Password, User, UserChanges, Username};

/// Request body for creating a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Request body for a partial profile update
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub username: Option<String>,
}

/// Request body for changing a password
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

/// User as exposed over HTTP; there is no password field to leak
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

fn new_password(
    v: &mut Validator,
    password: Option<&str>,
    confirmation: Option<&str>,
) -> Option<Password> {
    let password = v.check_secret("password", Password::new(password.unwrap_or_default()))?;
    v.check_secret("confirmPassword", password.confirm(confirmation))?;
    Some(password)
}

fn hash(password: &Password) -> Result<String, ApiError> {
    hash_password(password.as_str())
        .map_err(|e| ApiError::internal_server_error(format!("Failed to hash password: {}", e)))
}

/// List users
///
/// GET /api/v1/user?page&limit&sort
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Page<UserResponse>>>, ApiError> {
    let request = query.resolve(&state.config.pagination.users);
    let page = state.users.list(&request).await?;

    Ok(Json(ApiResponse::ok(page.map(UserResponse::from))))
}

/// Get a user by ID
///
/// GET /api/v1/user/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_path_id(&id, "user")?;
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// Register a new user
///
/// POST /api/v1/user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, required_text("name", req.name.as_deref()));
    let username = v.check(
        "username",
        &req.username,
        Username::new(req.username.clone().unwrap_or_default()),
    );
    let password = new_password(
        &mut v,
        req.password.as_deref(),
        req.confirm_password.as_deref(),
    );

    if let Some(username) = username.as_ref().filter(|_| v.is_valid()) {
        if state.users.username_taken(username.as_str(), None).await? {
            v.reject("username", "username already used");
        }
    }

    let (user, password) = v.finish(|| Some((User::new(name?, username?), password?)))?;

    let password_hash = hash(&password)?;
    let user = state.users.create(&user, &password_hash).await?;
    tracing::info!(user_id = %user.id, "user created");

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// Partially update a user's profile
///
/// PATCH /api/v1/user/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let Json(req) = payload?;
    let id = parse_path_id(&id, "user")?;

    let mut v = Validator::new();
    let name = v.check("name", &req.name, optional_text("name", req.name.as_deref()));
    let username = v.check(
        "username",
        &req.username,
        req.username.clone().map(Username::new).transpose(),
    );

    if let Some(Some(username)) = username.as_ref().filter(|_| v.is_valid()) {
        if state.users.username_taken(username.as_str(), Some(id)).await? {
            v.reject("username", "username already used");
        }
    }

    let changes = v.finish(|| {
        Some(UserChanges {
            name: name?,
            username: username?,
        })
    })?;

    let user = state
        .users
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// Change a user's password after checking the old one
///
/// PATCH /api/v1/user/:id/password
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let Json(req) = payload?;

    let mut v = Validator::new();
    let old_password = v.check_secret(
        "oldPassword",
        required_text("old password", req.old_password.as_deref()),
    );
    let password = new_password(
        &mut v,
        req.password.as_deref(),
        req.confirm_password.as_deref(),
    );
    let (old_password, password) = v.finish(|| Some((old_password?, password?)))?;

    let id = parse_path_id(&id, "user")?;
    let credentials = state
        .users
        .find_credentials(id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    let matches = verify_password(old_password.as_str(), &credentials.password_hash)
        .map_err(|e| ApiError::internal_server_error(format!("Password verification failed: {}", e)))?;
    if !matches {
        return Err(ApiError::validation(vec![FieldError::new(
            "oldPassword",
            "old password doesn't match",
        )]));
    }

    let password_hash = hash(&password)?;
    let user = state
        .users
        .update_password(id, &password_hash)
        .await?
        .ok_or_else(|| not_found("user"))?;

    tracing::info!(user_id = %user.id, "password changed");

    Ok(Json(ApiResponse::ok(UserResponse::from(user))))
}

/// Delete a user
///
/// DELETE /api/v1/user/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let id = parse_path_id(&id, "user")?;
    let user = state
        .users
        .delete(id)
        .await?
        .ok_or_else(|| not_found("user"))?;

    Ok(Json(ApiResponse::with_message(
        "success delete user!",
        UserResponse::from(user),
    )))
}

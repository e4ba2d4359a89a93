//! Registration, sign-in and bearer-token verification.

pub mod middleware;
pub mod password;
pub mod token;

use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;
use jlearn_common::{Credentials, LoginResponse, RegisterRequest, RegisterResponse, Role};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::store::{Collection, Document};
use crate::web_server::AppState;

pub use middleware::auth_middleware;
pub use password::{hash_password, verify_password};
pub use token::{issue_token, verify_token, Claims};

/// A user document as stored, password hash included.
#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
}

// --- API Handlers ---

/// ## Register a new user
/// Hashes the password and stores the user with the `user` role.
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Missing fields or email already exists", body = jlearn_common::MessageResponse),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate().map_err(|errors| AppError::Validation {
        message: "All fields are required".to_string(),
        errors,
    })?;

    tracing::info!("Registering user with email: {}", &payload.email);
    // Not atomic with the insert below; two concurrent registrations may both pass.
    let existing: Option<Document> = state
        .store
        .find_one_by_field(Collection::Users, "email", &payload.email)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already exists".to_string()));
    }

    let password = hash_password(&payload.password, state.app_config.auth.bcrypt_cost).await?;

    let new_user = User {
        id: None,
        name: payload.name,
        email: payload.email,
        password,
        photo: payload.photo,
        role: Role::User,
    };

    let result = state.store.insert_one(Collection::Users, &new_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            result,
        }),
    ))
}

/// ## Sign in an existing user
/// Verifies the credentials and returns a bearer token valid for `jwt.expires_days`.
#[utoipa::path(
    post,
    path = "/singIn",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Email and password required", body = jlearn_common::MessageResponse),
        (status = 401, description = "Invalid credentials", body = jlearn_common::MessageResponse),
        (status = 404, description = "User not found", body = jlearn_common::MessageResponse),
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate().map_err(|errors| AppError::Validation {
        message: "Email and password required".to_string(),
        errors,
    })?;

    tracing::info!("Signing in user with email: {}", &payload.email);
    let user: User = state
        .store
        .find_one_by_field(Collection::Users, "email", &payload.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if !verify_password(&payload.password, &user.password).await? {
        return Err(AppError::Unauthorized);
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::InternalServerError("Stored user has no id".to_string()))?;

    let jwt = &state.app_config.jwt;
    let token = issue_token(
        &user_id,
        user.role,
        &jwt.secret,
        Duration::days(jwt.expires_days),
    )?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

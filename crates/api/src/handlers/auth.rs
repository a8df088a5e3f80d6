//! Handlers for the `/auth` resource (signup, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vidcat_core::error::CoreError;
use vidcat_core::types::UserId;
use vidcat_core::user::{NewUser, User};
use vidcat_core::video::blank_as_none;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Same message for an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Username is required"),
        length(min = 3, message = "Username must be at least 3 characters")
    )]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please include a valid email"),
        email(message = "Please include a valid email")
    )]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "Please include a valid email"),
        email(message = "Please include a valid email")
    )]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Register a new account and return a token for it.
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let new_user = NewUser {
        username: input.username.unwrap_or_default(),
        email: normalize_email(input.email.as_deref().unwrap_or_default()),
        password_hash,
    };

    let user = state
        .users
        .insert_user(&new_user)
        .await
        .map_err(|err| match CoreError::from(err) {
            CoreError::Conflict(_) => CoreError::Conflict("User already exists".into()),
            other => other,
        })?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    let response = auth_response(&state, user)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(input.email.as_deref().unwrap_or_default());

    let user = state
        .users
        .find_user_by_email(&email)
        .await
        .map_err(CoreError::from)?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS.into()))?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS.into()).into());
    }

    Ok(Json(auth_response(&state, user)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        token,
        user: UserInfo {
            id: user.id,
            username: user.username,
            email: user.email,
        },
    })
}

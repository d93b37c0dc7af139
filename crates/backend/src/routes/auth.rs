//! Account route handlers.
//!
//! Handles registration, login, password recovery, and profile update.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::db::users::PgIdentityStore;
use crate::error::{failure, fault};
use crate::middleware::RequireAuth;
use crate::models::UserPublic;
use crate::services::auth::{
    AuthError, AuthService, LoginInput, LoginSuccess, ProfileInput, RecoverInput, RegisterInput,
};
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// Successful registration response.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserPublic,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: UserPublic,
}

/// Successful password recovery response.
#[derive(Debug, Serialize)]
pub struct RecoverResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Successful profile update response.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "updatedUser")]
    pub updated_user: UserPublic,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle registration.
///
/// Missing fields and duplicate emails are normal outcomes reported with
/// HTTP 200; only unexpected faults produce a 500.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> Response {
    let service = AuthService::new(PgIdentityStore::new(state.pool()), state.tokens());

    match service.register(input).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                success: true,
                message: "User Registered Successfully",
                user: UserPublic::from(&user),
            }),
        )
            .into_response(),
        Err(err @ (AuthError::MissingField(_) | AuthError::AlreadyRegistered)) => {
            failure(StatusCode::OK, &err.to_string())
        }
        Err(err) => fault(StatusCode::INTERNAL_SERVER_ERROR, "Error in Registration", &err),
    }
}

/// Handle login.
///
/// A missing email or password is reported as one undifferentiated outcome;
/// an unknown email is disclosed distinctly, and a wrong password comes back
/// as a successful HTTP call carrying `success:false`.
pub async fn login(State(state): State<AppState>, Json(input): Json<LoginInput>) -> Response {
    let service = AuthService::new(PgIdentityStore::new(state.pool()), state.tokens());

    match service.login(input).await {
        Ok(LoginSuccess { token, user }) => (
            StatusCode::OK,
            Json(LoginResponse {
                success: true,
                message: "Login successful",
                token,
                user: UserPublic::from(&user),
            }),
        )
            .into_response(),
        Err(err @ (AuthError::InvalidCredentials | AuthError::EmailNotRegistered)) => {
            failure(StatusCode::NOT_FOUND, &err.to_string())
        }
        Err(err @ AuthError::InvalidPassword) => failure(StatusCode::OK, &err.to_string()),
        Err(err) => fault(StatusCode::INTERNAL_SERVER_ERROR, "Error in login", &err),
    }
}

/// Handle password recovery via security answer.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<RecoverInput>,
) -> Response {
    let service = AuthService::new(PgIdentityStore::new(state.pool()), state.tokens());

    match service.forgot_password(input).await {
        Ok(()) => (
            StatusCode::OK,
            Json(RecoverResponse {
                success: true,
                message: "Password Reset Successfully",
            }),
        )
            .into_response(),
        Err(err @ AuthError::MissingField(_)) => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err @ AuthError::WrongEmailOrAnswer) => {
            failure(StatusCode::NOT_FOUND, &err.to_string())
        }
        Err(err) => fault(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong", &err),
    }
}

/// Handle profile update for the authenticated caller.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
    Json(input): Json<ProfileInput>,
) -> Response {
    let service = AuthService::new(PgIdentityStore::new(state.pool()), state.tokens());

    match service.update_profile(caller, input).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ProfileResponse {
                success: true,
                message: "Profile Updated Successfully",
                updated_user: UserPublic::from(&user),
            }),
        )
            .into_response(),
        Err(err @ AuthError::WeakPassword) => failure(StatusCode::OK, &err.to_string()),
        Err(err) => fault(
            StatusCode::BAD_REQUEST,
            "Error While Updating Profile",
            &err,
        ),
    }
}

//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed session token in route
//! handlers. Token decoding happens here, at the boundary; the workflows
//! receive an already-resolved caller identity.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use clementine_core::UserId;

use crate::db::users::{IdentityStore, PgIdentityStore};
use crate::error::failure;
use crate::models::User;
use crate::state::AppState;

/// Extractor that requires a valid session token.
///
/// The wrapped value is the caller's account id, taken from the token's
/// claims. The account itself is not loaded; handlers that need the full
/// record fetch it through their workflow.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(caller): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("caller id: {caller}")
/// }
/// ```
pub struct RequireAuth(pub UserId);

/// Extractor that requires a valid session token for a privileged account.
///
/// Unlike [`RequireAuth`], this loads the caller's account to check its
/// role, and rejects ordinary buyers.
pub struct RequireAdmin(pub User);

/// Error returned when a request fails authentication or authorization.
pub enum AuthRejection {
    /// Missing, invalid, or expired token, or the account no longer exists.
    Unauthorized,
    /// Valid token, but the account is not privileged.
    Forbidden,
    /// The role check could not reach the store.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => failure(StatusCode::UNAUTHORIZED, "Unauthorized"),
            Self::Forbidden => failure(StatusCode::UNAUTHORIZED, "Unauthorized Access"),
            Self::Internal => {
                failure(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            }
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthRejection::Unauthorized)?;

        // Storefront clients send either "Bearer <token>" or the bare token.
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        let claims = state
            .tokens()
            .decode(token)
            .map_err(|_| AuthRejection::Unauthorized)?;

        Ok(Self(claims.user()))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(caller) = RequireAuth::from_request_parts(parts, state).await?;

        let user = PgIdentityStore::new(state.pool())
            .find_by_id(caller)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "role check failed");
                AuthRejection::Internal
            })?
            .ok_or(AuthRejection::Unauthorized)?;

        if !user.role.is_privileged() {
            return Err(AuthRejection::Forbidden);
        }

        Ok(Self(user))
    }
}

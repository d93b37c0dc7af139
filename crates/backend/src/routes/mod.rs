//! HTTP route handlers.
//!
//! Handlers are thin: deserialize the payload, run the workflow, translate
//! its outcome into the canonical response contract. The message strings and
//! status codes here are a compatibility surface - storefront clients match
//! on them - so changes are breaking.

pub mod auth;
pub mod orders;

use axum::Router;
use axum::routing::{get, post, put};

use crate::state::AppState;

/// Build the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/profile", put(auth::update_profile))
        .route("/api/orders/mine", get(orders::my_orders))
        .route("/api/orders/all", get(orders::all_orders))
        .route("/api/orders/{order_id}/status", put(orders::update_status))
}

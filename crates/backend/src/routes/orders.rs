//! Order route handlers.
//!
//! Buyer-scoped listing, privileged all-orders listing, and the status
//! transition. Listings and the updated order are returned as bare JSON, as
//! the storefront client expects.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use clementine_core::OrderId;

use crate::db::orders::PgOrderStore;
use crate::error::fault;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Status transition payload.
#[derive(Debug, Deserialize)]
pub struct StatusInput {
    pub status: String,
}

/// List the authenticated caller's own orders.
pub async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(caller): RequireAuth,
) -> Response {
    let service = OrderService::new(PgOrderStore::new(state.pool()));

    match service.orders_for_buyer(caller).await {
        Ok(orders) => Json(orders).into_response(),
        Err(err) => fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error While Getting Orders",
            &err,
        ),
    }
}

/// List every order, newest first (privileged).
pub async fn all_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Response {
    let service = OrderService::new(PgOrderStore::new(state.pool()));

    match service.all_orders().await {
        Ok(orders) => Json(orders).into_response(),
        Err(err) => fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error While Getting Orders",
            &err,
        ),
    }
}

/// Write a new status onto one order (privileged).
///
/// The status value is an opaque string; no transition legality is checked.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(order_id): Path<i32>,
    Json(input): Json<StatusInput>,
) -> Response {
    let service = OrderService::new(PgOrderStore::new(state.pool()));

    match service
        .set_status(OrderId::new(order_id), &input.status)
        .await
    {
        Ok(order) => Json(order).into_response(),
        Err(err) => fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error While Updating Order",
            &err,
        ),
    }
}

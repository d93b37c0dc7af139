//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use clementine_core::{OrderId, ProductId, UserId};

/// A purchase record owned by one buyer.
///
/// Orders are created by the purchase workflow outside this service; here
/// they are read (with buyer and product expansion) and their `status` field
/// is mutated. `status` is an opaque string: the service does not validate
/// it against a closed set of labels or legal transitions.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub buyer: BuyerSummary,
    pub items: Vec<OrderItem>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Buyer summary carried in order expansions.
#[derive(Debug, Clone, Serialize)]
pub struct BuyerSummary {
    pub id: UserId,
    pub name: String,
}

/// A line item with its product expansion.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

//! Order store: buyer-scoped and privileged listing, status mutation.
//!
//! Orders are created by the purchase workflow outside this service, so the
//! contract here is read plus a single-field status update. Listings carry
//! the buyer summary and product expansion the storefront renders from.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use clementine_core::{OrderId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{BuyerSummary, Order, OrderItem};

/// Data-access contract for order records.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// All orders belonging to one buyer, in store order (unsorted).
    async fn find_by_buyer(&self, buyer: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Every order in the store, newest first.
    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    /// Write only the `status` field of one order and return the post-update
    /// record, or `None` if the order does not exist.
    async fn update_status(
        &self,
        id: OrderId,
        status: &str,
    ) -> Result<Option<Order>, RepositoryError>;
}

/// Database row for an order header with its buyer expansion.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    buyer_id: UserId,
    buyer_name: String,
}

/// Database row for a line item with its product expansion.
#[derive(sqlx::FromRow)]
struct ItemRow {
    order_id: OrderId,
    product_id: ProductId,
    name: String,
    price: Decimal,
    quantity: i32,
}

const ORDER_COLUMNS: &str = "o.id, o.status, o.created_at, o.updated_at, \
     u.id AS buyer_id, u.name AS buyer_name";

/// `PostgreSQL`-backed order store.
pub struct PgOrderStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgOrderStore<'a> {
    /// Create a new order store over a connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Attach line items to a batch of order headers.
    async fn hydrate(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();

        let item_rows = sqlx::query_as::<_, ItemRow>(
            "SELECT i.order_id, i.product_id, p.name, p.price, i.quantity
             FROM order_items i
             JOIN products p ON p.id = i.product_id
             WHERE i.order_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in item_rows {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(OrderItem {
                    product_id: item.product_id,
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| Order {
                id: row.id,
                buyer: BuyerSummary {
                    id: row.buyer_id,
                    name: row.buyer_name,
                },
                items: items_by_order.remove(&row.id).unwrap_or_default(),
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    async fn fetch_one(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             JOIN users u ON u.id = o.buyer_id
             WHERE o.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.into_iter().next()),
            None => Ok(None),
        }
    }
}

impl OrderStore for PgOrderStore<'_> {
    async fn find_by_buyer(&self, buyer: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             JOIN users u ON u.id = o.buyer_id
             WHERE o.buyer_id = $1"
        ))
        .bind(buyer)
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM orders o
             JOIN users u ON u.id = o.buyer_id
             ORDER BY o.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.hydrate(rows).await
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let updated = sqlx::query(
            "UPDATE orders SET status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.fetch_one(id).await
    }
}

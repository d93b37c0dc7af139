//! Order lifecycle workflows.
//!
//! Buyer-scoped listing, privileged all-orders listing, and the status
//! transition. The status transition is a pass-through mutator: any string
//! is accepted and no transition legality is checked.

use thiserror::Error;

use clementine_core::{OrderId, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderStore;
use crate::models::Order;

/// Errors of the order workflows.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Store fault.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Status update targeted an order that does not exist.
    #[error("unknown order")]
    UnknownOrder,
}

/// Order workflow service.
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    /// Create a new order service over a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The caller's own orders, with buyer and product expansion, as the
    /// store returns them (unsorted).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn orders_for_buyer(&self, buyer: UserId) -> Result<Vec<Order>, OrderError> {
        let orders = self.store.find_by_buyer(buyer).await?;
        Ok(orders)
    }

    /// Every order in the store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let orders = self.store.find_all().await?;
        Ok(orders)
    }

    /// Write a new status onto one order and return the post-update record.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UnknownOrder` if no such order exists, and
    /// `OrderError::Repository` if the store fails.
    pub async fn set_status(&self, id: OrderId, status: &str) -> Result<Order, OrderError> {
        self.store
            .update_status(id, status)
            .await?
            .ok_or(OrderError::UnknownOrder)
    }
}

//! Database operations for the Clementine `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Account records (email unique at the schema level)
//! - `orders` / `order_items` - Purchase records owned by one buyer
//! - `products` - Join target for line-item expansion
//!
//! Each store is a trait ([`users::IdentityStore`], [`orders::OrderStore`])
//! with a `PostgreSQL` implementation and an in-memory implementation used by
//! the workflow test suites.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/backend/migrations/` and run via:
//! ```bash
//! cargo run -p clementine-cli -- migrate
//! ```

pub mod memory;
pub mod orders;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::{MemoryIdentityStore, MemoryOrderStore};
pub use orders::{OrderStore, PgOrderStore};
pub use users::{IdentityStore, PgIdentityStore};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

//! Domain model types.

pub mod order;
pub mod user;

pub use order::{BuyerSummary, Order, OrderItem};
pub use user::{NewUser, User, UserPublic, UserUpdate};

//! Workflow services.
//!
//! Each service is a single unit of work per call: validate the payload,
//! make at most one store round trip per logical step, and return a typed
//! result. Services never touch HTTP machinery; the route layer translates
//! their outcomes into responses.

pub mod auth;
pub mod orders;
pub mod token;

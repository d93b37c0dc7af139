//! Account workflow error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::token::TokenError;

/// Errors and negative outcomes of the account workflows.
///
/// Validation failures and business outcomes (duplicate registration, wrong
/// credentials, wrong recovery answer) are ordinary variants here: they are
/// expected, frequent, and must not be logged or monitored as faults. Only
/// `Repository`, `Token`, and `Hash` represent unexpected faults.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was absent or empty.
    #[error("{0} is Required")]
    MissingField(&'static str),

    /// Login called without both email and password. Deliberately does not
    /// disclose which half was missing.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No account exists for the login email.
    #[error("Email is not registered")]
    EmailNotRegistered,

    /// Login password did not match the stored hash.
    #[error("Invalid Password")]
    InvalidPassword,

    /// Registration email already has an account.
    #[error("Already Register please login")]
    AlreadyRegistered,

    /// Recovery email+answer pair matched no account. A wrong email and a
    /// wrong answer are indistinguishable by design.
    #[error("Wrong Email Or Answer")]
    WrongEmailOrAnswer,

    /// Profile update supplied a password below the minimum length.
    #[error("Password is required and must be at least 6 characters long")]
    WeakPassword,

    /// The authenticated caller's account no longer exists.
    #[error("unknown identity")]
    UnknownIdentity,

    /// Store fault.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Token issuance fault.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Password hashing fault.
    #[error("password hashing error")]
    Hash,
}

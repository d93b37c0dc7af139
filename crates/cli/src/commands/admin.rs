//! Privileged account bootstrap.
//!
//! The registration workflow only ever creates ordinary buyers; the first
//! administrator has to come from somewhere. This command inserts an account
//! with the privileged role directly through the identity store.

use secrecy::SecretString;
use thiserror::Error;

use clementine_backend::db::users::{IdentityStore, PgIdentityStore};
use clementine_backend::db::{self, RepositoryError};
use clementine_backend::models::NewUser;
use clementine_backend::services::auth::hash_password;
use clementine_core::Role;

/// Errors that can occur while creating an admin account.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("an account with this email already exists")]
    AlreadyExists,

    #[error("store error: {0}")]
    Repository(RepositoryError),

    #[error("password hashing failed")]
    Hash,
}

/// Create a privileged account.
///
/// # Errors
///
/// Returns `AdminError::AlreadyExists` if the email is taken, and the
/// corresponding variant for database or hashing failures.
pub async fn create_admin(
    email: &str,
    name: &str,
    password: &str,
    phone: &str,
    address: &str,
    answer: &str,
) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CLEMENTINE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("CLEMENTINE_DATABASE_URL"))?;

    let pool = db::create_pool(&database_url).await?;
    let store = PgIdentityStore::new(&pool);

    let password_hash = hash_password(password).map_err(|_| AdminError::Hash)?;

    let user = store
        .create(NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash,
            phone: phone.to_owned(),
            address: address.to_owned(),
            answer: answer.to_owned(),
            role: Role::ADMIN,
        })
        .await
        .map_err(|err| match err {
            RepositoryError::Conflict(_) => AdminError::AlreadyExists,
            other => AdminError::Repository(other),
        })?;

    tracing::info!(id = %user.id, email = %user.email, "Admin account created");
    Ok(())
}

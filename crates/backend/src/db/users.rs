//! Identity store: account lookup, creation, and partial update.
//!
//! [`IdentityStore`] is the only data-access surface the account workflows
//! call. The exact call shapes (lookup by email, by email plus recovery
//! answer, by id, insert, update-by-id returning the new record) are part of
//! the workflows' correctness contract, so they are pinned down here rather
//! than left to ad-hoc queries in the services.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use clementine_core::{Role, UserId};

use super::RepositoryError;
use crate::models::{NewUser, User, UserUpdate};

/// Data-access contract for account records.
#[allow(async_fn_in_trait)]
pub trait IdentityStore {
    /// Look up an account by exact email match.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Look up an account by exact match of both email and recovery answer.
    ///
    /// A miss on either half is indistinguishable from a miss on both.
    async fn find_by_email_and_answer(
        &self,
        email: &str,
        answer: &str,
    ) -> Result<Option<User>, RepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Persist a new account and return the stored record.
    async fn create(&self, fields: NewUser) -> Result<User, RepositoryError>;

    /// Apply a partial update keyed by id and return the post-update record.
    ///
    /// `None` fields keep their stored value.
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError>;
}

/// Database row for an account.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    address: String,
    answer: String,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            address: row.address,
            answer: row.answer,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, phone, address, answer, role, created_at, updated_at";

/// `PostgreSQL`-backed identity store.
pub struct PgIdentityStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgIdentityStore<'a> {
    /// Create a new identity store over a connection pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl IdentityStore for PgIdentityStore<'_> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email_and_answer(
        &self,
        email: &str,
        answer: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND answer = $2"
        ))
        .bind(email)
        .bind(answer)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, fields: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password_hash, phone, address, answer, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(fields.name)
        .bind(fields.email)
        .bind(fields.password_hash)
        .bind(fields.phone)
        .bind(fields.address)
        .bind(fields.answer)
        .bind(fields.role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 password_hash = COALESCE($3, password_hash),
                 phone = COALESCE($4, phone),
                 address = COALESCE($5, address),
                 updated_at = now()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.password_hash)
        .bind(update.phone)
        .bind(update.address)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}

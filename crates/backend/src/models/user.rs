//! User domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. [`User`] deliberately does not implement `Serialize`: everything
//! that leaves the service goes through [`UserPublic`], which carries neither
//! the password hash nor the security answer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use clementine_core::{Role, UserId};

/// A registered account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, unique across all accounts.
    pub email: String,
    /// Argon2id hash of the password. Never the plaintext.
    pub password_hash: String,
    /// Contact phone number.
    pub phone: String,
    /// Shipping address.
    pub address: String,
    /// Security-question answer, used only for password recovery.
    pub answer: String,
    /// Account role (0 = buyer, nonzero = privileged).
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a [`User`] for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: Role,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            role: user.role,
        }
    }
}

/// Fields for creating a new account.
///
/// The password arrives here already hashed; the store never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub answer: String,
    pub role: Role,
}

/// Partial update of an account, keyed by id at the store layer.
///
/// `Some` fields are written; `None` fields keep their stored value. Password
/// recovery sets only `password_hash`; profile update sets all four fields
/// with the merged values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_public_projection_carries_no_secrets() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(1),
            name: "JJ".to_owned(),
            email: "jj@example.com".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_owned(),
            phone: "12345678".to_owned(),
            address: "SG".to_owned(),
            answer: "blue".to_owned(),
            role: Role::BUYER,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(UserPublic::from(&user)).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.get("email").unwrap(), "jj@example.com");
        assert_eq!(object.get("role").unwrap(), 0);
        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!object.contains_key("answer"));
    }
}

//! Account workflows.
//!
//! Registration, login, password recovery, and profile update over an
//! [`IdentityStore`], plus the Argon2id credential codec.
//!
//! Validation is deliberately asymmetric and mirrors the storefront's
//! observable behavior: registration checks field presence only (short
//! passwords are accepted), profile update enforces a minimum password
//! length before touching the store, and recovery enforces neither.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::Deserialize;

use clementine_core::{Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::IdentityStore;
use crate::models::{NewUser, User, UserUpdate};
use crate::services::token::TokenIssuer;

/// Minimum password length, enforced only by profile update.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub answer: Option<String>,
}

/// Login payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Password recovery payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecoverInput {
    pub email: Option<String>,
    pub answer: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

/// Profile update payload. Every field is optional; empty strings count as
/// "not supplied".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A successful login: the issued token and the authenticated account.
#[derive(Debug)]
pub struct LoginSuccess {
    pub token: String,
    pub user: User,
}

/// Account workflow service.
pub struct AuthService<'a, S> {
    store: S,
    tokens: &'a TokenIssuer,
}

impl<'a, S: IdentityStore> AuthService<'a, S> {
    /// Create a new account service over a store and token issuer.
    pub const fn new(store: S, tokens: &'a TokenIssuer) -> Self {
        Self { store, tokens }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new account.
    ///
    /// Fields are checked for presence in a fixed order; the first missing
    /// field determines the single reported error. There is no password
    /// length check here. A duplicate email is a normal outcome
    /// (`AuthError::AlreadyRegistered`), not a fault.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for an absent or empty field,
    /// `AuthError::AlreadyRegistered` for a duplicate email, and a fault
    /// variant if the store or codec fails.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let name = required(input.name.as_deref(), "Name")?;
        let email = required(input.email.as_deref(), "Email")?;
        let password = required(input.password.as_deref(), "Password")?;
        let phone = required(input.phone.as_deref(), "Phone no")?;
        let address = required(input.address.as_deref(), "Address")?;
        let answer = required(input.answer.as_deref(), "Answer")?;

        if self.store.find_by_email(email).await?.is_some() {
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = hash_password(password)?;

        let user = self
            .store
            .create(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
                phone: phone.to_owned(),
                address: address.to_owned(),
                answer: answer.to_owned(),
                role: Role::default(),
            })
            .await
            .map_err(|e| match e {
                // Lost the race against a concurrent registration; the
                // unique constraint is the real uniqueness guarantee.
                RepositoryError::Conflict(_) => AuthError::AlreadyRegistered,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Authenticate with email and password and issue a session token.
    ///
    /// A missing email or password yields one undifferentiated
    /// `InvalidCredentials` outcome; an unknown email and a wrong password
    /// are reported distinctly.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials`, `AuthError::EmailNotRegistered`,
    /// or `AuthError::InvalidPassword` for the corresponding outcomes, and a
    /// fault variant if the store or issuer fails.
    pub async fn login(&self, input: LoginInput) -> Result<LoginSuccess, AuthError> {
        let (email, password) = match (input.email.as_deref(), input.password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                (email, password)
            }
            _ => return Err(AuthError::InvalidCredentials),
        };

        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::EmailNotRegistered)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidPassword);
        }

        let token = self.tokens.issue(user.id)?;
        Ok(LoginSuccess { token, user })
    }

    // =========================================================================
    // Password Recovery
    // =========================================================================

    /// Reset the password of the account matching both email and answer.
    ///
    /// Only the password field is written. A wrong email, wrong answer, or
    /// both produce the same `WrongEmailOrAnswer` outcome.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for an absent or empty field,
    /// `AuthError::WrongEmailOrAnswer` when no account matches, and a fault
    /// variant if the store or codec fails.
    pub async fn forgot_password(&self, input: RecoverInput) -> Result<(), AuthError> {
        let email = required(input.email.as_deref(), "Email")?;
        let answer = required(input.answer.as_deref(), "Answer")?;
        let new_password = required(input.new_password.as_deref(), "New Password")?;

        let user = self
            .store
            .find_by_email_and_answer(email, answer)
            .await?
            .ok_or(AuthError::WrongEmailOrAnswer)?;

        let password_hash = hash_password(new_password)?;
        self.store
            .update(
                user.id,
                UserUpdate {
                    password_hash: Some(password_hash),
                    ..UserUpdate::default()
                },
            )
            .await?;

        Ok(())
    }

    // =========================================================================
    // Profile Update
    // =========================================================================

    /// Merge a partial profile edit onto the caller's account.
    ///
    /// Each field keeps its stored value unless a non-empty replacement is
    /// supplied; an empty-string password means "keep the old hash". A
    /// supplied password shorter than [`MIN_PASSWORD_LENGTH`] is rejected
    /// before any store call.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` for a short password,
    /// `AuthError::UnknownIdentity` if the caller's account no longer exists,
    /// and a fault variant if the store or codec fails.
    pub async fn update_profile(
        &self,
        caller: UserId,
        input: ProfileInput,
    ) -> Result<User, AuthError> {
        let new_password = input.password.as_deref().filter(|p| !p.is_empty());
        if new_password.is_some_and(|p| p.len() < MIN_PASSWORD_LENGTH) {
            return Err(AuthError::WeakPassword);
        }

        let existing = self
            .store
            .find_by_id(caller)
            .await?
            .ok_or(AuthError::UnknownIdentity)?;

        let password_hash = match new_password {
            Some(password) => hash_password(password)?,
            None => existing.password_hash.clone(),
        };

        let merged = UserUpdate {
            name: Some(non_empty_or(input.name, existing.name)),
            password_hash: Some(password_hash),
            phone: Some(non_empty_or(input.phone, existing.phone)),
            address: Some(non_empty_or(input.address, existing.address)),
        };

        let updated = self.store.update(caller, merged).await?;
        Ok(updated)
    }
}

/// Require a non-empty field, naming it in the error.
fn required<'a>(value: Option<&'a str>, label: &'static str) -> Result<&'a str, AuthError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::MissingField(label)),
    }
}

/// The supplied value if present and non-empty, else the stored one.
fn non_empty_or(value: Option<String>, stored: String) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => stored,
    }
}

// =============================================================================
// Credential Codec
// =============================================================================

/// Hash a password using Argon2id with a fresh OS-random salt.
///
/// # Errors
///
/// Returns `AuthError::Hash` if the transform itself fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hash)
}

/// Verify a password against a stored hash.
///
/// Never raises: an unparseable hash or a mismatch both come back `false`.
/// Comparison is the hash library's own verification path; no extra string
/// comparison is layered on top.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryIdentityStore;
    use crate::services::token::{DEFAULT_TOKEN_TTL, TokenIssuer};
    use secrecy::SecretString;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &SecretString::from("gK8mQ2xR5nW9zD3tY7vB1cF4hJ6pL0sA"),
            DEFAULT_TOKEN_TTL,
        )
    }

    fn register_input() -> RegisterInput {
        RegisterInput {
            name: Some("JJ".to_owned()),
            email: Some("jj@example.com".to_owned()),
            password: Some("pw123456".to_owned()),
            phone: Some("12345678".to_owned()),
            address: Some("SG".to_owned()),
            answer: Some("blue".to_owned()),
        }
    }

    #[tokio::test]
    async fn test_register_missing_fields_report_in_order() {
        let cases = [
            ("name", "Name is Required"),
            ("email", "Email is Required"),
            ("password", "Password is Required"),
            ("phone", "Phone no is Required"),
            ("address", "Address is Required"),
            ("answer", "Answer is Required"),
        ];

        for (field, message) in cases {
            let store = MemoryIdentityStore::new();
            let tokens = issuer();
            let service = AuthService::new(&store, &tokens);

            let mut input = register_input();
            match field {
                "name" => input.name = None,
                "email" => input.email = None,
                "password" => input.password = None,
                "phone" => input.phone = None,
                "address" => input.address = None,
                _ => input.answer = None,
            }

            let err = service.register(input).await.unwrap_err();
            assert_eq!(err.to_string(), message);
            assert_eq!(store.inserts(), 0, "no insert for missing {field}");
        }
    }

    #[tokio::test]
    async fn test_register_empty_field_counts_as_missing() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let mut input = register_input();
        input.email = Some(String::new());

        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("Email")));
        assert_eq!(store.inserts(), 0);
    }

    #[tokio::test]
    async fn test_register_first_missing_field_wins() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let input = RegisterInput::default();
        let err = service.register(input).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("Name")));
    }

    #[tokio::test]
    async fn test_register_short_password_passes_validation() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let mut input = register_input();
        input.password = Some("123".to_owned());

        let user = service.register(input).await.unwrap();
        assert!(verify_password("123", &user.password_hash));
        assert_eq!(store.inserts(), 1);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let user = service.register(register_input()).await.unwrap();
        assert_ne!(user.password_hash, "pw123456");
        assert!(verify_password("pw123456", &user.password_hash));
        assert_eq!(user.role, Role::BUYER);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_normal_outcome() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        service.register(register_input()).await.unwrap();

        // Same email, every other field different: email dominates.
        let second = RegisterInput {
            name: Some("Other Name".to_owned()),
            email: Some("jj@example.com".to_owned()),
            password: Some("different".to_owned()),
            phone: Some("99999999".to_owned()),
            address: Some("Other".to_owned()),
            answer: Some("green".to_owned()),
        };
        let err = service.register(second).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
        assert_eq!(store.inserts(), 1);
    }

    #[tokio::test]
    async fn test_login_missing_either_field_is_undifferentiated() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let missing_password = LoginInput {
            email: Some("a@b.com".to_owned()),
            password: None,
        };
        let missing_email = LoginInput {
            email: None,
            password: Some("x".to_owned()),
        };

        for input in [missing_password, missing_email] {
            let err = service.login(input).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "Invalid email or password");
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let err = service
            .login(LoginInput {
                email: Some("nobody@example.com".to_owned()),
                password: Some("x".to_owned()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailNotRegistered));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        service.register(register_input()).await.unwrap();

        let err = service
            .login(LoginInput {
                email: Some("jj@example.com".to_owned()),
                password: Some("bad".to_owned()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidPassword));
    }

    #[tokio::test]
    async fn test_login_success_issues_token_for_account() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let registered = service.register(register_input()).await.unwrap();

        let success = service
            .login(LoginInput {
                email: Some("jj@example.com".to_owned()),
                password: Some("pw123456".to_owned()),
            })
            .await
            .unwrap();

        assert_eq!(success.user.id, registered.id);
        let claims = tokens.decode(&success.token).unwrap();
        assert_eq!(claims.user(), registered.id);
    }

    #[tokio::test]
    async fn test_recover_missing_fields_in_order() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let err = service
            .forgot_password(RecoverInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("Email")));

        let err = service
            .forgot_password(RecoverInput {
                email: Some("jj@example.com".to_owned()),
                ..RecoverInput::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("Answer")));

        let err = service
            .forgot_password(RecoverInput {
                email: Some("jj@example.com".to_owned()),
                answer: Some("blue".to_owned()),
                new_password: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingField("New Password")));
    }

    #[tokio::test]
    async fn test_recover_wrong_email_and_wrong_answer_indistinguishable() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        service.register(register_input()).await.unwrap();

        let wrong_answer = service
            .forgot_password(RecoverInput {
                email: Some("jj@example.com".to_owned()),
                answer: Some("green".to_owned()),
                new_password: Some("newpass".to_owned()),
            })
            .await
            .unwrap_err();
        let wrong_email = service
            .forgot_password(RecoverInput {
                email: Some("nobody@example.com".to_owned()),
                answer: Some("blue".to_owned()),
                new_password: Some("newpass".to_owned()),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_answer.to_string(), wrong_email.to_string());
        assert!(matches!(wrong_answer, AuthError::WrongEmailOrAnswer));
        assert!(matches!(wrong_email, AuthError::WrongEmailOrAnswer));
        assert_eq!(store.updates(), 0);
    }

    #[tokio::test]
    async fn test_recover_updates_only_password() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        service.register(register_input()).await.unwrap();

        service
            .forgot_password(RecoverInput {
                email: Some("jj@example.com".to_owned()),
                answer: Some("blue".to_owned()),
                new_password: Some("newpass".to_owned()),
            })
            .await
            .unwrap();

        let (_, payload) = store.last_update().unwrap();
        assert!(payload.password_hash.is_some());
        assert_eq!(payload.name, None);
        assert_eq!(payload.phone, None);
        assert_eq!(payload.address, None);

        let success = service
            .login(LoginInput {
                email: Some("jj@example.com".to_owned()),
                password: Some("newpass".to_owned()),
            })
            .await
            .unwrap();
        assert_eq!(success.user.name, "JJ");
    }

    #[tokio::test]
    async fn test_update_profile_short_password_rejected_before_store() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let user = service.register(register_input()).await.unwrap();

        let err = service
            .update_profile(
                user.id,
                ProfileInput {
                    password: Some("123".to_owned()),
                    ..ProfileInput::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::WeakPassword));
        assert_eq!(store.updates(), 0);
    }

    #[tokio::test]
    async fn test_update_profile_preserves_untouched_fields() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let user = service.register(register_input()).await.unwrap();
        let old_hash = user.password_hash.clone();

        let updated = service
            .update_profile(
                user.id,
                ProfileInput {
                    name: Some("New".to_owned()),
                    ..ProfileInput::default()
                },
            )
            .await
            .unwrap();

        // The merged update payload still carries the stored hash.
        let (_, payload) = store.last_update().unwrap();
        assert_eq!(payload.name.as_deref(), Some("New"));
        assert_eq!(payload.password_hash.as_deref(), Some(old_hash.as_str()));

        assert_eq!(updated.name, "New");
        assert_eq!(updated.password_hash, old_hash);
        assert_eq!(updated.phone, "12345678");
        assert_eq!(updated.address, "SG");
    }

    #[tokio::test]
    async fn test_update_profile_empty_password_keeps_old_hash() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let user = service.register(register_input()).await.unwrap();
        let old_hash = user.password_hash.clone();

        let updated = service
            .update_profile(
                user.id,
                ProfileInput {
                    password: Some(String::new()),
                    ..ProfileInput::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.password_hash, old_hash);
    }

    #[tokio::test]
    async fn test_update_profile_rehashes_valid_password() {
        let store = MemoryIdentityStore::new();
        let tokens = issuer();
        let service = AuthService::new(&store, &tokens);

        let user = service.register(register_input()).await.unwrap();

        let updated = service
            .update_profile(
                user.id,
                ProfileInput {
                    password: Some("123456".to_owned()),
                    ..ProfileInput::default()
                },
            )
            .await
            .unwrap();

        assert_ne!(updated.password_hash, "123456");
        assert!(verify_password("123456", &updated.password_hash));
        assert!(!verify_password("pw123456", &updated.password_hash));
    }

    #[test]
    fn test_codec_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn test_codec_salted_hashes_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_verify_garbage_hash_is_false_not_error() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}

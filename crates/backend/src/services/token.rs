//! Signed session tokens.
//!
//! Issues HS256 tokens whose claims carry only the account's durable id plus
//! issued-at and expiry timestamps - never the password hash or the recovery
//! answer. Decoding validates both the signature and the expiry.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use clementine_core::UserId;

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Error issuing or decoding a token.
#[derive(Debug, Error)]
#[error("token error: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The account's durable id.
    pub sub: i32,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    fn new(user: UserId, ttl: Duration) -> Self {
        let now = unix_now();
        Self {
            sub: user.as_i32(),
            iat: now,
            exp: now.saturating_add(ttl.as_secs().try_into().unwrap_or(i64::MAX)),
        }
    }

    /// The account this token was issued for.
    #[must_use]
    pub const fn user(&self) -> UserId {
        UserId::new(self.sub)
    }
}

/// Issues and decodes signed session tokens.
///
/// The signing secret is injected at construction; nothing here reads the
/// process environment.
pub struct TokenIssuer {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from a signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a token for an account.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if signing fails.
    pub fn issue(&self, user: UserId) -> Result<String, TokenError> {
        let claims = Claims::new(user, self.ttl);
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &self.encoding,
        )?;
        Ok(token)
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns `TokenError` if the signature is invalid or the token has
    /// expired.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.decoding,
            &jsonwebtoken::Validation::default(),
        )?;
        Ok(data.claims)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().try_into().unwrap_or(i64::MAX))
        .unwrap_or_default()
}

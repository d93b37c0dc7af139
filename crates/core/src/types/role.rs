//! Account role type.

use serde::{Deserialize, Serialize};

/// Ordinal account role.
///
/// Stored as a plain integer: `0` is an ordinary buyer, any nonzero value
/// marks a privileged (administrator) account. The ordinal form is part of
/// the wire contract, so this stays a transparent wrapper rather than an
/// enum with a closed set of variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(i32);

impl Role {
    /// Ordinary buyer account.
    pub const BUYER: Self = Self(0);

    /// Privileged administrator account.
    pub const ADMIN: Self = Self(1);

    /// Create a role from its ordinal value.
    #[must_use]
    pub const fn new(ordinal: i32) -> Self {
        Self(ordinal)
    }

    /// Get the underlying ordinal value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Whether this role grants privileged (all-orders, administration) access.
    #[must_use]
    pub const fn is_privileged(&self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Role {
    fn from(ordinal: i32) -> Self {
        Self(ordinal)
    }
}

impl From<Role> for i32 {
    fn from(role: Role) -> Self {
        role.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let ordinal = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(ordinal))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Role {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

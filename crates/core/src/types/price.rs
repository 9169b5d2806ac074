//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The amount has more than two decimal places.
    #[error("price cannot have more than {max} decimal places (got {amount})")]
    TooPrecise {
        /// The rejected amount.
        amount: Decimal,
        /// Maximum allowed decimal places.
        max: u32,
    },
    /// The amount is above [`Price::MAX`].
    #[error("price cannot exceed {max} (got {amount})")]
    TooLarge {
        /// The rejected amount.
        amount: Decimal,
        /// Largest allowed amount.
        max: Decimal,
    },
}

/// A non-negative product price.
///
/// Stored as `NUMERIC(12, 2)` in `PostgreSQL`, so amounts are limited to two
/// decimal places and at most [`Price::MAX`]. Serializes as the bare decimal
/// amount.
///
/// ## Examples
///
/// ```
/// use marketplace_core::Price;
/// use rust_decimal::Decimal;
///
/// assert!(Price::new(Decimal::new(1999, 2)).is_ok());
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// assert!(Price::new(Decimal::new(1999, 3)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest storable price.
    pub const MAX: Self = Self(Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2)); // 9_999_999_999.99

    /// Decimal places kept by the price column.
    pub const SCALE: u32 = 2;

    /// Create a new price.
    ///
    /// Trailing zeros beyond two places are accepted (`1.500` is `1.50`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero,
    /// `PriceError::TooPrecise` if it has more than two significant decimal
    /// places, and `PriceError::TooLarge` if it is above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative(amount));
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooPrecise {
                amount,
                max: Self::SCALE,
            });
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge {
                amount,
                max: Self::MAX.0,
            });
        }
        Ok(Self(amount))
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

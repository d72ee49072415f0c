//! Exact fixed-point conversion between display units and smallest units.
//!
//! Callers speak in display units (`10` HBAR, `0.5` of a token); the network
//! speaks in integer smallest units (tinybars, token base units). Conversion
//! is decimal arithmetic all the way down: a value at the boundary of the
//! smallest representable unit must convert exactly, never through a float.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Decimal places of the base currency: 1 HBAR = 10^8 tinybars.
pub const HBAR_DECIMALS: u32 = 8;

/// Largest decimal scale the conversion supports. Mirror nodes report token
/// decimals well below this; anything above it cannot scale inside `i64`.
pub const MAX_DECIMALS: u32 = 18;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount {value} is not representable with {decimals} decimals")]
    NotRepresentable { value: Decimal, decimals: u32 },
    #[error("amount {value} overflows the smallest-unit range")]
    Overflow { value: Decimal },
    #[error("unsupported decimal scale {0}, maximum is {MAX_DECIMALS}")]
    UnsupportedDecimals(u32),
}

/// Scale a display-unit amount by `10^decimals` into integer smallest units.
///
/// `0.00000001` at 8 decimals is exactly `1`; a remainder below the smallest
/// unit is an error, never rounded away.
pub fn to_smallest_units(value: Decimal, decimals: u32) -> Result<i64, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }

    let factor = Decimal::from(10u64.pow(decimals));
    let scaled = value
        .checked_mul(factor)
        .ok_or(AmountError::Overflow { value })?;

    if !scaled.fract().is_zero() {
        return Err(AmountError::NotRepresentable { value, decimals });
    }

    scaled.to_i64().ok_or(AmountError::Overflow { value })
}

/// Tinybar conversion for the base currency.
pub fn hbar_to_tinybars(value: Decimal) -> Result<i64, AmountError> {
    to_smallest_units(value, HBAR_DECIMALS)
}

/// Render smallest units back into display units, for human messages only.
pub fn from_smallest_units(units: i64, decimals: u32) -> Decimal {
    Decimal::new(units.into(), 0) / Decimal::from(10u64.pow(decimals.min(MAX_DECIMALS)))
}

//! Numeric classification, caching, and exact coercion.
//!
//! The reader captures the *shape* of a numeric literal while lexing it
//! (sign, integer-digit count, fraction-digit count, exponent-digit count)
//! and defers all parsing to the first value access. The shape alone decides
//! the primary representation:
//!
//! - fraction or exponent present: `f64` by the fast lossy parse, or
//!   [`bigdecimal::BigDecimal`] when the exact path is requested;
//! - up to 9 integer digits: `i32`, no overflow possible;
//! - up to 18 integer digits: `i64`, down-cast to `i32` only at the 10-digit
//!   boundary when the value fits;
//! - longer: [`num_bigint::BigInt`].
//!
//! Movement between representations goes through the pure functions in
//! [`coerce`], each of which succeeds exactly or reports a
//! [`CoercionError`] naming the target type and, for range failures, the
//! legal range. Nothing here truncates or rounds silently.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use thiserror::Error;

/// The representation chosen for a numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum NumberKind {
    /// Fits `i32`.
    Int,
    /// Fits `i64` but not `i32`.
    Long,
    /// Integral, beyond `i64` classification.
    BigInt,
    /// Has a fraction or exponent; lossy binary representation.
    Double,
    /// Has a fraction or exponent; exact decimal representation.
    BigDecimal,
}

/// A materialized numeric value in its narrowest faithful representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// A binary double, possibly lossy with respect to the literal.
    Double(f64),
    /// An exact arbitrary-precision decimal.
    BigDecimal(BigDecimal),
}

/// A requested numeric representation cannot exactly hold a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoercionError {
    /// The value lies outside the target type's range.
    #[error("value out of {target} range [{min}, {max}]")]
    OutOfRange {
        /// Name of the representation that cannot hold the value.
        target: &'static str,
        /// Smallest value the target can hold.
        min: i128,
        /// Largest value the target can hold.
        max: i128,
    },

    /// The value has a fractional part and the target is integral.
    #[error("value has a fractional part and cannot be converted to {target}")]
    Fractional {
        /// Name of the integral target.
        target: &'static str,
    },

    /// The target cannot represent the value exactly.
    #[error("value cannot be represented exactly as {target}")]
    PrecisionLoss {
        /// Name of the inexact target.
        target: &'static str,
    },

    /// A NaN or infinity cannot be converted to any other representation.
    #[error("non-finite value cannot be converted to {target}")]
    NotFinite {
        /// Name of the requested target.
        target: &'static str,
    },
}

/// Digit-length breakdown of a numeric literal, captured during lexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NumberShape {
    pub negative: bool,
    pub int_digits: usize,
    pub frac_digits: usize,
    pub exp_digits: usize,
}

impl NumberShape {
    pub(crate) fn is_integral(self) -> bool {
        self.frac_digits == 0 && self.exp_digits == 0
    }

    /// Primary classification from the digit shape alone; no text is
    /// inspected. The 10-digit `i64` → `i32` down-cast happens at access
    /// time, once the value is known.
    pub(crate) fn classify(self, use_big_decimal_for_floats: bool) -> NumberKind {
        if !self.is_integral() {
            if use_big_decimal_for_floats {
                NumberKind::BigDecimal
            } else {
                NumberKind::Double
            }
        } else if self.int_digits <= 9 {
            NumberKind::Int
        } else if self.int_digits <= 18 {
            NumberKind::Long
        } else {
            NumberKind::BigInt
        }
    }
}

/// Lazily-populated alternate representations of the current numeric token.
///
/// A computed representation is never recomputed; the reader resets the
/// cache when it advances past the token.
#[derive(Debug, Default)]
pub(crate) struct NumberCache {
    pub int: Option<i32>,
    pub long: Option<i64>,
    pub big: Option<BigInt>,
    pub double: Option<f64>,
    pub decimal: Option<BigDecimal>,
}

impl NumberCache {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Pure conversions between cached numeric representations.
///
/// Each function either returns the exact value or a [`CoercionError`];
/// widening conversions that can never fail return the value directly.
pub mod coerce {
    use bigdecimal::BigDecimal;
    use num_bigint::BigInt;
    use num_traits::{float::FloatCore, FromPrimitive, Pow, ToPrimitive};

    use super::CoercionError;

    /// Largest integer magnitude `f64` represents contiguously.
    const EXACT_DOUBLE_BOUND: i64 = 1 << 53;

    fn out_of_range_i32() -> CoercionError {
        CoercionError::OutOfRange {
            target: "i32",
            min: i128::from(i32::MIN),
            max: i128::from(i32::MAX),
        }
    }

    fn out_of_range_i64() -> CoercionError {
        CoercionError::OutOfRange {
            target: "i64",
            min: i128::from(i64::MIN),
            max: i128::from(i64::MAX),
        }
    }

    /// Widens an `i32` to `i64`; always exact.
    #[must_use]
    pub fn int_to_long(value: i32) -> i64 {
        i64::from(value)
    }

    /// Widens an `i32` to a `BigInt`; always exact.
    #[must_use]
    pub fn int_to_bigint(value: i32) -> BigInt {
        BigInt::from(value)
    }

    /// Widens an `i32` to `f64`; always exact.
    #[must_use]
    pub fn int_to_double(value: i32) -> f64 {
        f64::from(value)
    }

    /// Widens an `i32` to a `BigDecimal`; always exact.
    #[must_use]
    pub fn int_to_decimal(value: i32) -> BigDecimal {
        BigDecimal::from(value)
    }

    /// Narrows an `i64` to `i32` with a range check.
    pub fn long_to_int(value: i64) -> Result<i32, CoercionError> {
        i32::try_from(value).map_err(|_| out_of_range_i32())
    }

    /// Widens an `i64` to a `BigInt`; always exact.
    #[must_use]
    pub fn long_to_bigint(value: i64) -> BigInt {
        BigInt::from(value)
    }

    /// Converts an `i64` to `f64`, failing when the magnitude exceeds the
    /// range `f64` represents exactly.
    pub fn long_to_double(value: i64) -> Result<f64, CoercionError> {
        if value.checked_abs().is_none_or(|m| m > EXACT_DOUBLE_BOUND) {
            return Err(CoercionError::PrecisionLoss { target: "f64" });
        }
        #[allow(clippy::cast_precision_loss)]
        Ok(value as f64)
    }

    /// Widens an `i64` to a `BigDecimal`; always exact.
    #[must_use]
    pub fn long_to_decimal(value: i64) -> BigDecimal {
        BigDecimal::from(value)
    }

    /// Narrows a `BigInt` to `i32` with a range check.
    pub fn bigint_to_int(value: &BigInt) -> Result<i32, CoercionError> {
        value.to_i32().ok_or_else(out_of_range_i32)
    }

    /// Narrows a `BigInt` to `i64` with a range check.
    pub fn bigint_to_long(value: &BigInt) -> Result<i64, CoercionError> {
        value.to_i64().ok_or_else(out_of_range_i64)
    }

    /// Converts a `BigInt` to `f64`, failing unless the conversion is
    /// exact.
    pub fn bigint_to_double(value: &BigInt) -> Result<f64, CoercionError> {
        let loss = CoercionError::PrecisionLoss { target: "f64" };
        let double = value.to_f64().ok_or(loss.clone())?;
        if !double.is_finite() || BigInt::from_f64(double).as_ref() != Some(value) {
            return Err(loss);
        }
        Ok(double)
    }

    /// Converts a `BigInt` to a `BigDecimal`; always exact.
    #[must_use]
    pub fn bigint_to_decimal(value: &BigInt) -> BigDecimal {
        BigDecimal::from(value.clone())
    }

    /// Narrows an `f64` to `i32`: the value must be finite, integral, and
    /// in range.
    pub fn double_to_int(value: f64) -> Result<i32, CoercionError> {
        if !value.is_finite() {
            return Err(CoercionError::NotFinite { target: "i32" });
        }
        if value.fract() != 0.0 {
            return Err(CoercionError::Fractional { target: "i32" });
        }
        if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return Err(out_of_range_i32());
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(value as i32)
    }

    /// Narrows an `f64` to `i64`: the value must be finite, integral, and
    /// in range.
    pub fn double_to_long(value: f64) -> Result<i64, CoercionError> {
        if !value.is_finite() {
            return Err(CoercionError::NotFinite { target: "i64" });
        }
        if value.fract() != 0.0 {
            return Err(CoercionError::Fractional { target: "i64" });
        }
        // 2^63 itself rounds onto the f64 grid, so test the half-open range.
        #[allow(clippy::cast_precision_loss)]
        let bound = (1u64 << 63) as f64;
        if value < -bound || value >= bound {
            return Err(out_of_range_i64());
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(value as i64)
    }

    /// Converts an `f64` to a `BigInt`: the value must be finite and
    /// integral.
    pub fn double_to_bigint(value: f64) -> Result<BigInt, CoercionError> {
        if !value.is_finite() {
            return Err(CoercionError::NotFinite { target: "BigInt" });
        }
        if value.fract() != 0.0 {
            return Err(CoercionError::Fractional { target: "BigInt" });
        }
        BigInt::from_f64(value).ok_or(CoercionError::NotFinite { target: "BigInt" })
    }

    /// Converts an `f64` to its exact `BigDecimal` value. Every finite
    /// double has one; NaN and infinities fail.
    pub fn double_to_decimal(value: f64) -> Result<BigDecimal, CoercionError> {
        BigDecimal::try_from(value).map_err(|_| CoercionError::NotFinite {
            target: "BigDecimal",
        })
    }

    /// Narrows a `BigDecimal` to `i32` via [`decimal_to_bigint`].
    pub fn decimal_to_int(value: &BigDecimal) -> Result<i32, CoercionError> {
        bigint_to_int(&decimal_to_bigint(value)?)
    }

    /// Narrows a `BigDecimal` to `i64` via [`decimal_to_bigint`].
    pub fn decimal_to_long(value: &BigDecimal) -> Result<i64, CoercionError> {
        bigint_to_long(&decimal_to_bigint(value)?)
    }

    /// Converts a `BigDecimal` to a `BigInt`: the value must be integral.
    pub fn decimal_to_bigint(value: &BigDecimal) -> Result<BigInt, CoercionError> {
        let (digits, exponent) = value.normalized().into_bigint_and_exponent();
        if exponent > 0 {
            return Err(CoercionError::Fractional { target: "BigInt" });
        }
        let shift = u32::try_from(exponent.unsigned_abs())
            .map_err(|_| CoercionError::PrecisionLoss { target: "BigInt" })?;
        Ok(digits * Pow::pow(BigInt::from(10), shift))
    }

    /// Converts a `BigDecimal` to `f64`, failing unless the conversion is
    /// exact.
    pub fn decimal_to_double(value: &BigDecimal) -> Result<f64, CoercionError> {
        let loss = CoercionError::PrecisionLoss { target: "f64" };
        let double = value.to_f64().ok_or(loss.clone())?;
        if !double.is_finite() {
            return Err(loss);
        }
        let back = BigDecimal::try_from(double).map_err(|_| loss.clone())?;
        if back != *value {
            return Err(loss);
        }
        Ok(double)
    }
}

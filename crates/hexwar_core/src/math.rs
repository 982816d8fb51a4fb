//! Fixed-point math utilities for deterministic rule arithmetic.
//!
//! Gravity, damage percentages and MP multipliers are all computed in
//! fixed point so that the same unit state produces the same numbers on
//! every platform.

use fixed::types::I32F32;

/// Fixed-point number type for all rule math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Divide and round to the nearest integer, with exact halves rounding down.
///
/// This is the rounding used for gravity: 5 MP at 2G is 2.5, which becomes 2.
/// A quotient outside the fixed-point range saturates to `i32::MAX` (or
/// `i32::MIN` for a negative value).
#[must_use]
pub fn div_round_half_down(value: Fixed, divisor: Fixed) -> i32 {
    if divisor <= Fixed::ZERO {
        return value.to_num::<i32>();
    }
    let Some(quotient) = value.checked_div(divisor) else {
        return if value < Fixed::ZERO { i32::MIN } else { i32::MAX };
    };
    let floor = quotient.floor();
    let fraction = quotient - floor;
    let half = Fixed::from_num(1) / Fixed::from_num(2);
    if fraction > half {
        floor.to_num::<i32>().saturating_add(1)
    } else {
        floor.to_num::<i32>()
    }
}

/// Multiply an integer by `num / den` and truncate toward zero.
///
/// `scale_floor(5, 3, 2)` is `floor(5 * 1.5) = 7`. Results outside `i32`
/// saturate.
#[must_use]
pub const fn scale_floor(value: i32, num: i32, den: i32) -> i32 {
    if den == 0 {
        return 0;
    }
    let scaled = (value as i64) * (num as i64) / (den as i64);
    if scaled > i32::MAX as i64 {
        i32::MAX
    } else if scaled < i32::MIN as i64 {
        i32::MIN
    } else {
        scaled as i32
    }
}

/// Halve an integer, rounding up.
#[must_use]
pub const fn halve_round_up(value: i32) -> i32 {
    if value <= 0 {
        return value;
    }
    (value + 1) / 2
}

/// Fraction `current / original` as fixed point.
///
/// Returns `None` when `original` is zero (the quantity does not apply).
#[must_use]
pub fn ratio(current: u32, original: u32) -> Option<Fixed> {
    if original == 0 {
        return None;
    }
    Some(Fixed::from_num(current) / Fixed::from_num(original))
}

/// Exact check for `current / original < percent / 100` without division.
#[must_use]
pub const fn below_percent(current: u32, original: u32, percent: u32) -> bool {
    (current as u64) * 100 < (original as u64) * (percent as u64)
}

/// Exact check for `current / original <= percent / 100` without division.
#[must_use]
pub const fn at_or_below_percent(current: u32, original: u32, percent: u32) -> bool {
    (current as u64) * 100 <= (original as u64) * (percent as u64)
}

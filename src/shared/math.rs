//! Exact decimal arithmetic
//!
//! Every money and weight computation goes through a [`Math`] implementation
//! so rounding direction is always explicit. [`DecimalMath`] is the default
//! backend, built on `rust_decimal` (96-bit mantissa, no binary floats).

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::support::errors::ArithmeticError;

/// Arithmetic capability used by the calculators.
///
/// Implementations must be deterministic and free of shared mutable state;
/// one instance is shared by every calculation of an engine.
pub trait Math: Send + Sync + fmt::Debug {
    fn add(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError>;

    fn sub(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError>;

    fn mul(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError>;

    /// Fails with [`ArithmeticError::DivisionByZero`] when `b` is zero.
    fn div(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError>;

    fn compare(&self, a: Decimal, b: Decimal) -> Ordering;

    /// Round toward positive infinity keeping `places` fractional digits.
    fn round_up(&self, value: Decimal, places: u32) -> Decimal;

    /// Round toward negative infinity keeping `places` fractional digits.
    fn round_down(&self, value: Decimal, places: u32) -> Decimal;

    fn greater_than(&self, a: Decimal, b: Decimal) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    fn less_than(&self, a: Decimal, b: Decimal) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    fn greater_or_equal(&self, a: Decimal, b: Decimal) -> bool {
        self.compare(a, b) != Ordering::Less
    }

    fn less_or_equal(&self, a: Decimal, b: Decimal) -> bool {
        self.compare(a, b) != Ordering::Greater
    }
}

/// Default [`Math`] backend over `rust_decimal::Decimal`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalMath;

impl Math for DecimalMath {
    fn add(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError> {
        a.checked_add(b).ok_or(ArithmeticError::Overflow("add"))
    }

    fn sub(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError> {
        a.checked_sub(b).ok_or(ArithmeticError::Overflow("sub"))
    }

    fn mul(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError> {
        a.checked_mul(b).ok_or(ArithmeticError::Overflow("mul"))
    }

    fn div(&self, a: Decimal, b: Decimal) -> Result<Decimal, ArithmeticError> {
        if b.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        a.checked_div(b).ok_or(ArithmeticError::Overflow("div"))
    }

    fn compare(&self, a: Decimal, b: Decimal) -> Ordering {
        a.cmp(&b)
    }

    fn round_up(&self, value: Decimal, places: u32) -> Decimal {
        value.round_dp_with_strategy(places, RoundingStrategy::ToPositiveInfinity)
    }

    fn round_down(&self, value: Decimal, places: u32) -> Decimal {
        value.round_dp_with_strategy(places, RoundingStrategy::ToNegativeInfinity)
    }
}

/// Render a money amount as `DDDD.CC`: exactly two fractional digits,
/// no thousands separators.
///
/// The amount is expected to be rounded already; any extra digits are
/// rounded half away from zero by `rescale`.
pub fn format_money(amount: Decimal) -> String {
    let mut rendered = amount;
    rendered.rescale(2);
    rendered.to_string()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round_up_moves_toward_positive_infinity() {
        let m = DecimalMath;
        assert_eq!(m.round_up(dec!(20.701), 2), dec!(20.71));
        assert_eq!(m.round_up(dec!(20.70), 2), dec!(20.70));
        assert_eq!(m.round_up(dec!(1.2000001), 3), dec!(1.201));
        assert_eq!(m.round_up(dec!(2.001), 0), dec!(3));
    }

    #[test]
    fn round_down_is_floor() {
        let m = DecimalMath;
        assert_eq!(m.round_down(dec!(2.000), 0), dec!(2));
        assert_eq!(m.round_down(dec!(2.001), 0), dec!(2));
        assert_eq!(m.round_down(dec!(7.99), 0), dec!(7));
        assert_eq!(m.round_down(dec!(7.999), 2), dec!(7.99));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let m = DecimalMath;
        assert_eq!(
            m.div(dec!(10), Decimal::ZERO),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(m.div(dec!(6000), dec!(5000)), Ok(dec!(1.2)));
    }

    #[test]
    fn overflow_is_reported() {
        let m = DecimalMath;
        assert!(matches!(
            m.mul(Decimal::MAX, dec!(2)),
            Err(ArithmeticError::Overflow("mul"))
        ));
        assert!(matches!(
            m.add(Decimal::MAX, Decimal::ONE),
            Err(ArithmeticError::Overflow("add"))
        ));
    }

    #[test]
    fn comparisons() {
        let m = DecimalMath;
        assert!(m.greater_than(dec!(1.2), dec!(1.0)));
        assert!(!m.greater_than(dec!(1.0), dec!(1.00)));
        assert!(m.less_or_equal(dec!(30), dec!(30.000)));
        assert!(m.greater_or_equal(dec!(30), dec!(30)));
        assert!(m.less_than(dec!(-1), Decimal::ZERO));
    }

    #[test]
    fn money_is_rendered_with_two_decimals() {
        assert_eq!(format_money(dec!(20.7)), "20.70");
        assert_eq!(format_money(dec!(20)), "20.00");
        assert_eq!(format_money(dec!(1234567.5)), "1234567.50");
        assert_eq!(format_money(dec!(0)), "0.00");
    }
}

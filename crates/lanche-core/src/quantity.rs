//! # Quantity Module
//!
//! Exact decimal quantities for stock levels, recipe amounts and cart lines.
//!
//! Ingredients are bought by the kilo or litre and recipes consume fractions
//! of them (0.150 kg of ground beef per burger), so quantities cannot be
//! integers. Floats would drift after a few hundred sales, so `Quantity`
//! wraps `rust_decimal::Decimal`. It still serialises as a JSON number.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A stock or line quantity in the product's own unit (un, kg, g, l, ml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    Decimal,
);

impl Quantity {
    /// Creates a quantity from a mantissa and a scale: `new(350, 3)` = 0.350.
    #[inline]
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Quantity(Decimal::new(mantissa, scale))
    }

    /// Creates a whole-number quantity.
    #[inline]
    pub fn from_int(value: i64) -> Self {
        Quantity(Decimal::from(value))
    }

    #[inline]
    pub const fn from_decimal(value: Decimal) -> Self {
        Quantity(value)
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// How many whole `per_unit` portions fit in this quantity.
    ///
    /// Returns `None` when `per_unit` is not positive.
    ///
    /// ## Example
    /// ```rust
    /// use lanche_core::quantity::Quantity;
    ///
    /// let stock = Quantity::from_int(10);
    /// assert_eq!(stock.whole_portions(Quantity::from_int(3)), Some(Quantity::from_int(3)));
    /// assert_eq!(stock.whole_portions(Quantity::zero()), None);
    /// ```
    pub fn whole_portions(&self, per_unit: Quantity) -> Option<Quantity> {
        if !per_unit.is_positive() {
            return None;
        }
        self.0
            .checked_div(per_unit.0)
            .map(|ratio| Quantity(ratio.floor()))
    }

    /// Clamps negative values to zero.
    #[inline]
    pub fn max_zero(self) -> Quantity {
        if self.is_negative() {
            Quantity::zero()
        } else {
            self
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

/// Displays the normalised decimal (`2.50` shows as `2.5`).
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::from_int(value)
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}

/// Recipe amount × units sold.
impl Mul for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, other: Self) -> Self {
        Quantity(self.0 * other.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_portions_floors() {
        let stock = Quantity::new(25, 1); // 2.5 kg
        let per_burger = Quantity::new(150, 3); // 0.150 kg
        assert_eq!(stock.whole_portions(per_burger), Some(Quantity::from_int(16)));
    }

    #[test]
    fn test_whole_portions_of_negative_stock() {
        let stock = Quantity::from_int(-1);
        assert_eq!(
            stock.whole_portions(Quantity::from_int(3)),
            Some(Quantity::from_int(-1))
        );
        assert!(stock.max_zero().is_zero());
    }

    #[test]
    fn test_rejects_non_positive_portion() {
        let stock = Quantity::from_int(10);
        assert_eq!(stock.whole_portions(Quantity::from_int(-2)), None);
    }

    #[test]
    fn test_display_normalises() {
        assert_eq!(Quantity::new(250, 2).to_string(), "2.5");
        assert_eq!(Quantity::from_int(4).to_string(), "4");
    }

    #[test]
    fn test_serde_as_json_number() {
        let json = serde_json::to_string(&Quantity::new(15, 1)).unwrap();
        assert_eq!(json, "1.5");

        let parsed: Quantity = serde_json::from_str("0.25").unwrap();
        assert_eq!(parsed, Quantity::new(25, 2));
    }
}

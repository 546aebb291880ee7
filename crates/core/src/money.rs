//! Monetary amounts (tenge, two decimal places).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A monetary amount in KZT.
///
/// `Money` itself does not forbid negative values: requests such as
/// `deposit(-50)` must be representable so the ledger can reject them.
/// The non-negativity invariant belongs to the ledgers holding a balance.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Whole tenge.
    pub fn from_major(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// `self * factor`, rounded to whole tiyn (2 decimal places).
    pub fn checked_scale(self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(|v| Money(v.round_dp(2)))
    }
}

impl ValueObject for Money {}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2} KZT", self.0.round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_uses_two_decimal_places() {
        assert_eq!(Money::from_major(1500).to_string(), "1500.00 KZT");
        assert_eq!(Money::new(Decimal::new(12346, 3)).to_string(), "12.35 KZT");
    }

    #[test]
    fn zero_is_neither_negative_nor_positive() {
        let zero = Money::zero();
        assert!(!zero.is_negative());
        assert!(!zero.is_positive());
        assert!(Money::from_major(-1).is_negative());
    }

    #[test]
    fn scale_rounds_to_tiyn() {
        let interest = Money::from_major(10_000)
            .checked_scale(Decimal::new(5, 2))
            .unwrap();
        assert_eq!(interest, Money::from_major(500));

        let odd = Money::new(Decimal::new(333, 2))
            .checked_scale(Decimal::new(1, 1))
            .unwrap();
        assert_eq!(odd.amount(), Decimal::new(33, 2));
    }

    proptest! {
        #[test]
        fn add_then_sub_is_identity(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
            let x = Money::from_major(a);
            let y = Money::from_major(b);
            prop_assert_eq!(x.checked_add(y).and_then(|s| s.checked_sub(y)), Some(x));
        }
    }
}

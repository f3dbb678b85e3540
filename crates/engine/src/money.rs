use std::ops::{Add, AddAssign, Sub};

/// Signed money amount represented as **integer paise**.
///
/// Use this type for **all** monetary values in the engine (prices, payments,
/// running balances) to avoid floating-point drift.
///
/// The value is signed:
/// - positive = amount owed to us / increase
/// - negative = amount owed by us / decrease
///
/// # Examples
///
/// ```rust
/// use engine::MoneyPaise;
///
/// let amount = MoneyPaise::new(12_34);
/// assert_eq!(amount.paise(), 1234);
/// assert!(!amount.is_negative());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyPaise(i64);

impl MoneyPaise {
    pub const ZERO: MoneyPaise = MoneyPaise(0);

    /// Creates a new amount from integer paise.
    #[must_use]
    pub const fn new(paise: i64) -> Self {
        Self(paise)
    }

    /// Returns the raw value in paise.
    #[must_use]
    pub const fn paise(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for MoneyPaise {
    type Output = MoneyPaise;

    fn add(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyPaise {
    fn add_assign(&mut self, rhs: MoneyPaise) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyPaise {
    type Output = MoneyPaise;

    fn sub(self, rhs: MoneyPaise) -> Self::Output {
        MoneyPaise(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_follows_the_sign() {
        let mut balance = MoneyPaise::ZERO;
        balance += MoneyPaise::new(50_000) - MoneyPaise::new(30_000);
        assert_eq!(balance, MoneyPaise::new(20_000));

        let overpaid = MoneyPaise::new(10_000) - MoneyPaise::new(15_000);
        assert_eq!(overpaid, MoneyPaise::new(-5_000));
        assert!(overpaid.is_negative());
        assert!(!MoneyPaise::ZERO.is_negative());
    }

    #[test]
    fn add_is_sub_inverse() {
        let amount = MoneyPaise::new(12_34);
        assert_eq!(amount + MoneyPaise::new(66) - MoneyPaise::new(66), amount);
        assert_eq!(amount.paise(), 1234);
    }
}

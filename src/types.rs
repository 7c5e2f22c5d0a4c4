use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::iter;
use std::ops;

pub use rust_decimal::prelude::Zero;

/// An amount of money in the caller's currency.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Money(Decimal);

/// A nominal annual interest rate, in percent.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct AnnualRate(Decimal);

impl Money {
    const SETTLEMENT_SCALE: u32 = 2;
    /// Largest accepted input amount. Keeps every sum the simulation forms
    /// far below `Decimal`'s range.
    const LIMIT_UNITS: i64 = 1_000_000_000_000;

    pub fn from_decimal(value: Decimal) -> Money {
        Money(value)
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn from_units(value: i64) -> Money {
        Money(Decimal::new(value, 0))
    }

    pub fn from_cents(value: i64) -> Money {
        Money(Decimal::new(value, Self::SETTLEMENT_SCALE))
    }

    /// Returns `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Money> {
        if value.is_finite() {
            Decimal::from_f64(value).map(Money)
        } else {
            None
        }
    }

    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn limit() -> Money {
        Money::from_units(Self::LIMIT_UNITS)
    }

    pub fn is_within_limit(self) -> bool {
        self <= Money::limit()
    }

    /// One currency unit, the smallest forward progress a payment must make.
    pub fn one_unit() -> Money {
        Money::from_units(1)
    }

    /// Balances below this are treated as paid off.
    pub fn settlement_threshold() -> Money {
        Money::from_cents(1)
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Snaps floating residue below one cent to exactly zero.
    pub fn settle(self) -> Money {
        if self < Money::settlement_threshold() {
            Money::zero()
        } else {
            self
        }
    }

    pub fn round_dp(self, decimal_digits: u32) -> Money {
        Money(self.0.round_dp(decimal_digits))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ops::Add for Money {
    type Output = Money;
    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl ops::Sub for Money {
    type Output = Money;
    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl ops::SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl ops::Neg for Money {
    type Output = Money;
    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Zero for Money {
    fn zero() -> Money {
        Money(Decimal::zero())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |total, amount| total + amount)
    }
}

impl<'a> iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl AnnualRate {
    const MONTHS_PER_YEAR_TIMES_PERCENT: i64 = 1200;
    const LIMIT_PERCENT: i64 = 1_000;
    /// Interest is kept at a fixed scale so that sums of it are exact.
    const INTEREST_SCALE: u32 = 10;

    pub fn from_decimal(percent: Decimal) -> AnnualRate {
        AnnualRate(percent)
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn from_percent(percent: i64) -> AnnualRate {
        AnnualRate(Decimal::new(percent, 0))
    }

    /// Returns `None` for NaN and infinities.
    pub fn from_f64(percent: f64) -> Option<AnnualRate> {
        if percent.is_finite() {
            Decimal::from_f64(percent).map(AnnualRate)
        } else {
            None
        }
    }

    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn limit() -> AnnualRate {
        AnnualRate::from_percent(Self::LIMIT_PERCENT)
    }

    pub fn is_within_limit(self) -> bool {
        self <= AnnualRate::limit()
    }

    pub fn monthly_rate(self) -> Decimal {
        self.0 / Decimal::new(Self::MONTHS_PER_YEAR_TIMES_PERCENT, 0)
    }

    /// Interest accrued on `balance` over one month.
    pub fn monthly_interest(self, balance: Money) -> Money {
        Money((balance.0 * self.monthly_rate()).round_dp(Self::INTEREST_SCALE))
    }
}

impl fmt::Display for AnnualRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_settle() {
        assert_eq!(Money::from_decimal(Decimal::new(99, 4)).settle(), Money::zero());
        assert_eq!(Money::from_cents(-3).settle(), Money::zero());
        assert_eq!(Money::from_cents(1).settle(), Money::from_cents(1));
        assert_eq!(Money::from_units(12).settle(), Money::from_units(12));
    }

    #[test]
    fn test_money_from_f64() {
        assert_eq!(Money::from_f64(12.5), Some(Money::from_cents(1250)));
        assert_eq!(Money::from_f64(std::f64::NAN), None);
        assert_eq!(Money::from_f64(std::f64::INFINITY), None);
    }

    #[test]
    fn test_money_sign() {
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::zero().is_negative());
        assert!(!(-Money::zero()).is_negative());
        assert!(Money::from_cents(1).is_positive());
        assert!(!Money::zero().is_positive());
    }

    #[test]
    fn test_money_sum() {
        let amounts = vec![Money::from_cents(150), Money::from_units(2), Money::from_cents(-50)];
        assert_eq!(amounts.iter().sum::<Money>(), Money::from_units(3));
    }

    #[test]
    fn test_annual_rate_monthly_interest() {
        assert_eq!(
            AnnualRate::from_percent(18).monthly_interest(Money::from_units(5000)),
            Money::from_units(75)
        );
        assert_eq!(
            AnnualRate::from_percent(0).monthly_interest(Money::from_units(5000)),
            Money::zero()
        );
    }

    #[test]
    fn test_monthly_interest_has_fixed_scale() {
        let interest = AnnualRate::from_decimal(Decimal::new(43, 2))
            .monthly_interest(Money::from_cents(165_194));
        assert!(interest.to_decimal().scale() <= 10);
        assert_eq!(interest, Money::from_decimal(Decimal::new(5_919_451_667, 10)));
    }

    #[test]
    fn test_limits() {
        assert!(Money::limit().is_within_limit());
        assert!(!(Money::limit() + Money::from_cents(1)).is_within_limit());
        assert!(AnnualRate::from_percent(1_000).is_within_limit());
        assert!(!AnnualRate::from_percent(1_001).is_within_limit());
    }

    #[test]
    fn test_annual_rate_display() {
        assert_eq!(AnnualRate::from_decimal(Decimal::new(1999, 2)).to_string(), "19.99%");
        assert_eq!(AnnualRate::from_decimal(Decimal::new(1800, 2)).to_string(), "18%");
    }
}

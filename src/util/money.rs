use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// VAT rate applied once to a quote subtotal, in whole percent.
pub const VAT_RATE_PERCENT: i64 = 18;

/// A monetary amount in minor currency units (agorot, 1/100 of a shekel).
///
/// Every stored and wire-level amount uses this representation. Major units
/// exist only at the UI-facing DTO edge and are converted exactly once via
/// [`Money::from_major`] / [`Money::to_major`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Converts a major-unit amount to minor units, rounding to the nearest
    /// agora. Applied identically on create and update so repeated edits of
    /// the same price never drift.
    pub fn from_major(major: f64) -> Self {
        Money((major * 100.0).round() as i64)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn to_major(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Line total: unit price times quantity.
    pub const fn times(self, quantity: u32) -> Money {
        Money(self.0 * quantity as i64)
    }

    /// Whole-percent share of this amount, rounded half-up. Amounts here are
    /// never negative once validated at the service edge.
    pub const fn percent(self, rate: i64) -> Money {
        Money((self.0 * rate + 50) / 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, (self.0 % 100).abs())
    }
}

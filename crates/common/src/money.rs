//! Money amounts in pence.

use serde::{Deserialize, Serialize};

/// Money amount represented in pence to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    /// Amount in pence (e.g., 300 = £3.00)
    pence: i64,
}

impl Money {
    /// Creates a new Money amount from pence.
    pub const fn from_pence(pence: i64) -> Self {
        Self { pence }
    }

    /// Creates a new Money amount from a whole-pound value.
    pub const fn from_pounds(pounds: i64) -> Self {
        Self {
            pence: pounds * 100,
        }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { pence: 0 }
    }

    /// Returns the amount in pence.
    pub fn pence(&self) -> i64 {
        self.pence
    }

    /// Returns the pound portion (whole number).
    pub fn pounds(&self) -> i64 {
        self.pence / 100
    }

    /// Returns the pence portion (remainder after pounds).
    pub fn pence_part(&self) -> i64 {
        self.pence.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.pence == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.pence < 0
    }

    /// Multiplies by a quantity.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            pence: self.pence * quantity as i64,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.pence < 0 {
            write!(f, "-£{}.{:02}", self.pounds().abs(), self.pence_part())
        } else {
            write!(f, "£{}.{:02}", self.pounds(), self.pence_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            pence: self.pence + rhs.pence,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            pence: self.pence - rhs.pence,
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.pence += rhs.pence;
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.pence -= rhs.pence;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

//! `Date` and `Period`.
//!
//! A `Date` is a point in time measured in years relative to an arbitrary
//! origin; a `Period` is a signed length of time in years.  Both are thin
//! newtypes over `f64` with a total order (the library never constructs
//! NaN dates).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use dcf_core::Real;

/// Average number of days in a year.
pub const DAYS_IN_YEAR: Real = 365.25;

/// Default small time step (one day) used for short-rate and derivative
/// approximations.
pub const TIME_SHIFT: Period = Period(1.0 / DAYS_IN_YEAR);

/// A point in time, measured in years relative to an arbitrary origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Date(Real);

impl Date {
    /// A date at the given year-fraction coordinate.
    pub const fn new(years: Real) -> Self {
        Date(years)
    }

    /// The year-fraction coordinate of this date.
    pub const fn as_years(self) -> Real {
        self.0
    }

    /// Number of days from `self` to `other` (negative if `other` is
    /// earlier).
    pub fn diff_in_days(self, other: Date) -> Real {
        (other.0 - self.0) * DAYS_IN_YEAR
    }

    /// The earlier of two dates.
    pub fn min(self, other: Date) -> Date {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// The later of two dates.
    pub fn max(self, other: Date) -> Date {
        if self >= other {
            self
        } else {
            other
        }
    }
}

impl Eq for Date {}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Real> for Date {
    fn from(years: Real) -> Self {
        Date(years)
    }
}

impl Add<Period> for Date {
    type Output = Date;

    fn add(self, rhs: Period) -> Date {
        Date(self.0 + rhs.0)
    }
}

impl AddAssign<Period> for Date {
    fn add_assign(&mut self, rhs: Period) {
        self.0 += rhs.0;
    }
}

impl Sub<Period> for Date {
    type Output = Date;

    fn sub(self, rhs: Period) -> Date {
        Date(self.0 - rhs.0)
    }
}

impl SubAssign<Period> for Date {
    fn sub_assign(&mut self, rhs: Period) {
        self.0 -= rhs.0;
    }
}

impl Sub<Date> for Date {
    type Output = Period;

    fn sub(self, rhs: Date) -> Period {
        Period(self.0 - rhs.0)
    }
}

/// A signed length of time, measured in years.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Period(Real);

impl Period {
    /// A period of `n` days.
    pub fn days(n: Real) -> Self {
        Period(n / DAYS_IN_YEAR)
    }

    /// A period of `n` months (one twelfth of a year each).
    pub fn months(n: Real) -> Self {
        Period(n / 12.0)
    }

    /// A period of `n` years.
    pub const fn years(n: Real) -> Self {
        Period(n)
    }

    /// Length of the period in years.
    pub const fn as_years(self) -> Real {
        self.0
    }

    /// Length of the period in days.
    pub fn as_days(self) -> Real {
        self.0 * DAYS_IN_YEAR
    }

    /// Whether the period has zero (or negative) length.
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl Eq for Period {}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Y", self.0)
    }
}

impl Add for Period {
    type Output = Period;

    fn add(self, rhs: Period) -> Period {
        Period(self.0 + rhs.0)
    }
}

impl Sub for Period {
    type Output = Period;

    fn sub(self, rhs: Period) -> Period {
        Period(self.0 - rhs.0)
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Period {
        Period(-self.0)
    }
}

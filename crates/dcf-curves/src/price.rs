//! Asset price value object.

use std::fmt;

use dcf_core::Real;
use dcf_time::Date;

/// An asset price observed at a date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price {
    value: Real,
    origin: Date,
}

impl Price {
    /// A price `value` observed at `origin`.
    pub fn new(value: Real, origin: Date) -> Self {
        Self { value, origin }
    }

    /// The price value.
    pub fn value(&self) -> Real {
        self.value
    }

    /// The observation date.
    pub fn origin(&self) -> Date {
        self.origin
    }
}

impl From<Price> for Real {
    fn from(p: Price) -> Real {
        p.value
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}; origin={}", self.value, self.origin)
    }
}

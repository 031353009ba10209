//! Compounding conventions: rate ↔ factor conversions.
//!
//! Pure functions over `(rate, year_fraction)`.  Each compounding function
//! returns the price at period start of one unit paid at period end; each
//! `*_rate` function is its inverse.

use crate::{Rate, Real, Time};

/// Simple compounding factor `1 / (1 + r·τ)`.
#[inline]
pub fn simple_compounding(rate: Rate, tau: Time) -> Real {
    1.0 / (1.0 + rate * tau)
}

/// Inverse of [`simple_compounding`]: `(1/df − 1) / τ`.
#[inline]
pub fn simple_rate(df: Real, tau: Time) -> Rate {
    (1.0 / df - 1.0) / tau
}

/// Continuous compounding factor `exp(−r·τ)`.
#[inline]
pub fn continuous_compounding(rate: Rate, tau: Time) -> Real {
    (-rate * tau).exp()
}

/// Inverse of [`continuous_compounding`]: `−ln(df) / τ`.
#[inline]
pub fn continuous_rate(df: Real, tau: Time) -> Rate {
    -df.ln() / tau
}

/// Periodic compounding factor `(1 + r/m)^(−m·τ)` for `m` periods per year.
#[inline]
pub fn periodic_compounding(rate: Rate, tau: Time, frequency: Real) -> Real {
    (1.0 + rate / frequency).powf(-frequency * tau)
}

/// Inverse of [`periodic_compounding`]:
/// `(df^(−1/(τ·m)) − 1) · m`.
#[inline]
pub fn periodic_rate(df: Real, tau: Time, frequency: Real) -> Rate {
    (df.powf(-1.0 / (tau * frequency)) - 1.0) * frequency
}

/// Annual compounding, `m = 1`.
#[inline]
pub fn annually_compounding(rate: Rate, tau: Time) -> Real {
    periodic_compounding(rate, tau, 1.0)
}

/// Semi-annual compounding, `m = 2`.
#[inline]
pub fn semi_compounding(rate: Rate, tau: Time) -> Real {
    periodic_compounding(rate, tau, 2.0)
}

/// Quarterly compounding, `m = 4`.
#[inline]
pub fn quarterly_compounding(rate: Rate, tau: Time) -> Real {
    periodic_compounding(rate, tau, 4.0)
}

/// Monthly compounding, `m = 12`.
#[inline]
pub fn monthly_compounding(rate: Rate, tau: Time) -> Real {
    periodic_compounding(rate, tau, 12.0)
}

/// Daily compounding, `m = 365`.
#[inline]
pub fn daily_compounding(rate: Rate, tau: Time) -> Real {
    periodic_compounding(rate, tau, 365.0)
}

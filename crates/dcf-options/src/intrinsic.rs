//! Intrinsic (zero-volatility) option values.

use dcf_core::{Real, Time};

use crate::formula::OptionPricingFormula;

/// Intrinsic option values: `call = max(F − K, 0)`.
///
/// All Greeks vanish (delta is a step function).
#[derive(Debug, Clone, Copy, Default)]
pub struct Intrinsic;

impl OptionPricingFormula for Intrinsic {
    fn call_price(&self, _tau: Time, strike: Real, forward: Real, _vol: Real) -> Real {
        (forward - strike).max(0.0)
    }

    fn call_delta(&self, _tau: Time, strike: Real, forward: Real, _vol: Real) -> Option<Real> {
        Some(if forward < strike { 0.0 } else { 1.0 })
    }

    fn call_gamma(&self, _tau: Time, _strike: Real, _forward: Real, _vol: Real) -> Option<Real> {
        Some(0.0)
    }

    fn call_vega(&self, _tau: Time, _strike: Real, _forward: Real, _vol: Real) -> Option<Real> {
        Some(0.0)
    }

    fn call_theta(&self, _tau: Time, _strike: Real, _forward: Real, _vol: Real) -> Option<Real> {
        Some(0.0)
    }

    fn binary_call(&self, _tau: Time, strike: Real, forward: Real, _vol: Real) -> Option<Real> {
        Some(if forward <= strike { 0.0 } else { 1.0 })
    }

    fn name(&self) -> &'static str {
        "Intrinsic"
    }
}

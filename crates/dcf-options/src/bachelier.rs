//! Bachelier (normal) option pricing.

use dcf_core::{Real, Time};
use dcf_math::distributions::{normal_cdf, normal_pdf};

use crate::formula::OptionPricingFormula;

/// The Bachelier formula for a normally distributed underlying.
///
/// With `v = σ√τ` and `d = (F − K)/v`:
///
/// * call price: `(F − K)·Φ(d) + v·φ(d)`
/// * call delta: `Φ(d)`
/// * call gamma: `φ(d)/v`
/// * call vega:  `√τ·φ(d)`
/// * binary call: `Φ(d)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Bachelier;

fn d(tau: Time, strike: Real, forward: Real, volatility: Real) -> (Real, Real) {
    let v = volatility * tau.sqrt();
    ((forward - strike) / v, v)
}

impl OptionPricingFormula for Bachelier {
    fn call_price(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Real {
        let (d, v) = d(tau, strike, forward, vol);
        (forward - strike) * normal_cdf(d) + v * normal_pdf(d)
    }

    fn call_delta(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, _) = d(tau, strike, forward, vol);
        Some(normal_cdf(d))
    }

    fn call_gamma(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, v) = d(tau, strike, forward, vol);
        Some(normal_pdf(d) / v)
    }

    fn call_vega(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, _) = d(tau, strike, forward, vol);
        Some(tau.sqrt() * normal_pdf(d))
    }

    fn binary_call(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, _) = d(tau, strike, forward, vol);
        Some(normal_cdf(d))
    }

    fn name(&self) -> &'static str {
        "Bachelier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn at_the_money_value() {
        // ATM Bachelier call = σ√τ/√(2π)
        let call = Bachelier.call_price(1.0, 100.0, 100.0, 10.0);
        assert_abs_diff_eq!(
            call,
            10.0 / (2.0 * std::f64::consts::PI).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn deep_in_the_money_approaches_intrinsic() {
        let call = Bachelier.call_price(0.25, 50.0, 100.0, 1.0);
        assert_abs_diff_eq!(call, 50.0, epsilon = 1e-8);
    }

    #[test]
    fn delta_matches_finite_difference() {
        let (tau, k, f, v) = (0.5, 100.0, 102.0, 8.0);
        let h = 1e-5;
        let fd = (Bachelier.call_price(tau, k, f + h, v)
            - Bachelier.call_price(tau, k, f - h, v))
            / (2.0 * h);
        assert_abs_diff_eq!(
            Bachelier.call_delta(tau, k, f, v).unwrap(),
            fd,
            epsilon = 1e-8
        );
    }

    #[test]
    fn vega_matches_finite_difference() {
        let (tau, k, f, v) = (0.5, 100.0, 98.0, 8.0);
        let h = 1e-5;
        let fd = (Bachelier.call_price(tau, k, f, v + h)
            - Bachelier.call_price(tau, k, f, v - h))
            / (2.0 * h);
        assert_abs_diff_eq!(
            Bachelier.call_vega(tau, k, f, v).unwrap(),
            fd,
            epsilon = 1e-8
        );
    }
}

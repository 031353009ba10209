//! Black-76 (log-normal) option pricing, plain and displaced.

use dcf_core::{Real, Time};
use dcf_math::distributions::{normal_cdf, normal_pdf};

use crate::formula::OptionPricingFormula;

/// The Black-76 formula for a log-normally distributed underlying.
///
/// With `v = σ√τ` and `d = (ln(F/K) + v²/2)/v`:
///
/// * call price: `F·Φ(d) − K·Φ(d − v)`
/// * call delta: `Φ(d)`
/// * call vega:  `F·√τ·φ(d − v)`
/// * binary call: `Φ(d)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Black76;

fn d(tau: Time, strike: Real, forward: Real, volatility: Real) -> (Real, Real) {
    let v = volatility * tau.sqrt();
    (((forward / strike).ln() + v * v / 2.0) / v, v)
}

impl OptionPricingFormula for Black76 {
    fn call_price(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Real {
        let (d, v) = d(tau, strike, forward, vol);
        forward * normal_cdf(d) - strike * normal_cdf(d - v)
    }

    fn call_delta(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, _) = d(tau, strike, forward, vol);
        Some(normal_cdf(d))
    }

    fn call_vega(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, v) = d(tau, strike, forward, vol);
        Some(forward * tau.sqrt() * normal_pdf(d - v))
    }

    fn binary_call(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        let (d, _) = d(tau, strike, forward, vol);
        Some(normal_cdf(d))
    }

    fn name(&self) -> &'static str {
        "Black76"
    }
}

/// Black-76 applied to the displaced pair `(F + α, K + α)`.
///
/// The displacement `α` accommodates moderately negative forwards, as
/// seen for interest rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplacedBlack76 {
    /// The displacement `α`.
    pub displacement: Real,
}

impl DisplacedBlack76 {
    /// A displaced formula with displacement `α`.
    pub fn new(displacement: Real) -> Self {
        Self { displacement }
    }
}

impl OptionPricingFormula for DisplacedBlack76 {
    fn call_price(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Real {
        Black76.call_price(tau, strike + self.displacement, forward + self.displacement, vol)
    }

    fn call_delta(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        Black76.call_delta(tau, strike + self.displacement, forward + self.displacement, vol)
    }

    fn call_vega(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        Black76.call_vega(tau, strike + self.displacement, forward + self.displacement, vol)
    }

    fn binary_call(&self, tau: Time, strike: Real, forward: Real, vol: Real) -> Option<Real> {
        Black76.binary_call(tau, strike + self.displacement, forward + self.displacement, vol)
    }

    fn name(&self) -> &'static str {
        "DisplacedBlack76"
    }
}

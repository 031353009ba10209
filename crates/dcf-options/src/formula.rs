//! The option pricing formula interface.

use dcf_core::{Real, Time};

/// A closed-form option pricing formula over `(τ, K, F, σ)`.
///
/// Only the call price is required; every other method returns `None` by
/// default, in which case callers fall back to finite differences (for
/// Greeks) or a call spread (for binaries).  Put prices are never part of
/// the interface: consumers derive them by put-call parity.
///
/// Callers guarantee `τ > 0` and `σ > 0`; degenerate inputs are resolved
/// to intrinsic values before a formula is consulted.
pub trait OptionPricingFormula: std::fmt::Debug + Send + Sync {
    /// Expected payoff of a European call, `E[max(F(T) − K, 0)]`.
    fn call_price(&self, tau: Time, strike: Real, forward: Real, volatility: Real)
        -> Real;

    /// Analytic call delta `∂C/∂F`, if the formula has one.
    fn call_delta(
        &self,
        _tau: Time,
        _strike: Real,
        _forward: Real,
        _volatility: Real,
    ) -> Option<Real> {
        None
    }

    /// Analytic call gamma `∂²C/∂F²`, if the formula has one.
    fn call_gamma(
        &self,
        _tau: Time,
        _strike: Real,
        _forward: Real,
        _volatility: Real,
    ) -> Option<Real> {
        None
    }

    /// Analytic call vega `∂C/∂σ`, if the formula has one.
    fn call_vega(
        &self,
        _tau: Time,
        _strike: Real,
        _forward: Real,
        _volatility: Real,
    ) -> Option<Real> {
        None
    }

    /// Analytic call theta `∂C/∂τ`, if the formula has one.
    fn call_theta(
        &self,
        _tau: Time,
        _strike: Real,
        _forward: Real,
        _volatility: Real,
    ) -> Option<Real> {
        None
    }

    /// Analytic binary (cash-or-nothing) call, if the formula has one.
    fn binary_call(
        &self,
        _tau: Time,
        _strike: Real,
        _forward: Real,
        _volatility: Real,
    ) -> Option<Real> {
        None
    }

    /// The formula's display name.
    fn name(&self) -> &'static str;
}

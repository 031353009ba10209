//! The option valuation context.
//!
//! An [`OptionPricingCurve`] binds an [`OptionPricingFormula`] to a
//! forward source and an optional volatility source, and answers call,
//! put, binary, and Greek queries for expiry dates.  Puts always come
//! from put-call parity; Greeks use the analytic formula when available
//! and finite differences otherwise.

use std::sync::Arc;

use dcf_core::{errors::Result, Real, Time};
use dcf_curves::{source_id, Details, ForwardSource, VolatilitySource};
use dcf_time::{default_day_count, Date, DayCount, DAYS_IN_YEAR};

use crate::black76::{Black76, DisplacedBlack76};
use crate::bachelier::Bachelier;
use crate::formula::OptionPricingFormula;
use crate::intrinsic::Intrinsic;

/// Finite difference used for numerical delta and gamma.
pub const DELTA_SHIFT: Real = 1e-4;
/// Scale of delta sensitivities (per basis point).
pub const DELTA_SCALE: Real = 1e-4;
/// Finite difference used for numerical vega.
pub const VEGA_SHIFT: Real = 1e-2;
/// Scale of vega sensitivities.
pub const VEGA_SCALE: Real = 1e-2;
/// Finite difference used for numerical theta (one day).
pub const THETA_SHIFT: Real = 1.0 / DAYS_IN_YEAR;
/// Scale of theta sensitivities (per day).
pub const THETA_SCALE: Real = 1.0 / DAYS_IN_YEAR;
/// Default call-spread width used to derive binary payoffs numerically.
pub const STRIKE_SHIFT: Real = 1e-4;

/// An option pricing formula bound to its market inputs.
#[derive(Debug, Clone)]
pub struct OptionPricingCurve {
    forward: Arc<dyn ForwardSource>,
    volatility: Option<Arc<dyn VolatilitySource>>,
    formula: Arc<dyn OptionPricingFormula>,
    day_count: Arc<dyn DayCount>,
    origin: Date,
    bump_greeks: bool,
    strike_shift: Real,
}

impl OptionPricingCurve {
    /// Bind a formula to a forward source; valuation happens at `origin`.
    pub fn new(
        forward: Arc<dyn ForwardSource>,
        formula: Arc<dyn OptionPricingFormula>,
        origin: Date,
    ) -> Self {
        Self {
            forward,
            volatility: None,
            formula,
            day_count: default_day_count(),
            origin,
            bump_greeks: false,
            strike_shift: STRIKE_SHIFT,
        }
    }

    /// An intrinsic-value context (no volatility input).
    pub fn intrinsic(forward: Arc<dyn ForwardSource>, origin: Date) -> Self {
        Self::new(forward, Arc::new(Intrinsic), origin)
    }

    /// A Bachelier (normal) context.
    pub fn bachelier(
        forward: Arc<dyn ForwardSource>,
        volatility: Arc<dyn VolatilitySource>,
        origin: Date,
    ) -> Self {
        Self::new(forward, Arc::new(Bachelier), origin).with_volatility(volatility)
    }

    /// A Black-76 (log-normal) context.
    pub fn black76(
        forward: Arc<dyn ForwardSource>,
        volatility: Arc<dyn VolatilitySource>,
        origin: Date,
    ) -> Self {
        Self::new(forward, Arc::new(Black76), origin).with_volatility(volatility)
    }

    /// A displaced Black-76 context.
    pub fn displaced_black76(
        forward: Arc<dyn ForwardSource>,
        volatility: Arc<dyn VolatilitySource>,
        displacement: Real,
        origin: Date,
    ) -> Self {
        Self::new(forward, Arc::new(DisplacedBlack76::new(displacement)), origin)
            .with_volatility(volatility)
    }

    /// Set the volatility source.
    pub fn with_volatility(mut self, volatility: Arc<dyn VolatilitySource>) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Set the day count used for time to expiry.
    pub fn with_day_count(mut self, day_count: Arc<dyn DayCount>) -> Self {
        self.day_count = day_count;
        self
    }

    /// Force numerical Greeks even when analytic ones exist.
    pub fn with_bump_greeks(mut self, bump_greeks: bool) -> Self {
        self.bump_greeks = bump_greeks;
        self
    }

    /// Set the call-spread width for numerical binaries.
    pub fn with_strike_shift(mut self, strike_shift: Real) -> Self {
        self.strike_shift = strike_shift;
        self
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.origin
    }

    /// The forward value for `date`.
    pub fn forward(&self, date: Date) -> Result<Real> {
        self.forward.forward_value(date)
    }

    /// Time to expiry, strike (at-the-money when `None`), forward, and
    /// volatility for an expiry date.
    fn tsfv(&self, expiry: Date, strike: Option<Real>) -> Result<(Time, Real, Real, Real)> {
        let forward = self.forward.forward_value(expiry)?;
        let strike = strike.unwrap_or(forward);
        let volatility = match &self.volatility {
            Some(v) => v.terminal_vol(expiry)?,
            None => 0.0,
        };
        let tau = self.day_count.year_fraction(self.origin, expiry);
        Ok((tau, strike, forward, volatility))
    }

    // ── Prices ───────────────────────────────────────────────────────────

    /// Expected call payoff `E[max(F(T) − K, 0)]`.
    ///
    /// Zero volatility or zero time to expiry degrade to the intrinsic
    /// value.
    pub fn call(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok((f - k).max(0.0));
        }
        Ok(self.formula.call_price(tau, k, f, v))
    }

    /// Expected put payoff, by put-call parity `P = K − F + C`.
    pub fn put(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok((k - f).max(0.0));
        }
        Ok(k - f + self.formula.call_price(tau, k, f, v))
    }

    /// Expected binary (cash-or-nothing) call payoff.
    ///
    /// Falls back to a centred call spread of width `strike_shift` when
    /// the formula has no analytic binary.
    pub fn binary_call(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok(if f <= k { 0.0 } else { 1.0 });
        }
        if let Some(binary) = self.formula.binary_call(tau, k, f, v) {
            return Ok(binary);
        }
        let shift = self.strike_shift;
        let low = self.formula.call_price(tau, k - shift / 2.0, f, v);
        let high = self.formula.call_price(tau, k + shift / 2.0, f, v);
        Ok((low - high) / shift)
    }

    /// Expected binary put payoff, `1 − binary_call`.
    pub fn binary_put(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        Ok(1.0 - self.binary_call(expiry, strike)?)
    }

    // ── Greeks ───────────────────────────────────────────────────────────

    /// Call delta, scaled by [`DELTA_SCALE`] (per basis point).
    pub fn call_delta(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            // cadlag step at the strike
            return Ok(if f < k { 0.0 } else { DELTA_SCALE });
        }
        if !self.bump_greeks {
            if let Some(delta) = self.formula.call_delta(tau, k, f, v) {
                return Ok(delta * DELTA_SCALE);
            }
        }
        let up = self.formula.call_price(tau, k, f + DELTA_SHIFT, v);
        let base = self.formula.call_price(tau, k, f, v);
        Ok((up - base) / DELTA_SHIFT * DELTA_SCALE)
    }

    /// Put delta, by parity `Δ_P = Δ_C − 1` (scaled).
    pub fn put_delta(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        Ok(self.call_delta(expiry, strike)? - DELTA_SCALE)
    }

    /// Call gamma, scaled by [`DELTA_SCALE`]².
    pub fn call_gamma(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok(0.0);
        }
        if !self.bump_greeks {
            if let Some(gamma) = self.formula.call_gamma(tau, k, f, v) {
                return Ok(gamma * DELTA_SCALE * DELTA_SCALE);
            }
        }
        let up = self.formula.call_price(tau, k, f + DELTA_SHIFT, v);
        let base = self.formula.call_price(tau, k, f, v);
        let down = self.formula.call_price(tau, k, f - DELTA_SHIFT, v);
        Ok((up - 2.0 * base + down) * (DELTA_SCALE / DELTA_SHIFT).powi(2))
    }

    /// Put gamma equals call gamma.
    pub fn put_gamma(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        self.call_gamma(expiry, strike)
    }

    /// Call vega, scaled by [`VEGA_SCALE`].
    pub fn call_vega(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok(0.0);
        }
        if !self.bump_greeks {
            if let Some(vega) = self.formula.call_vega(tau, k, f, v) {
                return Ok(vega * VEGA_SCALE);
            }
        }
        let up = self.formula.call_price(tau, k, f, v + VEGA_SHIFT);
        let base = self.formula.call_price(tau, k, f, v);
        Ok((up - base) / VEGA_SHIFT * VEGA_SCALE)
    }

    /// Put vega equals call vega.
    pub fn put_vega(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        self.call_vega(expiry, strike)
    }

    /// Call theta, scaled by [`THETA_SCALE`] (per day).
    pub fn call_theta(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        if v <= 0.0 || tau <= 0.0 {
            return Ok(0.0);
        }
        if !self.bump_greeks {
            if let Some(theta) = self.formula.call_theta(tau, k, f, v) {
                return Ok(theta * THETA_SCALE);
            }
        }
        let up = self.formula.call_price(tau + THETA_SHIFT, k, f, v);
        let base = self.formula.call_price(tau, k, f, v);
        Ok((up - base) / THETA_SHIFT * THETA_SCALE)
    }

    /// Put theta equals call theta.
    pub fn put_theta(&self, expiry: Date, strike: Option<Real>) -> Result<Real> {
        self.call_theta(expiry, strike)
    }

    // ── Reporting ────────────────────────────────────────────────────────

    /// Model parameter details for an expiry (and optional strike).
    pub fn details(&self, expiry: Date, strike: Option<Real>) -> Result<Details> {
        let (tau, k, f, v) = self.tsfv(expiry, strike)?;
        let mut details = Details::new();
        details.set("valuation date", self.origin);
        details.set("expiry date", expiry);
        details.set("time to expiry", tau);
        if strike.is_some() {
            details.set("strike", k);
        }
        details.set("forward", f);
        if let Some(tenor) = self.forward.forward_tenor() {
            details.set("tenor", tenor.as_years());
        }
        if self.volatility.is_some() {
            details.set("volatility", v);
        }
        details.set("option model", self.formula.name());
        details.set("forward-curve-id", source_id(&self.forward));
        if let Some(vol) = &self.volatility {
            details.set("volatility-curve-id", source_id(vol));
        }
        details.set("model-id", source_id(&self.formula));
        Ok(details)
    }
}

impl ForwardSource for OptionPricingCurve {
    fn forward_value(&self, date: Date) -> Result<Real> {
        self.forward.forward_value(date)
    }

    fn forward_tenor(&self) -> Option<dcf_time::Period> {
        self.forward.forward_tenor()
    }
}

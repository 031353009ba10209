//! Interest-rate curves.
//!
//! An [`InterestRateCurve`] stores its values in exactly one
//! representation — discount factors, zero rates, short rates, or cash
//! rates — and answers every query method consistently with that storage
//! by internal conversion.

use std::sync::Arc;

use dcf_core::compounding::{
    continuous_compounding, continuous_rate, simple_compounding, simple_rate,
};
use dcf_core::{ensure, errors::Result, Real, Time};
use dcf_math::Scheme;
use dcf_time::{Date, DayCount, Period, TIME_SHIFT};

use crate::date_curve::DateCurve;
use crate::sources::ForwardSource;

/// Storage representation of an [`InterestRateCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateStorage {
    /// `df(origin, d)` — price at origin of 1 unit paid at `d`.
    DiscountFactor,
    /// `z(origin, d)` — continuously compounded yield.
    ZeroRate,
    /// `r(d)` — instantaneous rate.
    ShortRate,
    /// `c(d, d+τ*)` — simple-compounded forward rate over the curve tenor.
    CashRate,
}

impl RateStorage {
    /// The interpolation scheme a curve of this storage defaults to.
    pub fn default_scheme(self) -> Scheme {
        match self {
            RateStorage::DiscountFactor => Scheme::log_linear_rate(),
            RateStorage::ZeroRate => Scheme::linear(),
            RateStorage::ShortRate => Scheme::constant(),
            RateStorage::CashRate => Scheme::linear(),
        }
    }
}

/// Default forward tenor of interest-rate curves (3 months).
fn default_forward_tenor() -> Period {
    Period::months(3.0)
}

/// An interest-rate curve with a fixed storage representation.
#[derive(Debug, Clone)]
pub struct InterestRateCurve {
    curve: DateCurve,
    storage: RateStorage,
    forward_tenor: Period,
}

impl InterestRateCurve {
    /// Build a curve storing `data` under the given representation.
    pub fn new(storage: RateStorage, domain: &[Date], data: &[Real]) -> Result<Self> {
        let curve = DateCurve::new(domain, data, storage.default_scheme())?;
        Ok(Self {
            curve,
            storage,
            forward_tenor: default_forward_tenor(),
        })
    }

    /// A curve storing discount factors `df(origin, d)`.
    pub fn discount_factors(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(RateStorage::DiscountFactor, domain, data)
    }

    /// A curve storing continuously compounded zero rates.
    pub fn zero_rates(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(RateStorage::ZeroRate, domain, data)
    }

    /// A curve storing instantaneous short rates.
    pub fn short_rates(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(RateStorage::ShortRate, domain, data)
    }

    /// A curve storing simple forward rates over `forward_tenor`.
    pub fn cash_rates(
        domain: &[Date],
        data: &[Real],
        forward_tenor: Period,
    ) -> Result<Self> {
        let mut curve = Self::new(RateStorage::CashRate, domain, data)?;
        curve.forward_tenor = forward_tenor;
        Ok(curve)
    }

    /// Rebuild the curve with a different origin.
    pub fn with_origin(mut self, origin: Date) -> Result<Self> {
        self.curve = self.curve.with_origin(origin)?;
        Ok(self)
    }

    /// Rebuild the curve with a different day count.
    pub fn with_day_count(mut self, day_count: Arc<dyn DayCount>) -> Result<Self> {
        self.curve = self.curve.with_day_count(day_count)?;
        Ok(self)
    }

    /// Rebuild the curve with a different interpolation scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Result<Self> {
        self.curve = self.curve.with_scheme(scheme)?;
        Ok(self)
    }

    /// Set the forward tenor.
    pub fn with_forward_tenor(mut self, forward_tenor: Period) -> Self {
        self.forward_tenor = forward_tenor;
        self
    }

    /// Construct a curve of the requested storage from another curve by
    /// sampling its query methods on the (storage-appropriately extended)
    /// grid.
    pub fn from_curve(other: &InterestRateCurve, storage: RateStorage) -> Result<Self> {
        let origin = other.origin();
        let one_day = Period::days(1.0);
        let mut domain: Vec<Date> = other.domain().to_vec();
        match storage {
            RateStorage::DiscountFactor => {
                // extra points pin down the left end and the extrapolation
                domain.push(origin + one_day);
                domain.push(other.curve.last() + one_day);
            }
            RateStorage::CashRate => {
                // back-fill tenor steps for a faithful compounding chain
                let tenor = other.forward_tenor();
                for &d in other.domain() {
                    let mut x = d;
                    while origin < x {
                        domain.push(x);
                        x = x - tenor;
                    }
                }
            }
            _ => {}
        }
        domain.sort();
        domain.dedup();

        let mut data = Vec::with_capacity(domain.len());
        for &d in &domain {
            data.push(match storage {
                RateStorage::DiscountFactor => other.discount_factor(origin, d)?,
                RateStorage::ZeroRate => other.zero_rate(origin, d)?,
                RateStorage::ShortRate => other.short_rate(d)?,
                RateStorage::CashRate => other.cash_rate(d)?,
            });
        }

        let curve = DateCurve::with_parts(
            &domain,
            &data,
            storage.default_scheme(),
            origin,
            other.day_count(),
        )?;
        Ok(Self {
            curve,
            storage,
            forward_tenor: other.forward_tenor,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// The storage representation.
    pub fn storage(&self) -> RateStorage {
        self.storage
    }

    /// The underlying date curve.
    pub fn curve(&self) -> &DateCurve {
        &self.curve
    }

    /// The date grid.
    pub fn domain(&self) -> &[Date] {
        self.curve.domain()
    }

    /// The curve's reference date.
    pub fn origin(&self) -> Date {
        self.curve.origin()
    }

    /// The curve's day count.
    pub fn day_count(&self) -> Arc<dyn DayCount> {
        self.curve.day_count()
    }

    /// The tenor of the curve's forward rates.
    pub fn forward_tenor(&self) -> Period {
        self.forward_tenor
    }

    /// Year fraction between two dates under the curve's day count.
    pub fn year_fraction(&self, start: Date, end: Date) -> Time {
        self.curve.year_fraction(start, end)
    }

    /// The raw stored value at a date (whatever the storage holds).
    pub fn storage_value(&self, d: Date) -> Result<Real> {
        self.curve.value(d)
    }

    // ── Conversion kernels ───────────────────────────────────────────────

    /// Compounding factor over `[start, stop]`, i.e. the discount factor.
    fn compounding_factor(&self, start: Date, stop: Date) -> Result<Real> {
        if start == stop {
            return Ok(1.0);
        }
        if self.storage == RateStorage::DiscountFactor {
            if start == self.origin() {
                return self.curve.value(stop);
            }
            return Ok(self.curve.value(stop)? / self.curve.value(start)?);
        }
        let rate = self.compounding_rate(start, stop)?;
        Ok(continuous_compounding(rate, self.year_fraction(start, stop)))
    }

    /// Continuously compounded rate over `[start, stop]`, i.e. the zero
    /// rate.
    fn compounding_rate(&self, start: Date, stop: Date) -> Result<Real> {
        let origin = self.origin();
        match self.storage {
            RateStorage::DiscountFactor => {
                let (start, stop) = if start == stop {
                    if start == origin {
                        // zero-rate proxy at origin: use the first knot
                        // beyond the origin
                        let next = self
                            .domain()
                            .iter()
                            .copied()
                            .find(|&d| origin < d)
                            .unwrap_or(origin + TIME_SHIFT);
                        (start, next)
                    } else {
                        (start, start + TIME_SHIFT)
                    }
                } else {
                    (start, stop)
                };
                let df = self.compounding_factor(start, stop)?;
                Ok(continuous_rate(df, self.year_fraction(start, stop)))
            }
            RateStorage::ZeroRate => {
                if start == stop && start == origin {
                    return self.curve.value(origin);
                }
                if start == origin {
                    return self.curve.value(stop);
                }
                if start == stop {
                    return self.compounding_rate(start, start + TIME_SHIFT);
                }
                let s = self.curve.value(start)? * self.year_fraction(origin, start);
                let e = self.curve.value(stop)? * self.year_fraction(origin, stop);
                Ok((e - s) / self.year_fraction(start, stop))
            }
            RateStorage::ShortRate => {
                if start == stop {
                    return self.curve.value(start);
                }
                // discrete integration of the stored short rates
                let mut rate = 0.0;
                let mut current = start;
                while current + TIME_SHIFT < stop {
                    rate += self.curve.value(current)?
                        * self.year_fraction(current, current + TIME_SHIFT);
                    current += TIME_SHIFT;
                }
                rate += self.curve.value(current)? * self.year_fraction(current, stop);
                Ok(rate / self.year_fraction(start, stop))
            }
            RateStorage::CashRate => {
                if start == stop {
                    return self.curve.value(start);
                }
                // period-by-period simple compounding of the tenor forwards
                let step = self.forward_tenor;
                let mut df = 1.0;
                let mut current = start;
                while current + step < stop {
                    let t = self.year_fraction(current, current + step);
                    df *= simple_compounding(self.curve.value(current)?, t);
                    current += step;
                }
                let t = self.year_fraction(current, stop);
                df *= simple_compounding(self.curve.value(current)?, t);
                Ok(continuous_rate(df, self.year_fraction(start, stop)))
            }
        }
    }

    // ── Public queries ───────────────────────────────────────────────────

    /// Discount factor `df(start, stop)`.
    ///
    /// `df(t, t) == 1` for every storage.
    pub fn discount_factor(&self, start: Date, stop: Date) -> Result<Real> {
        self.compounding_factor(start, stop)
    }

    /// Continuously compounded zero rate `z(start, stop)` such that
    /// `df(start, stop) = exp(−z·τ(start, stop))`.
    pub fn zero_rate(&self, start: Date, stop: Date) -> Result<Real> {
        self.compounding_rate(start, stop)
    }

    /// Short rate at `t`: the zero rate over the knot interval containing
    /// `t` (a `TIME_SHIFT` interval off the grid).
    pub fn short_rate(&self, t: Date) -> Result<Real> {
        if self.storage == RateStorage::ShortRate {
            return self.curve.value(t);
        }
        let first = self.curve.first();
        let last = self.curve.last();
        if self.domain().len() < 2 || last - TIME_SHIFT <= first {
            return self.zero_rate(t.max(first), t.max(first) + TIME_SHIFT);
        }
        if t < first {
            return self.short_rate(first);
        }
        if last <= t {
            return self.short_rate(last - TIME_SHIFT);
        }
        let previous = self
            .domain()
            .iter()
            .copied()
            .filter(|&d| d <= t)
            .next_back()
            .unwrap_or(first);
        let follow = self
            .domain()
            .iter()
            .copied()
            .find(|&d| t < d)
            .unwrap_or(last);
        self.zero_rate(previous, follow)
    }

    /// Simple forward rate over `[start, start + forward_tenor]`.
    pub fn cash_rate(&self, start: Date) -> Result<Real> {
        self.cash_rate_with_step(start, self.forward_tenor)
    }

    /// Simple forward rate over `[start, start + step]`.
    pub fn cash_rate_with_step(&self, start: Date, step: Period) -> Result<Real> {
        if self.storage == RateStorage::CashRate && step == self.forward_tenor {
            return self.curve.value(start);
        }
        let stop = start + step;
        let df = self.compounding_factor(start, stop)?;
        Ok(simple_rate(df, self.year_fraction(start, stop)))
    }

    /// Swap annuity: the accrual-period-weighted sum of discount factors,
    /// `Σ df(origin, tᵢ)·τ(tᵢ, tᵢ₊₁)`.
    pub fn swap_annuity(&self, dates: &[Date]) -> Result<Real> {
        ensure!(dates.len() >= 2, "swap annuity needs at least 2 dates");
        let origin = self.origin();
        let mut annuity = 0.0;
        for pair in dates.windows(2) {
            annuity += self.discount_factor(origin, pair[0])?
                * self.year_fraction(pair[0], pair[1]);
        }
        Ok(annuity)
    }

    /// A copy of the curve with the stored value at `d` set to `y`
    /// (adding a knot if `d` is off the grid).
    pub fn with_storage_value(&self, d: Date, y: Real) -> Result<Self> {
        let mut curve = self.curve.clone();
        curve.insert(d, y)?;
        Ok(Self {
            curve,
            storage: self.storage,
            forward_tenor: self.forward_tenor,
        })
    }

    // ── Shifts ───────────────────────────────────────────────────────────

    /// A copy of the curve with a zero-rate spread applied.
    ///
    /// The shift function is evaluated at every grid date (plus
    /// `extra_dates`, which are added to the grid).  Rate storages shift
    /// their stored values directly; discount-factor storage composes
    /// `df · exp(−s·τ(origin, d))`, so a flat shift means a parallel move
    /// of the zero curve for every storage.
    pub fn shifted<F>(&self, shift: F, extra_dates: &[Date]) -> Result<Self>
    where
        F: Fn(Date) -> Real,
    {
        let mut domain: Vec<Date> = self.domain().to_vec();
        domain.extend_from_slice(extra_dates);
        domain.sort();
        domain.dedup();

        let mut data = Vec::with_capacity(domain.len());
        for &d in &domain {
            let y = self.curve.value(d)?;
            data.push(match self.storage {
                RateStorage::DiscountFactor => {
                    y * continuous_compounding(shift(d), self.curve.t(d))
                }
                _ => y + shift(d),
            });
        }
        let curve = DateCurve::with_parts(
            &domain,
            &data,
            self.curve.scheme(),
            self.origin(),
            self.day_count(),
        )?;
        Ok(Self {
            curve,
            storage: self.storage,
            forward_tenor: self.forward_tenor,
        })
    }
}

impl ForwardSource for InterestRateCurve {
    /// Rate curves serve cash rates as forward values.
    fn forward_value(&self, date: Date) -> Result<Real> {
        self.cash_rate(date)
    }

    fn forward_tenor(&self) -> Option<Period> {
        Some(self.forward_tenor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dates(xs: &[f64]) -> Vec<Date> {
        xs.iter().map(|&x| Date::new(x)).collect()
    }

    #[test]
    fn flat_zero_curve_scenario() {
        // flat 2% zero curve, 1Y horizon
        let origin = Date::new(0.0);
        let curve = InterestRateCurve::zero_rates(&[origin], &[0.02]).unwrap();
        let one_year = origin + Period::years(1.0);

        let df = curve.discount_factor(origin, one_year).unwrap();
        assert_abs_diff_eq!(df, (-0.02f64).exp(), epsilon = 1e-10);
        assert_abs_diff_eq!(df, 0.980_198_7, epsilon = 1e-7);

        let cash = curve
            .cash_rate_with_step(origin, Period::years(1.0))
            .unwrap();
        assert_abs_diff_eq!(cash, (1.0 / df - 1.0) / 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cash, 0.020_201_34, epsilon = 1e-7);
    }

    #[test]
    fn df_at_zero_length_is_one() {
        let origin = Date::new(0.0);
        for curve in [
            InterestRateCurve::zero_rates(&dates(&[0.0, 1.0]), &[0.01, 0.02]).unwrap(),
            InterestRateCurve::discount_factors(&dates(&[0.0, 1.0]), &[1.0, 0.98])
                .unwrap(),
            InterestRateCurve::short_rates(&dates(&[0.0, 1.0]), &[0.01, 0.02]).unwrap(),
            InterestRateCurve::cash_rates(
                &dates(&[0.0, 1.0]),
                &[0.01, 0.02],
                Period::months(3.0),
            )
            .unwrap(),
        ] {
            for t in [0.0, 0.5, 1.0, 2.0] {
                let d = Date::new(t);
                assert_abs_diff_eq!(
                    curve.discount_factor(d, d).unwrap(),
                    1.0,
                    epsilon = 1e-15
                );
            }
            assert_abs_diff_eq!(
                curve
                    .discount_factor(origin, origin + Period::years(1.0))
                    .unwrap(),
                (-curve
                    .zero_rate(origin, origin + Period::years(1.0))
                    .unwrap())
                .exp(),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn df_storage_round_trips_its_grid() {
        let domain = dates(&[0.0, 1.0, 2.0, 5.0]);
        let data: Vec<f64> = domain
            .iter()
            .map(|d| (-0.03 * d.as_years()).exp())
            .collect();
        let curve = InterestRateCurve::discount_factors(&domain, &data).unwrap();
        let origin = curve.origin();
        for (d, df) in domain.iter().zip(&data) {
            assert_abs_diff_eq!(
                curve.discount_factor(origin, *d).unwrap(),
                *df,
                epsilon = 1e-12
            );
        }
        // zero rate implied by a flat-3% discount grid is 3%
        assert_abs_diff_eq!(
            curve.zero_rate(origin, Date::new(1.5)).unwrap(),
            0.03,
            epsilon = 1e-9
        );
    }

    #[test]
    fn short_rate_of_flat_curve_is_flat() {
        let curve =
            InterestRateCurve::zero_rates(&dates(&[0.0, 1.0, 2.0]), &[0.02, 0.02, 0.02])
                .unwrap();
        for t in [0.0, 0.4, 1.2, 2.0, 3.0] {
            assert_abs_diff_eq!(
                curve.short_rate(Date::new(t)).unwrap(),
                0.02,
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn cash_storage_shortcut_hits_stored_values() {
        let tenor = Period::months(3.0);
        let curve = InterestRateCurve::cash_rates(
            &dates(&[0.0, 1.0, 2.0]),
            &[-0.005, 0.0, 0.001],
            tenor,
        )
        .unwrap();
        assert_abs_diff_eq!(
            curve.cash_rate(Date::new(1.0)).unwrap(),
            0.0,
            epsilon = 1e-15
        );
        // interpolated between the knots
        assert_abs_diff_eq!(
            curve.cash_rate(Date::new(0.5)).unwrap(),
            -0.0025,
            epsilon = 1e-12
        );
    }

    #[test]
    fn swap_annuity_weights_by_year_fraction() {
        let curve = InterestRateCurve::zero_rates(&dates(&[0.0]), &[0.0]).unwrap();
        // zero rates: df == 1, annuity equals the total year fraction
        let annuity = curve
            .swap_annuity(&dates(&[0.0, 0.5, 1.0, 2.0]))
            .unwrap();
        assert_abs_diff_eq!(annuity, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn swap_annuity_discounts_at_period_starts() {
        // a steep 10% curve separates df(tᵢ) from df(tᵢ₊₁)
        let curve = InterestRateCurve::zero_rates(&dates(&[0.0]), &[0.1]).unwrap();
        let annuity = curve
            .swap_annuity(&dates(&[0.0, 1.0, 2.0, 3.0]))
            .unwrap();
        // Σ df(0, tᵢ)·τ(tᵢ, tᵢ₊₁) = e⁰ + e^(−0.1) + e^(−0.2)
        let expected = 1.0 + (-0.1f64).exp() + (-0.2f64).exp();
        assert_abs_diff_eq!(annuity, expected, epsilon = 1e-12);
    }

    #[test]
    fn parallel_shift_moves_zero_rates_for_every_storage() {
        let domain = dates(&[0.0, 1.0, 2.0, 5.0]);
        let zeros =
            InterestRateCurve::zero_rates(&domain, &[0.01, 0.015, 0.02, 0.022]).unwrap();
        for storage in [
            RateStorage::ZeroRate,
            RateStorage::DiscountFactor,
            RateStorage::ShortRate,
        ] {
            let curve = InterestRateCurve::from_curve(&zeros, storage).unwrap();
            let shifted = curve.shifted(|_| 1e-4, &[]).unwrap();
            let s = Date::new(0.0);
            let e = Date::new(4.0);
            let base = curve.zero_rate(s, e).unwrap();
            let moved = shifted.zero_rate(s, e).unwrap();
            assert_abs_diff_eq!(moved - base, 1e-4, epsilon = 2e-6);
        }
    }

    #[test]
    fn forward_source_serves_cash_rates() {
        let curve = InterestRateCurve::zero_rates(&dates(&[0.0]), &[0.02]).unwrap();
        let d = Date::new(1.0);
        assert_abs_diff_eq!(
            curve.forward_value(d).unwrap(),
            curve.cash_rate(d).unwrap(),
            epsilon = 1e-15
        );
    }
}

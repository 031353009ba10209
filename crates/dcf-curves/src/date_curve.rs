//! Curve with a date domain, day count, and fixings.

use std::collections::BTreeMap;
use std::sync::Arc;

use dcf_core::{errors::Result, Real, Time};
use dcf_math::Scheme;
use dcf_time::{default_day_count, Date, DayCount, Period, TIME_SHIFT};

use crate::curve::Curve;

/// A [`Curve`] whose domain is dates: all queries at a date `d` are
/// forwarded to the underlying float curve at `τ(origin, d)`.
///
/// A fixings map shadows the interpolator: a queried date with a fixing
/// returns the fixing.  Fixings are an immutable override, added with
/// [`with_fixing`](DateCurve::with_fixing).
#[derive(Debug, Clone)]
pub struct DateCurve {
    domain: Vec<Date>,
    data: Vec<Real>,
    scheme: Scheme,
    origin: Date,
    day_count: Arc<dyn DayCount>,
    fixings: BTreeMap<Date, Real>,
    curve: Curve,
}

impl DateCurve {
    /// Build a date curve; `origin` defaults to the first knot.
    pub fn new(domain: &[Date], data: &[Real], scheme: Scheme) -> Result<Self> {
        let origin = domain.iter().min().copied().unwrap_or_default();
        Self::with_parts(domain, data, scheme, origin, default_day_count())
    }

    /// Build a date curve with explicit origin and day count.
    pub fn with_parts(
        domain: &[Date],
        data: &[Real],
        scheme: Scheme,
        origin: Date,
        day_count: Arc<dyn DayCount>,
    ) -> Result<Self> {
        let mut pairs: Vec<(Date, Real)> = domain
            .iter()
            .copied()
            .zip(data.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let domain: Vec<Date> = pairs.iter().map(|p| p.0).collect();
        let data: Vec<Real> = pairs.iter().map(|p| p.1).collect();
        let xs: Vec<Real> = domain
            .iter()
            .map(|&d| day_count.year_fraction(origin, d))
            .collect();
        let curve = Curve::new(&xs, &data, scheme)?;
        Ok(Self {
            domain,
            data,
            scheme,
            origin,
            day_count,
            fixings: BTreeMap::new(),
            curve,
        })
    }

    /// Same curve with a different origin (rebuilds the float grid).
    pub fn with_origin(self, origin: Date) -> Result<Self> {
        let mut new =
            Self::with_parts(&self.domain, &self.data, self.scheme, origin, self.day_count)?;
        new.fixings = self.fixings;
        Ok(new)
    }

    /// Same curve with a different day count (rebuilds the float grid).
    pub fn with_day_count(self, day_count: Arc<dyn DayCount>) -> Result<Self> {
        let mut new =
            Self::with_parts(&self.domain, &self.data, self.scheme, self.origin, day_count)?;
        new.fixings = self.fixings;
        Ok(new)
    }

    /// Same knot data under a different interpolation scheme.
    pub fn with_scheme(self, scheme: Scheme) -> Result<Self> {
        let mut new =
            Self::with_parts(&self.domain, &self.data, scheme, self.origin, self.day_count)?;
        new.fixings = self.fixings;
        Ok(new)
    }

    /// A copy of the curve with an additional fixing at `date`.
    pub fn with_fixing(&self, date: Date, value: Real) -> Self {
        let mut new = self.clone();
        new.fixings.insert(date, value);
        new
    }

    /// Evaluate at a date; a fixing at that exact date wins.
    pub fn value(&self, d: Date) -> Result<Real> {
        if let Some(&fixing) = self.fixings.get(&d) {
            return Ok(fixing);
        }
        self.curve.value(self.t(d))
    }

    /// The date grid.
    pub fn domain(&self) -> &[Date] {
        &self.domain
    }

    /// The knot values.
    pub fn data(&self) -> &[Real] {
        &self.data
    }

    /// The interpolation scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// The curve's reference date.
    pub fn origin(&self) -> Date {
        self.origin
    }

    /// The day-count convention.
    pub fn day_count(&self) -> Arc<dyn DayCount> {
        self.day_count.clone()
    }

    /// The fixing overrides.
    pub fn fixings(&self) -> &BTreeMap<Date, Real> {
        &self.fixings
    }

    /// Year fraction between two dates under the curve's day count.
    pub fn year_fraction(&self, start: Date, end: Date) -> Time {
        self.day_count.year_fraction(start, end)
    }

    /// Year fraction from the origin.
    pub fn t(&self, d: Date) -> Time {
        self.day_count.year_fraction(self.origin, d)
    }

    /// First knot date.
    pub fn first(&self) -> Date {
        self.domain[0]
    }

    /// Last knot date.
    pub fn last(&self) -> Date {
        self.domain[self.domain.len() - 1]
    }

    /// Set (or add) the knot at `d`, rebuilding the interpolator.
    pub fn insert(&mut self, d: Date, y: Real) -> Result<()> {
        match self.domain.binary_search(&d) {
            Ok(i) => self.data[i] = y,
            Err(i) => {
                self.domain.insert(i, d);
                self.data.insert(i, y);
            }
        }
        let xs: Vec<Real> = self
            .domain
            .iter()
            .map(|&d| self.day_count.year_fraction(self.origin, d))
            .collect();
        self.curve = Curve::new(&xs, &self.data, self.scheme)?;
        Ok(())
    }

    /// A copy with the whole date grid shifted by `delta`.
    pub fn shifted(&self, delta: Period) -> Result<Self> {
        let domain: Vec<Date> = self.domain.iter().map(|&d| d + delta).collect();
        Self::with_parts(
            &domain,
            &self.data,
            self.scheme,
            self.origin + delta,
            self.day_count.clone(),
        )
    }

    fn combine<F>(&self, other: &DateCurve, op: F) -> Result<DateCurve>
    where
        F: Fn(Real, Real) -> Real,
    {
        // align the right operand's origin with ours before taking the
        // union of the date grids
        let other = other.shifted(self.origin - other.origin)?;
        let mut domain: Vec<Date> = self
            .domain
            .iter()
            .chain(other.domain.iter())
            .copied()
            .collect();
        domain.sort();
        domain.dedup();
        let mut data = Vec::with_capacity(domain.len());
        for &d in &domain {
            data.push(op(self.value(d)?, other.value(d)?));
        }
        Self::with_parts(
            &domain,
            &data,
            self.scheme,
            self.origin,
            self.day_count.clone(),
        )
    }

    /// Pointwise sum on the union date grid (origins aligned first).
    pub fn add(&self, other: &DateCurve) -> Result<DateCurve> {
        self.combine(other, |a, b| a + b)
    }

    /// Pointwise difference on the union date grid.
    pub fn sub(&self, other: &DateCurve) -> Result<DateCurve> {
        self.combine(other, |a, b| a - b)
    }

    /// Pointwise product on the union date grid.
    pub fn mul(&self, other: &DateCurve) -> Result<DateCurve> {
        self.combine(other, |a, b| a * b)
    }

    /// Pointwise quotient on the union date grid.
    ///
    /// # Errors
    /// [`Error`](dcf_core::Error)`::Domain` if the divisor samples to zero
    /// anywhere on the union grid.
    pub fn div(&self, other: &DateCurve) -> Result<DateCurve> {
        let aligned = other.shifted(self.origin - other.origin)?;
        for &d in self.domain.iter().chain(aligned.domain.iter()) {
            if aligned.value(d)? == 0.0 {
                return Err(dcf_core::Error::Domain(format!(
                    "division by a curve with zero value at {d}"
                )));
            }
        }
        self.combine(other, |a, b| a / b)
    }

    /// Average curve value over `[start, stop]`:
    /// `(∫ f dt) / τ(start, stop)`, via a fixed-step Riemann sum with a
    /// one-day step.
    pub fn integrate(&self, start: Date, stop: Date) -> Result<Real> {
        let total = self.year_fraction(start, stop);
        if total <= 0.0 {
            return self.value(start);
        }
        let mut value = 0.0;
        let mut current = start;
        while current + TIME_SHIFT < stop {
            value += self.value(current)?
                * self.year_fraction(current, current + TIME_SHIFT);
            current += TIME_SHIFT;
        }
        value += self.value(current)? * self.year_fraction(current, stop);
        Ok(value / total)
    }

    /// Numerical first derivative at `start` (forward difference over a
    /// one-day step).
    pub fn derivative(&self, start: Date) -> Result<Real> {
        let stop = start + TIME_SHIFT;
        let value = self.value(stop)? - self.value(start)?;
        Ok(value / self.year_fraction(start, stop))
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
    fn queries_by_year_fraction() {
        let c = DateCurve::new(
            &dates(&[0.5, 1.0, 1.5, 2.0]),
            &[1.0, 2.0, 3.0, 4.0],
            Scheme::linear(),
        )
        .unwrap();
        assert_eq!(c.origin(), Date::new(0.5));
        assert_abs_diff_eq!(c.value(Date::new(0.75)).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn fixing_shadows_interpolation() {
        let c = DateCurve::new(&dates(&[0.0, 1.0]), &[1.0, 2.0], Scheme::linear())
            .unwrap()
            .with_fixing(Date::new(0.5), 42.0);
        assert_eq!(c.value(Date::new(0.5)).unwrap(), 42.0);
        assert_abs_diff_eq!(c.value(Date::new(0.25)).unwrap(), 1.25, epsilon = 1e-12);
    }

    #[test]
    fn arithmetic_aligns_origins() {
        let a = DateCurve::new(&dates(&[0.0, 1.0]), &[1.0, 1.0], Scheme::linear())
            .unwrap();
        // same shape, but placed a year later
        let b = DateCurve::new(&dates(&[1.0, 2.0]), &[2.0, 4.0], Scheme::linear())
            .unwrap();
        let sum = a.add(&b).unwrap();
        // b's origin is shifted back onto a's: b contributes 2.0 at 0.0
        assert_abs_diff_eq!(sum.value(Date::new(0.0)).unwrap(), 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sum.value(Date::new(1.0)).unwrap(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_averages() {
        // constant curve integrates to itself
        let c = DateCurve::new(&dates(&[0.0, 2.0]), &[0.03, 0.03], Scheme::linear())
            .unwrap();
        assert_abs_diff_eq!(
            c.integrate(Date::new(0.0), Date::new(1.5)).unwrap(),
            0.03,
            epsilon = 1e-10
        );
        // linear curve averages to the midpoint value, up to step error
        let c = DateCurve::new(&dates(&[0.0, 1.0]), &[0.0, 1.0], Scheme::linear())
            .unwrap();
        let avg = c.integrate(Date::new(0.0), Date::new(1.0)).unwrap();
        assert!((avg - 0.5).abs() < 2e-3, "got {avg}");
    }

    #[test]
    fn derivative_of_line_is_slope() {
        let c = DateCurve::new(&dates(&[0.0, 1.0]), &[0.0, 2.0], Scheme::linear())
            .unwrap();
        assert_abs_diff_eq!(
            c.derivative(Date::new(0.5)).unwrap(),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn insert_rebuilds() {
        let mut c =
            DateCurve::new(&dates(&[0.0, 1.0]), &[1.0, 2.0], Scheme::linear()).unwrap();
        c.insert(Date::new(2.0), 5.0).unwrap();
        assert_eq!(c.domain().len(), 3);
        assert_eq!(c.value(Date::new(2.0)).unwrap(), 5.0);
    }
}

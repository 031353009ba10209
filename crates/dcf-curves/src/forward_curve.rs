//! Forward price curves.

use std::sync::Arc;

use dcf_core::{errors::Result, Real};
use dcf_math::Scheme;
use dcf_time::{Date, DayCount};

use crate::date_curve::DateCurve;
use crate::price::Price;
use crate::rate_curve::InterestRateCurve;
use crate::sources::ForwardSource;

/// How a [`ForwardCurve`] extrapolates beyond its last knot.
#[derive(Debug, Clone)]
pub enum YieldExtrapolator {
    /// Continuous compounding at a constant yield:
    /// `F(T) = F(tₙ) · exp(y·τ(tₙ, T))`.
    ConstantYield(Real),
    /// A generic yield function `γ`: `F(T) = F(tₙ) · γ(tₙ)/γ(T)`.
    YieldCurve(Arc<DateCurve>),
    /// A discount-factor-capable curve: `F(T) = F(tₙ) / df(tₙ, T)`.
    DiscountCurve(Arc<InterestRateCurve>),
}

/// A curve of expected asset prices at future dates.
///
/// Prices are interpolated log-linearly by default; beyond the last knot
/// the curve extrapolates with its [`YieldExtrapolator`] (or stays flat
/// if none is configured).
#[derive(Debug, Clone)]
pub struct ForwardCurve {
    curve: DateCurve,
    extrapolator: Option<YieldExtrapolator>,
}

impl ForwardCurve {
    /// Build a forward-price curve from prices at dates.
    pub fn new(domain: &[Date], data: &[Real]) -> Result<Self> {
        let curve = DateCurve::new(domain, data, Scheme::log_linear())?;
        Ok(Self {
            curve,
            extrapolator: None,
        })
    }

    /// A single-knot curve from a spot [`Price`].
    pub fn from_price(price: Price) -> Result<Self> {
        Self::new(&[price.origin()], &[price.value()])
    }

    /// Set the extrapolation rule for dates beyond the last knot.
    pub fn with_extrapolator(mut self, extrapolator: YieldExtrapolator) -> Self {
        self.extrapolator = Some(extrapolator);
        self
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

    /// The underlying date curve.
    pub fn curve(&self) -> &DateCurve {
        &self.curve
    }

    /// The curve's reference date.
    pub fn origin(&self) -> Date {
        self.curve.origin()
    }

    /// The date grid.
    pub fn domain(&self) -> &[Date] {
        self.curve.domain()
    }

    /// Expected asset price at `value_date`: interpolated up to the last
    /// knot, extrapolated by the yield rule beyond it.
    pub fn forward_price(&self, value_date: Date) -> Result<Real> {
        let last = self.curve.last();
        if value_date <= last {
            return self.curve.value(value_date);
        }
        let last_price = self.curve.value(last)?;
        let df = match &self.extrapolator {
            None => 1.0,
            Some(YieldExtrapolator::ConstantYield(y)) => {
                let tau = self.curve.year_fraction(last, value_date);
                (-y * tau).exp()
            }
            Some(YieldExtrapolator::YieldCurve(gamma)) => {
                gamma.value(value_date)? / gamma.value(last)?
            }
            Some(YieldExtrapolator::DiscountCurve(curve)) => {
                curve.discount_factor(last, value_date)?
            }
        };
        Ok(last_price / df)
    }
}

impl ForwardSource for ForwardCurve {
    fn forward_value(&self, date: Date) -> Result<Real> {
        self.forward_price(date)
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
    fn interpolates_log_linearly_inside() {
        let curve =
            ForwardCurve::new(&dates(&[0.0, 1.0]), &[100.0, 121.0]).unwrap();
        assert_abs_diff_eq!(
            curve.forward_price(Date::new(0.5)).unwrap(),
            110.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn flat_beyond_last_without_extrapolator() {
        let curve = ForwardCurve::new(&dates(&[0.0, 1.0]), &[100.0, 105.0]).unwrap();
        assert_abs_diff_eq!(
            curve.forward_price(Date::new(3.0)).unwrap(),
            105.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn constant_yield_extrapolation() {
        let curve = ForwardCurve::new(&dates(&[0.0, 1.0]), &[100.0, 105.0])
            .unwrap()
            .with_extrapolator(YieldExtrapolator::ConstantYield(0.05));
        assert_abs_diff_eq!(
            curve.forward_price(Date::new(2.0)).unwrap(),
            105.0 * (0.05f64).exp(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn discount_curve_extrapolation() {
        let disc = Arc::new(
            InterestRateCurve::zero_rates(&dates(&[0.0]), &[0.03]).unwrap(),
        );
        let curve = ForwardCurve::new(&dates(&[0.0, 1.0]), &[100.0, 100.0])
            .unwrap()
            .with_extrapolator(YieldExtrapolator::DiscountCurve(disc));
        // growing at the 3% funding rate beyond the last knot
        assert_abs_diff_eq!(
            curve.forward_price(Date::new(2.0)).unwrap(),
            100.0 * (0.03f64).exp(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn spot_price_constructor() {
        let curve =
            ForwardCurve::from_price(Price::new(42.0, Date::new(0.25))).unwrap();
        assert_eq!(curve.origin(), Date::new(0.25));
        assert_abs_diff_eq!(
            curve.forward_price(Date::new(0.25)).unwrap(),
            42.0,
            epsilon = 1e-12
        );
    }
}

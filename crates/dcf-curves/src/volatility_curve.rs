//! Volatility curves.

use std::sync::Arc;

use dcf_core::{errors::Result, Error, Real, Time, Volatility};
use dcf_math::Scheme;
use dcf_time::{Date, DayCount, TIME_SHIFT};

use crate::date_curve::DateCurve;
use crate::sources::VolatilitySource;

/// Storage representation of a [`VolatilityCurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolStorage {
    /// `σ(d)` — spot (instantaneous) volatility.
    Instantaneous,
    /// `σ(origin, d)` — Black-Scholes-style term volatility.
    Terminal,
}

/// A volatility curve with a fixed storage representation.
///
/// Forward volatility between two dates is derived by variance
/// differencing; a negative forward variance is fatal unless a floor is
/// configured, in which case the variance is clipped (with a warning).
#[derive(Debug, Clone)]
pub struct VolatilityCurve {
    curve: DateCurve,
    storage: VolStorage,
    floor: Option<Real>,
}

impl VolatilityCurve {
    /// Build a curve storing `data` under the given representation.
    pub fn new(storage: VolStorage, domain: &[Date], data: &[Real]) -> Result<Self> {
        let curve = DateCurve::new(domain, data, Scheme::linear())?;
        Ok(Self {
            curve,
            storage,
            floor: None,
        })
    }

    /// A curve storing instantaneous volatilities.
    pub fn instantaneous(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(VolStorage::Instantaneous, domain, data)
    }

    /// A curve storing terminal (term) volatilities from origin.
    pub fn terminal(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(VolStorage::Terminal, domain, data)
    }

    /// Construct a curve of the requested storage from another volatility
    /// curve by sampling its query methods on the extended grid.
    pub fn from_curve(other: &VolatilityCurve, storage: VolStorage) -> Result<Self> {
        let origin = other.origin();
        let mut domain: Vec<Date> = Vec::new();
        match storage {
            VolStorage::Instantaneous => {
                // bracket every knot to pin down the local level
                for &d in other.domain().iter().chain([origin].iter()) {
                    domain.push(d - TIME_SHIFT);
                    domain.push(d);
                    domain.push(d + TIME_SHIFT);
                }
                domain.retain(|&d| origin <= d);
            }
            VolStorage::Terminal => {
                domain.extend_from_slice(other.domain());
                domain.push(origin + TIME_SHIFT);
                domain.push(other.curve.last() + dcf_time::Period::years(10.0));
            }
        }
        domain.sort();
        domain.dedup();

        let mut data = Vec::with_capacity(domain.len());
        for &d in &domain {
            data.push(match storage {
                VolStorage::Instantaneous => other.instantaneous_vol(d)?,
                VolStorage::Terminal => other.terminal_vol(d)?,
            });
        }
        let curve = DateCurve::with_parts(
            &domain,
            &data,
            Scheme::linear(),
            origin,
            other.curve.day_count(),
        )?;
        Ok(Self {
            curve,
            storage,
            floor: other.floor,
        })
    }

    /// The date grid.
    pub fn domain(&self) -> &[Date] {
        self.curve.domain()
    }

    /// Clip negative forward variances at `floor²` instead of failing.
    pub fn with_floor(mut self, floor: Real) -> Self {
        self.floor = Some(floor);
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

    /// The storage representation.
    pub fn storage(&self) -> VolStorage {
        self.storage
    }

    /// The underlying date curve.
    pub fn curve(&self) -> &DateCurve {
        &self.curve
    }

    /// The curve's reference date.
    pub fn origin(&self) -> Date {
        self.curve.origin()
    }

    /// Year fraction between two dates under the curve's day count.
    pub fn year_fraction(&self, start: Date, end: Date) -> Time {
        self.curve.year_fraction(start, end)
    }

    /// Spot volatility at `start`.
    pub fn instantaneous_vol(&self, start: Date) -> Result<Volatility> {
        match self.storage {
            VolStorage::Instantaneous => self.curve.value(start),
            VolStorage::Terminal => self.forward_vol(start, start + TIME_SHIFT),
        }
    }

    /// Terminal volatility from origin to `expiry`.
    pub fn terminal_vol(&self, expiry: Date) -> Result<Volatility> {
        match self.storage {
            VolStorage::Instantaneous => self.forward_vol(self.origin(), expiry),
            VolStorage::Terminal => self.curve.value(expiry),
        }
    }

    /// Forward volatility between `start` and `stop`.
    ///
    /// # Errors
    /// [`Error::NegativeVariance`] if variance differencing yields a
    /// negative number and no floor is configured.
    pub fn forward_vol(&self, start: Date, stop: Date) -> Result<Volatility> {
        if start > stop {
            return Ok(0.0);
        }
        match self.storage {
            VolStorage::Instantaneous => {
                if start == stop {
                    return self.curve.value(start);
                }
                self.curve.integrate(start, stop)
            }
            VolStorage::Terminal => {
                let origin = self.origin();
                if start == origin {
                    return self.curve.value(stop);
                }
                if start == stop {
                    return self.instantaneous_vol(start);
                }
                let var_start = self.year_fraction(origin, start)
                    * self.curve.value(start)?.powi(2);
                let var_stop =
                    self.year_fraction(origin, stop) * self.curve.value(stop)?.powi(2);
                let mut var =
                    (var_stop - var_start) / self.year_fraction(start, stop);
                if var < 0.0 {
                    log::warn!(
                        "negative forward variance {var:.6e} between {start} and {stop}"
                    );
                    match self.floor {
                        None => {
                            return Err(Error::NegativeVariance(format!(
                                "forward variance {var:.6e} between {start} and {stop}"
                            )))
                        }
                        Some(floor) => var = var.max(floor * floor),
                    }
                } else if let Some(floor) = self.floor {
                    var = var.max(floor * floor);
                }
                Ok(var.sqrt())
            }
        }
    }
}

impl VolatilitySource for VolatilityCurve {
    fn terminal_vol(&self, date: Date) -> Result<Real> {
        VolatilityCurve::terminal_vol(self, date)
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
    fn instantaneous_integrates_to_terminal() {
        let curve = VolatilityCurve::instantaneous(
            &dates(&[0.0, 1.0, 2.0]),
            &[0.1, 0.1, 0.1],
        )
        .unwrap();
        assert_abs_diff_eq!(
            curve.terminal_vol(Date::new(1.5)).unwrap(),
            0.1,
            epsilon = 1e-10
        );
        assert_abs_diff_eq!(
            curve.instantaneous_vol(Date::new(0.7)).unwrap(),
            0.1,
            epsilon = 1e-12
        );
    }

    #[test]
    fn terminal_variance_differencing() {
        let curve =
            VolatilityCurve::terminal(&dates(&[0.0, 1.0, 2.0]), &[0.1, 0.1, 0.2])
                .unwrap();
        // forward variance over [1, 2]: (2·0.04 − 1·0.01) / 1
        let fwd = curve.forward_vol(Date::new(1.0), Date::new(2.0)).unwrap();
        assert_abs_diff_eq!(fwd, (0.07f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn negative_variance_is_fatal_without_floor() {
        // falling term vols make forward variance negative
        let curve =
            VolatilityCurve::terminal(&dates(&[0.0, 1.0, 2.0]), &[0.3, 0.3, 0.05])
                .unwrap();
        let err = curve
            .forward_vol(Date::new(1.0), Date::new(2.0))
            .unwrap_err();
        assert!(matches!(err, Error::NegativeVariance(_)));
    }

    #[test]
    fn negative_variance_clips_at_floor() {
        let curve =
            VolatilityCurve::terminal(&dates(&[0.0, 1.0, 2.0]), &[0.3, 0.3, 0.05])
                .unwrap()
                .with_floor(0.01);
        let fwd = curve
            .forward_vol(Date::new(1.0), Date::new(2.0))
            .unwrap();
        assert_abs_diff_eq!(fwd, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn reversed_interval_is_zero() {
        let curve =
            VolatilityCurve::terminal(&dates(&[0.0, 1.0]), &[0.2, 0.2]).unwrap();
        assert_eq!(
            curve.forward_vol(Date::new(1.0), Date::new(0.5)).unwrap(),
            0.0
        );
    }
}

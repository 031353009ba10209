//! Credit curves.
//!
//! The mirror image of the interest-rate family under the substitution
//! `df ↔ S`, `zero rate ↔ flat intensity`, `short rate ↔ hazard rate`,
//! plus the marginal (per-tenor) probability storages.

use std::sync::Arc;

use dcf_core::compounding::{continuous_compounding, continuous_rate};
use dcf_core::{errors::Result, Probability, Real, Time};
use dcf_math::Scheme;
use dcf_time::{Date, DayCount, Period, TIME_SHIFT};

use crate::date_curve::DateCurve;

/// Probabilities are clamped into `(EPS, 1 − EPS)` on construction to
/// prevent singularities in the log-based interpolation.
const EPS: Real = 1e-12;

/// Storage representation of a [`CreditCurve`].
///
/// The complement storages (`DefaultProbability`, `MarginalDefault`)
/// convert their input to survival space at construction; the tag records
/// how the curve was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreditStorage {
    /// `S(origin, d)` — survival probability from origin.
    SurvivalProbability,
    /// `1 − S(origin, d)` — cumulative default probability.
    DefaultProbability,
    /// `λ(origin, d)` — average default intensity.
    FlatIntensity,
    /// `h(d)` — instantaneous default intensity.
    HazardRate,
    /// `S(d, d+τ*)` — per-tenor conditional survival.
    MarginalSurvival,
    /// `1 − S(d, d+τ*)` — per-tenor conditional default.
    MarginalDefault,
}

impl CreditStorage {
    /// The interpolation scheme a curve of this storage defaults to.
    pub fn default_scheme(self) -> Scheme {
        match self {
            CreditStorage::SurvivalProbability | CreditStorage::DefaultProbability => {
                Scheme::log_linear_rate()
            }
            CreditStorage::FlatIntensity => Scheme::linear(),
            CreditStorage::HazardRate => Scheme::constant(),
            CreditStorage::MarginalSurvival | CreditStorage::MarginalDefault => {
                Scheme::log_linear()
            }
        }
    }

    /// Whether the stored values live in (marginal) survival space.
    fn is_probability(self) -> bool {
        !matches!(
            self,
            CreditStorage::FlatIntensity | CreditStorage::HazardRate
        )
    }

    /// Whether the stored values are per-tenor marginals.
    fn is_marginal(self) -> bool {
        matches!(
            self,
            CreditStorage::MarginalSurvival | CreditStorage::MarginalDefault
        )
    }

    /// Whether user data arrives as default (not survival) probabilities.
    fn is_complement(self) -> bool {
        matches!(
            self,
            CreditStorage::DefaultProbability | CreditStorage::MarginalDefault
        )
    }
}

/// Default forward tenor of credit curves (1 year).
fn default_forward_tenor() -> Period {
    Period::years(1.0)
}

/// A credit curve with a fixed storage representation.
#[derive(Debug, Clone)]
pub struct CreditCurve {
    curve: DateCurve,
    storage: CreditStorage,
    forward_tenor: Period,
}

impl CreditCurve {
    /// Build a curve storing `data` under the given representation.
    ///
    /// Probability storages clamp values into `(EPS, 1 − EPS)`; the
    /// complement storages take default probabilities and store
    /// `1 − value`.
    pub fn new(storage: CreditStorage, domain: &[Date], data: &[Real]) -> Result<Self> {
        let data: Vec<Real> = if storage.is_probability() {
            data.iter()
                .map(|&p| {
                    let p = if storage.is_complement() { 1.0 - p } else { p };
                    p.clamp(EPS, 1.0 - EPS)
                })
                .collect()
        } else {
            data.to_vec()
        };
        let curve = DateCurve::new(domain, &data, storage.default_scheme())?;
        Ok(Self {
            curve,
            storage,
            forward_tenor: default_forward_tenor(),
        })
    }

    /// A curve storing survival probabilities from origin.
    pub fn survival_probabilities(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::SurvivalProbability, domain, data)
    }

    /// A curve built from cumulative default probabilities.
    pub fn default_probabilities(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::DefaultProbability, domain, data)
    }

    /// A curve storing average default intensities from origin.
    pub fn flat_intensities(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::FlatIntensity, domain, data)
    }

    /// A curve storing instantaneous hazard rates.
    pub fn hazard_rates(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::HazardRate, domain, data)
    }

    /// A curve storing per-tenor conditional survival probabilities.
    pub fn marginal_survival(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::MarginalSurvival, domain, data)
    }

    /// A curve built from per-tenor conditional default probabilities.
    pub fn marginal_default(domain: &[Date], data: &[Real]) -> Result<Self> {
        Self::new(CreditStorage::MarginalDefault, domain, data)
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

    /// Set the forward tenor for marginal queries.
    pub fn with_forward_tenor(mut self, forward_tenor: Period) -> Self {
        self.forward_tenor = forward_tenor;
        self
    }

    /// Construct a curve of the requested storage from another credit
    /// curve by sampling its query methods on the extended grid.
    pub fn from_curve(other: &CreditCurve, storage: CreditStorage) -> Result<Self> {
        let origin = other.origin();
        let mut domain: Vec<Date> = other.domain().to_vec();
        domain.push(other.curve.last() + Period::years(1.0));
        if storage.is_probability() {
            domain.push(origin + Period::days(1.0));
        }
        domain.sort();
        domain.dedup();

        let mut data = Vec::with_capacity(domain.len());
        for &d in &domain {
            data.push(match storage {
                CreditStorage::SurvivalProbability | CreditStorage::DefaultProbability => {
                    other.survival_probability(origin, d)?
                }
                CreditStorage::FlatIntensity => other.flat_intensity(origin, d)?,
                CreditStorage::HazardRate => other.hazard_rate(d)?,
                CreditStorage::MarginalSurvival | CreditStorage::MarginalDefault => {
                    other.survival_probability(d, d + other.forward_tenor)?
                }
            });
        }

        // sampled values are already in storage space
        let data: Vec<Real> = if storage.is_probability() {
            data.iter().map(|&p| p.clamp(EPS, 1.0 - EPS)).collect()
        } else {
            data
        };
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
    pub fn storage(&self) -> CreditStorage {
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

    /// The tenor of the curve's marginal probabilities.
    pub fn forward_tenor(&self) -> Period {
        self.forward_tenor
    }

    /// Year fraction between two dates under the curve's day count.
    pub fn year_fraction(&self, start: Date, end: Date) -> Time {
        self.curve.year_fraction(start, end)
    }

    // ── Conversion kernels ───────────────────────────────────────────────

    /// Survival factor over `[start, stop]` (credit analogue of the
    /// discount factor).
    fn compounding_factor(&self, start: Date, stop: Date) -> Result<Probability> {
        match self.storage {
            CreditStorage::SurvivalProbability | CreditStorage::DefaultProbability => {
                if start == self.origin() && start != stop {
                    return self.curve.value(stop);
                }
                if start == stop {
                    return Ok(if self.curve.value(start)? >= 2.0 * EPS {
                        1.0
                    } else {
                        0.0
                    });
                }
                Ok(self.curve.value(stop)? / self.curve.value(start)?)
            }
            CreditStorage::MarginalSurvival | CreditStorage::MarginalDefault => {
                if start == stop {
                    return Ok(if self.curve.value(start)? >= 2.0 * EPS {
                        1.0
                    } else {
                        0.0
                    });
                }
                // chain full tenor marginals, then scale the stub period
                let step = self.forward_tenor;
                let mut factor = 1.0;
                let mut current = start;
                while current + step < stop {
                    let marginal = self.curve.value(current)?;
                    if marginal < 2.0 * EPS {
                        return Ok(0.0);
                    }
                    factor *= marginal;
                    current += step;
                }
                let marginal = self.curve.value(current)?;
                if marginal < 2.0 * EPS {
                    return Ok(0.0);
                }
                let rate = continuous_rate(
                    marginal,
                    self.year_fraction(current, current + step),
                );
                factor *= continuous_compounding(
                    rate,
                    self.year_fraction(current, stop),
                );
                Ok(factor)
            }
            _ => {
                if start == stop {
                    return Ok(1.0);
                }
                let rate = self.compounding_rate(start, stop)?;
                Ok(continuous_compounding(
                    rate,
                    self.year_fraction(start, stop),
                ))
            }
        }
    }

    /// Average intensity over `[start, stop]` (credit analogue of the
    /// zero rate).
    fn compounding_rate(&self, start: Date, stop: Date) -> Result<Real> {
        let origin = self.origin();
        match self.storage {
            CreditStorage::FlatIntensity => {
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
            CreditStorage::HazardRate => {
                if start == stop {
                    return self.curve.value(start);
                }
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
            _ => {
                let (start, stop) = if start == stop {
                    if start == origin {
                        // intensity proxy at origin: use the first knot
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
                let factor = self.compounding_factor(start, stop)?;
                Ok(continuous_rate(
                    factor,
                    self.year_fraction(start, stop),
                ))
            }
        }
    }

    // ── Public queries ───────────────────────────────────────────────────

    /// Survival probability `S(start, stop)`.
    pub fn survival_probability(&self, start: Date, stop: Date) -> Result<Probability> {
        self.compounding_factor(start, stop)
    }

    /// Cumulative default probability `1 − S(start, stop)`.
    pub fn default_probability(&self, start: Date, stop: Date) -> Result<Probability> {
        Ok(1.0 - self.survival_probability(start, stop)?)
    }

    /// Average default intensity `λ(start, stop)` such that
    /// `S(start, stop) = exp(−λ·τ(start, stop))`.
    pub fn flat_intensity(&self, start: Date, stop: Date) -> Result<Real> {
        self.compounding_rate(start, stop)
    }

    /// Instantaneous hazard rate at `t`: the flat intensity over the knot
    /// interval containing `t`.
    pub fn hazard_rate(&self, t: Date) -> Result<Real> {
        if self.storage == CreditStorage::HazardRate {
            return self.curve.value(t);
        }
        let first = self.curve.first();
        let last = self.curve.last();
        if self.domain().len() < 2 || last - TIME_SHIFT <= first {
            return self.flat_intensity(t.max(first), t.max(first) + TIME_SHIFT);
        }
        if t < first {
            return self.hazard_rate(first);
        }
        if last <= t {
            if self.storage.is_marginal() {
                return self.flat_intensity(last, last + TIME_SHIFT);
            }
            return self.hazard_rate(last - TIME_SHIFT);
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
        self.flat_intensity(previous, follow)
    }
}

//! FX forward curves and the currency-pair container.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dcf_core::{ensure_kind, errors::Result, Error, Real};
use dcf_time::Date;

use crate::forward_curve::ForwardCurve;
use crate::rate_curve::InterestRateCurve;
use crate::sources::ForwardSource;

/// An ISO-style currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// A currency from its code.
    pub fn new(code: impl Into<String>) -> Self {
        Currency(code.into())
    }

    /// The currency code.
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Currency::new(code)
    }
}

/// A forward curve for a currency pair, extrapolating beyond its last
/// knot with the interest-rate differential:
/// `F(T) = F(tₙ) · df_dom(tₙ, T) / df_for(tₙ, T)`.
#[derive(Debug, Clone)]
pub struct FxForwardCurve {
    curve: ForwardCurve,
    domestic: Arc<InterestRateCurve>,
    foreign: Arc<InterestRateCurve>,
}

impl FxForwardCurve {
    /// Build an FX forward curve from observed forward rates.
    pub fn new(
        domain: &[Date],
        data: &[Real],
        domestic: Arc<InterestRateCurve>,
        foreign: Arc<InterestRateCurve>,
    ) -> Result<Self> {
        Ok(Self {
            curve: ForwardCurve::new(domain, data)?,
            domestic,
            foreign,
        })
    }

    /// A single-knot curve from the spot rate at the domestic curve's
    /// origin.
    pub fn from_spot(
        spot: Real,
        domestic: Arc<InterestRateCurve>,
        foreign: Arc<InterestRateCurve>,
    ) -> Result<Self> {
        let origin = domestic.origin();
        Self::new(&[origin], &[spot], domestic, foreign)
    }

    /// The domestic discount curve.
    pub fn domestic_curve(&self) -> &Arc<InterestRateCurve> {
        &self.domestic
    }

    /// The foreign discount curve.
    pub fn foreign_curve(&self) -> &Arc<InterestRateCurve> {
        &self.foreign
    }

    /// FX forward rate at `value_date`.
    pub fn forward_price(&self, value_date: Date) -> Result<Real> {
        let last = self.curve.curve().last();
        if value_date <= last {
            return self.curve.forward_price(value_date);
        }
        let price = self.curve.forward_price(last)?;
        let dom = self.domestic.discount_factor(last, value_date)?;
        let for_ = self.foreign.discount_factor(last, value_date)?;
        Ok(price / for_ * dom)
    }
}

impl ForwardSource for FxForwardCurve {
    fn forward_value(&self, date: Date) -> Result<Real> {
        self.forward_price(date)
    }
}

/// A registry of currency-pair forward curves that triangulates every
/// cross pair through a designated base currency.
#[derive(Debug)]
pub struct FxContainer {
    base: Currency,
    domestic_curve: Arc<InterestRateCurve>,
    curves: HashMap<(Currency, Currency), FxForwardCurve>,
}

impl FxContainer {
    /// A container with `base` as its triangulation currency and
    /// `domestic_curve` for discounting in the base currency.
    pub fn new(base: Currency, domestic_curve: Arc<InterestRateCurve>) -> Result<Self> {
        let mut container = Self {
            base: base.clone(),
            domestic_curve: domestic_curve.clone(),
            curves: HashMap::new(),
        };
        container.add(base, domestic_curve, 1.0)?;
        Ok(container)
    }

    /// The base currency.
    pub fn base(&self) -> &Currency {
        &self.base
    }

    /// Register a foreign currency with its discount curve and the spot
    /// rate against the base currency, creating all cross curves.
    pub fn add(
        &mut self,
        foreign_currency: Currency,
        foreign_curve: Arc<InterestRateCurve>,
        fx_spot: Real,
    ) -> Result<()> {
        ensure_kind!(
            Domain,
            fx_spot > 0.0,
            "fx spot must be positive, got {fx_spot}"
        );
        let origin = self.domestic_curve.origin();

        self.curves.insert(
            (self.base.clone(), foreign_currency.clone()),
            FxForwardCurve::from_spot(
                fx_spot,
                self.domestic_curve.clone(),
                foreign_curve.clone(),
            )?,
        );
        self.curves.insert(
            (foreign_currency.clone(), self.base.clone()),
            FxForwardCurve::from_spot(
                1.0 / fx_spot,
                self.domestic_curve.clone(),
                foreign_curve.clone(),
            )?,
        );

        // triangulate cross pairs through the base currency
        let crosses: Vec<(Currency, Real)> = self
            .curves
            .iter()
            .filter(|((d, s), _)| *s == self.base && *d != foreign_currency && *d != self.base)
            .map(|((d, _), curve)| {
                let spot_d_base = curve.forward_price(origin)?;
                Ok((d.clone(), spot_d_base * fx_spot))
            })
            .collect::<Result<_>>()?;

        for (d, triangulated) in crosses {
            let d_curve = self
                .curves
                .get(&(self.base.clone(), d.clone()))
                .map(|c| c.foreign_curve().clone())
                .unwrap_or_else(|| self.domestic_curve.clone());
            self.curves.insert(
                (d.clone(), foreign_currency.clone()),
                FxForwardCurve::from_spot(
                    triangulated,
                    d_curve.clone(),
                    foreign_curve.clone(),
                )?,
            );
            self.curves.insert(
                (foreign_currency.clone(), d),
                FxForwardCurve::from_spot(
                    1.0 / triangulated,
                    foreign_curve.clone(),
                    d_curve,
                )?,
            );
        }
        Ok(())
    }

    /// The forward curve for a currency pair.
    pub fn get(&self, domestic: &Currency, foreign: &Currency) -> Result<&FxForwardCurve> {
        self.curves
            .get(&(domestic.clone(), foreign.clone()))
            .ok_or_else(|| {
                Error::MissingCurve(format!(
                    "no fx curve registered for pair {domestic}/{foreign}"
                ))
            })
    }

    /// FX forward rate for a pair at `value_date`.
    pub fn forward_price(
        &self,
        domestic: &Currency,
        foreign: &Currency,
        value_date: Date,
    ) -> Result<Real> {
        self.get(domestic, foreign)?.forward_price(value_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn flat_curve(rate: f64) -> Arc<InterestRateCurve> {
        Arc::new(
            InterestRateCurve::zero_rates(&[Date::new(0.0)], &[rate]).unwrap(),
        )
    }

    #[test]
    fn fx_forward_grows_with_rate_differential() {
        let dom = flat_curve(0.02);
        let for_ = flat_curve(0.01);
        let fx =
            FxForwardCurve::from_spot(1.2, dom, for_).unwrap();
        let spot = fx.forward_price(Date::new(0.0)).unwrap();
        assert_abs_diff_eq!(spot, 1.2, epsilon = 1e-12);
        // beyond the (single) knot: F = spot · df_dom / df_for, so the
        // higher domestic rate pulls the forward down by 1% per year
        let fwd = fx.forward_price(Date::new(1.0)).unwrap();
        assert_abs_diff_eq!(fwd, 1.2 * (-0.01f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn container_triangulates_crosses() {
        let usd = Currency::from("USD");
        let eur = Currency::from("EUR");
        let gbp = Currency::from("GBP");

        let mut container = FxContainer::new(usd.clone(), flat_curve(0.02)).unwrap();
        container.add(eur.clone(), flat_curve(0.01), 1.2).unwrap();
        container.add(gbp.clone(), flat_curve(0.015), 0.8).unwrap();

        let today = Date::new(0.0);
        assert_abs_diff_eq!(
            container.forward_price(&usd, &eur, today).unwrap(),
            1.2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            container.forward_price(&eur, &usd, today).unwrap(),
            1.0 / 1.2,
            epsilon = 1e-12
        );
        // cross rate EUR→GBP through USD: (EUR→USD)·(USD→GBP)
        let cross = container.forward_price(&eur, &gbp, today).unwrap();
        assert_abs_diff_eq!(cross, (1.0 / 1.2) * 0.8, epsilon = 1e-12);
    }

    #[test]
    fn missing_pair_is_missing_curve() {
        let usd = Currency::from("USD");
        let jpy = Currency::from("JPY");
        let container = FxContainer::new(usd.clone(), flat_curve(0.02)).unwrap();
        assert!(matches!(
            container.forward_price(&usd, &jpy, Date::new(0.0)),
            Err(Error::MissingCurve(_))
        ));
    }
}

//! Generic interpolated real-valued function with curve algebra.

use dcf_core::{ensure_kind, errors::Result, Error, Real};
use dcf_math::{PiecewiseInterpolator, Scheme};

/// A named pair of (domain, values) under an interpolation scheme.
///
/// Arithmetic between curves produces a new curve sampled on the sorted
/// union of both domains, re-interpolated under the left operand's scheme.
#[derive(Debug, Clone)]
pub struct Curve {
    xs: Vec<Real>,
    ys: Vec<Real>,
    scheme: Scheme,
    interp: PiecewiseInterpolator,
}

impl Curve {
    /// Build a curve from unsorted `(x, y)` samples.
    ///
    /// # Errors
    /// [`Error::Shape`] on length mismatch, [`Error::Domain`] on an empty
    /// or non-strictly-increasing grid (after sorting, duplicates remain
    /// invalid) or values a log-based scheme cannot represent.
    pub fn new(xs: &[Real], ys: &[Real], scheme: Scheme) -> Result<Self> {
        ensure_kind!(
            Shape,
            xs.len() == ys.len(),
            "curve requires equal length domain ({}) and data ({})",
            xs.len(),
            ys.len()
        );
        let mut pairs: Vec<(Real, Real)> =
            xs.iter().copied().zip(ys.iter().copied()).collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let xs: Vec<Real> = pairs.iter().map(|p| p.0).collect();
        let ys: Vec<Real> = pairs.iter().map(|p| p.1).collect();
        let interp = scheme.build(&xs, &ys)?;
        Ok(Self {
            xs,
            ys,
            scheme,
            interp,
        })
    }

    /// Build with the default (linear) scheme.
    pub fn linear(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Self::new(xs, ys, Scheme::linear())
    }

    /// Evaluate the curve at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        self.interp.value(x)
    }

    /// The sorted knot grid.
    pub fn domain(&self) -> &[Real] {
        &self.xs
    }

    /// The knot values.
    pub fn values(&self) -> &[Real] {
        &self.ys
    }

    /// The interpolation scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Set (or add) the knot at `x`, rebuilding the interpolator.
    pub fn insert(&mut self, x: Real, y: Real) -> Result<()> {
        match self.xs.binary_search_by(|xi| xi.total_cmp(&x)) {
            Ok(i) => self.ys[i] = y,
            Err(i) => {
                self.xs.insert(i, x);
                self.ys.insert(i, y);
            }
        }
        self.interp = self.scheme.build(&self.xs, &self.ys)?;
        Ok(())
    }

    /// A copy of the curve with its domain shifted by `delta`.
    pub fn shifted(&self, delta: Real) -> Result<Curve> {
        if delta == 0.0 {
            return Ok(self.clone());
        }
        let xs: Vec<Real> = self.xs.iter().map(|x| x + delta).collect();
        Curve::new(&xs, &self.ys, self.scheme)
    }

    fn combine<F>(&self, other: &Curve, op: F) -> Result<Curve>
    where
        F: Fn(Real, Real) -> Real,
    {
        let mut xs: Vec<Real> = self
            .xs
            .iter()
            .chain(other.xs.iter())
            .copied()
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();
        let mut ys = Vec::with_capacity(xs.len());
        for &x in &xs {
            ys.push(op(self.value(x)?, other.value(x)?));
        }
        Curve::new(&xs, &ys, self.scheme)
    }

    /// Pointwise sum on the union grid.
    pub fn add(&self, other: &Curve) -> Result<Curve> {
        self.combine(other, |a, b| a + b)
    }

    /// Pointwise difference on the union grid.
    pub fn sub(&self, other: &Curve) -> Result<Curve> {
        self.combine(other, |a, b| a - b)
    }

    /// Pointwise product on the union grid.
    pub fn mul(&self, other: &Curve) -> Result<Curve> {
        self.combine(other, |a, b| a * b)
    }

    /// Pointwise quotient on the union grid.
    ///
    /// # Errors
    /// [`Error::Domain`] if the divisor curve samples to zero anywhere on
    /// the union grid.
    pub fn div(&self, other: &Curve) -> Result<Curve> {
        let mut xs: Vec<Real> = self
            .xs
            .iter()
            .chain(other.xs.iter())
            .copied()
            .collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs.dedup();
        for &x in &xs {
            if other.value(x)? == 0.0 {
                return Err(Error::Domain(format!(
                    "division by a curve with zero value at {x}"
                )));
            }
        }
        self.combine(other, |a, b| a / b)
    }
}

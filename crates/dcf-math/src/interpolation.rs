//! Piecewise 1-D interpolation over a strictly sorted knot grid.
//!
//! Every interpolator is built from `(xs, ys)` and answers queries on the
//! whole real line; what happens outside the knot range is part of each
//! scheme's definition (constant schemes clamp, linear schemes
//! extrapolate, splines evaluate the boundary polynomial).  The `no`
//! scheme is defined only at the knots and fails elsewhere.
//!
//! Values at knots are reproduced exactly, including for the transformed
//! (log, squared) schemes.

use dcf_core::{ensure, ensure_kind, errors::Result, Error, Real};
use nalgebra::{DMatrix, DVector};

// ── Knot grid ────────────────────────────────────────────────────────────────

/// A validated, strictly increasing knot grid with values.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    pub xs: Vec<Real>,
    pub ys: Vec<Real>,
}

impl Grid {
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        ensure_kind!(
            Shape,
            xs.len() == ys.len(),
            "xs and ys must have the same length, got {} and {}",
            xs.len(),
            ys.len()
        );
        ensure!(!xs.is_empty(), "need at least 1 knot");
        ensure!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "knots must be strictly increasing"
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn len(&self) -> usize {
        self.xs.len()
    }

    /// Exact knot lookup.
    fn knot_index(&self, x: Real) -> Option<usize> {
        self.xs.binary_search_by(|xi| xi.total_cmp(&x)).ok()
    }

    /// Index `i` of the interval `[x_i, x_{i+1}]` used for evaluation at
    /// `x`, clamped to the boundary intervals so evaluation extrapolates.
    fn bracket(&self, x: Real) -> usize {
        let n = self.len();
        if n < 2 || x <= self.xs[0] {
            return 0;
        }
        if x >= self.xs[n - 1] {
            return n - 2;
        }
        // binary search for the greatest i with xs[i] <= x
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Index of the greatest knot `<=` x, clamped to the grid.
    fn left_index(&self, x: Real) -> usize {
        let n = self.len();
        if x <= self.xs[0] {
            return 0;
        }
        let mut i = self.bracket(x);
        if i + 1 < n && self.xs[i + 1] <= x {
            i += 1;
        }
        i
    }

    /// Index of the least knot `>=` x, clamped to the grid.
    fn right_index(&self, x: Real) -> usize {
        let n = self.len();
        if x >= self.xs[n - 1] {
            return n - 1;
        }
        let i = self.bracket(x);
        if self.xs[i] >= x {
            i
        } else {
            i + 1
        }
    }
}

// ── Constant-family schemes ──────────────────────────────────────────────────

/// Constant value everywhere, regardless of the query point.
#[derive(Debug, Clone)]
pub struct Flat {
    y: Real,
}

impl Flat {
    /// A flat interpolator at level `y`.
    pub fn new(y: Real) -> Self {
        Self { y }
    }

    /// Evaluate at `x` (the argument is ignored).
    pub fn value(&self, _x: Real) -> Result<Real> {
        Ok(self.y)
    }
}

/// Defined only at the knots; any other query is a domain error.
#[derive(Debug, Clone)]
pub struct KnotsOnly {
    grid: Grid,
}

impl KnotsOnly {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`; fails off the knots.
    pub fn value(&self, x: Real) -> Result<Real> {
        match self.grid.knot_index(x) {
            Some(i) => Ok(self.grid.ys[i]),
            None => Err(Error::Domain(format!(
                "no interpolation defined at {x}"
            ))),
        }
    }
}

/// Knot values at the knots, zero everywhere else.
#[derive(Debug, Clone)]
pub struct ZeroFill {
    grid: Grid,
}

impl ZeroFill {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        Ok(match self.grid.knot_index(x) {
            Some(i) => self.grid.ys[i],
            None => 0.0,
        })
    }
}

/// Step function using the value at the greatest knot `<=` x
/// (left-continuous constant interpolation).
#[derive(Debug, Clone)]
pub struct LeftConstant {
    grid: Grid,
}

impl LeftConstant {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        Ok(self.grid.ys[self.grid.left_index(x)])
    }
}

/// Step function using the value at the least knot `>=` x.
#[derive(Debug, Clone)]
pub struct RightConstant {
    grid: Grid,
}

impl RightConstant {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        Ok(self.grid.ys[self.grid.right_index(x)])
    }
}

/// Value at the nearest knot; ties resolve to the left knot.
#[derive(Debug, Clone)]
pub struct Nearest {
    grid: Grid,
}

impl Nearest {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        let g = &self.grid;
        if let Some(i) = g.knot_index(x) {
            return Ok(g.ys[i]);
        }
        if g.len() == 1 || x <= g.xs[0] {
            return Ok(g.ys[0]);
        }
        if x >= g.xs[g.len() - 1] {
            return Ok(g.ys[g.len() - 1]);
        }
        let i = g.bracket(x);
        // tie goes to the left knot
        if (x - g.xs[i]) / (g.xs[i + 1] - g.xs[i]) <= 0.5 {
            Ok(g.ys[i])
        } else {
            Ok(g.ys[i + 1])
        }
    }
}

// ── Linear-family schemes ────────────────────────────────────────────────────

/// Piecewise linear interpolation with linear extrapolation beyond the
/// boundary knots.
#[derive(Debug, Clone)]
pub struct Linear {
    grid: Grid,
}

impl Linear {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Ok(Self {
            grid: Grid::new(xs, ys)?,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        let g = &self.grid;
        if let Some(i) = g.knot_index(x) {
            return Ok(g.ys[i]);
        }
        if g.len() == 1 {
            return Ok(g.ys[0]);
        }
        let i = g.bracket(x);
        let slope = (g.ys[i + 1] - g.ys[i]) / (g.xs[i + 1] - g.xs[i]);
        Ok(g.ys[i] + slope * (x - g.xs[i]))
    }
}

fn positive_values(ys: &[Real]) -> Result<()> {
    ensure!(
        ys.iter().all(|&y| y > 0.0),
        "log interpolation requires positive values"
    );
    Ok(())
}

/// `exp(linear(ln y))` — linear interpolation of log values.
#[derive(Debug, Clone)]
pub struct LogLinear {
    inner: Linear,
    ys: Vec<Real>,
}

impl LogLinear {
    /// Build from knots and (strictly positive) values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        positive_values(ys)?;
        let log_ys: Vec<Real> = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            inner: Linear::new(xs, &log_ys)?,
            ys: ys.to_vec(),
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if let Some(i) = self.inner.grid.knot_index(x) {
            return Ok(self.ys[i]);
        }
        Ok(self.inner.value(x)?.exp())
    }
}

/// `exp(constant(ln y))` — left-constant interpolation of log values.
#[derive(Debug, Clone)]
pub struct LogConstant {
    inner: LeftConstant,
    ys: Vec<Real>,
}

impl LogConstant {
    /// Build from knots and (strictly positive) values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        positive_values(ys)?;
        let log_ys: Vec<Real> = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            inner: LeftConstant::new(xs, &log_ys)?,
            ys: ys.to_vec(),
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if let Some(i) = self.inner.grid.knot_index(x) {
            return Ok(self.ys[i]);
        }
        Ok(self.inner.value(x)?.exp())
    }
}

/// Common implementation of the `*rate` log schemes: the grid stores the
/// implied constant rate `−ln(y)/x` and evaluation recovers
/// `exp(−rate(x)·x)`.  A knot at `x = 0` carries no rate information and
/// its value is kept aside.
#[derive(Debug, Clone)]
struct LogRateData {
    /// Knot at x = 0, if present (its implied rate is undefined).
    y_at_zero: Option<Real>,
    /// Original values at the non-zero knots, for exact knot answers.
    ys: Vec<Real>,
}

impl LogRateData {
    fn split(xs: &[Real], ys: &[Real]) -> Result<(Self, Vec<Real>, Vec<Real>)> {
        positive_values(ys)?;
        let mut y_at_zero = None;
        let mut rate_xs = Vec::with_capacity(xs.len());
        let mut rates = Vec::with_capacity(xs.len());
        let mut kept = Vec::with_capacity(xs.len());
        for (&x, &y) in xs.iter().zip(ys) {
            if x == 0.0 {
                y_at_zero = Some(y);
            } else {
                rate_xs.push(x);
                rates.push(-y.ln() / x);
                kept.push(y);
            }
        }
        ensure!(
            !rate_xs.is_empty(),
            "log rate interpolation requires a knot away from zero"
        );
        Ok((
            Self {
                y_at_zero,
                ys: kept,
            },
            rate_xs,
            rates,
        ))
    }
}

/// `exp(−linear(−ln y / x) · x)` — log-linear in the implied rate, with a
/// special-cased value at `x = 0`.
#[derive(Debug, Clone)]
pub struct LogLinearRate {
    inner: Linear,
    data: LogRateData,
}

impl LogLinearRate {
    /// Build from knots and (strictly positive) values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        let (data, rate_xs, rates) = LogRateData::split(xs, ys)?;
        Ok(Self {
            inner: Linear::new(&rate_xs, &rates)?,
            data,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if x == 0.0 {
            if let Some(y) = self.data.y_at_zero {
                return Ok(y);
            }
            // limit exp(-r·x·x) as x → 0
            return Ok(1.0);
        }
        if let Some(i) = self.inner.grid.knot_index(x) {
            return Ok(self.data.ys[i]);
        }
        Ok((-self.inner.value(x)? * x).exp())
    }
}

/// `exp(−constant(−ln y / x) · x)` — left-constant in the implied rate.
#[derive(Debug, Clone)]
pub struct LogConstantRate {
    inner: LeftConstant,
    data: LogRateData,
}

impl LogConstantRate {
    /// Build from knots and (strictly positive) values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        let (data, rate_xs, rates) = LogRateData::split(xs, ys)?;
        Ok(Self {
            inner: LeftConstant::new(&rate_xs, &rates)?,
            data,
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if x == 0.0 {
            if let Some(y) = self.data.y_at_zero {
                return Ok(y);
            }
            return Ok(1.0);
        }
        if let Some(i) = self.inner.grid.knot_index(x) {
            return Ok(self.data.ys[i]);
        }
        Ok((-self.inner.value(x)? * x).exp())
    }
}

/// `√(linear(y²))` — linear interpolation of squared values (variance
/// interpolation for volatilities).
#[derive(Debug, Clone)]
pub struct SquaredLinear {
    inner: Linear,
    ys: Vec<Real>,
}

impl SquaredLinear {
    /// Build from knots and values.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        let sq: Vec<Real> = ys.iter().map(|y| y * y).collect();
        Ok(Self {
            inner: Linear::new(xs, &sq)?,
            ys: ys.to_vec(),
        })
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if let Some(i) = self.inner.grid.knot_index(x) {
            return Ok(self.ys[i]);
        }
        Ok(self.inner.value(x)?.max(0.0).sqrt())
    }
}

// ── Cubic spline ─────────────────────────────────────────────────────────────

/// Boundary condition of a [`CubicSpline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplineBoundary {
    /// Second derivative vanishes at both ends.
    Natural,
    /// Third derivatives of the two outermost polynomials agree
    /// (not-a-knot).
    NotAKnot,
}

/// Cubic spline through all knots; queries beyond the boundary knots
/// evaluate the boundary polynomial.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    grid: Grid,
    /// Per-interval Hermite-like coefficients `(c1, c2)` such that
    /// `f(x) = (1−t)·y_i + t·y_{i+1} + t(1−t)(c1(1−t) + c2·t)` with
    /// `t = (x − x_i)/(x_{i+1} − x_i)`.
    coefficients: Vec<(Real, Real)>,
}

impl CubicSpline {
    /// Build a cubic spline with the given boundary condition.
    pub fn new(xs: &[Real], ys: &[Real], boundary: SplineBoundary) -> Result<Self> {
        let grid = Grid::new(xs, ys)?;
        let n = grid.len();
        match boundary {
            SplineBoundary::Natural => {
                ensure!(n >= 2, "cubic spline needs at least 2 knots")
            }
            SplineBoundary::NotAKnot => {
                ensure!(n >= 3, "not-a-knot spline needs at least 3 knots")
            }
        }
        let coefficients = Self::solve_coefficients(&grid, boundary)?;
        Ok(Self { grid, coefficients })
    }

    /// First-derivative values at the knots solve a tridiagonal-like
    /// system enforcing a continuous second derivative.
    fn solve_coefficients(
        grid: &Grid,
        boundary: SplineBoundary,
    ) -> Result<Vec<(Real, Real)>> {
        let n = grid.len();
        let x = &grid.xs;
        let y = &grid.ys;

        let mut mat = DMatrix::<Real>::zeros(n, n);
        let mut rhs = DVector::<Real>::zeros(n);

        for i in 1..n - 1 {
            mat[(i, i - 1)] = 1.0 / (x[i] - x[i - 1]);
            mat[(i, i + 1)] = 1.0 / (x[i + 1] - x[i]);
            mat[(i, i)] = 2.0 * (mat[(i, i - 1)] + mat[(i, i + 1)]);
            rhs[i] = 3.0
                * ((y[i] - y[i - 1]) / ((x[i] - x[i - 1]) * (x[i] - x[i - 1]))
                    + (y[i + 1] - y[i])
                        / ((x[i + 1] - x[i]) * (x[i + 1] - x[i])));
        }

        match boundary {
            SplineBoundary::NotAKnot => {
                mat[(0, 0)] = 1.0 / ((x[1] - x[0]) * (x[1] - x[0]));
                mat[(0, 2)] = -1.0 / ((x[2] - x[1]) * (x[2] - x[1]));
                mat[(0, 1)] = mat[(0, 0)] + mat[(0, 2)];
                rhs[0] = 2.0
                    * ((y[1] - y[0]) / (x[1] - x[0]).powi(3)
                        - (y[2] - y[1]) / (x[2] - x[1]).powi(3));

                mat[(n - 1, n - 3)] =
                    1.0 / ((x[n - 2] - x[n - 3]) * (x[n - 2] - x[n - 3]));
                mat[(n - 1, n - 1)] =
                    -1.0 / ((x[n - 1] - x[n - 2]) * (x[n - 1] - x[n - 2]));
                mat[(n - 1, n - 2)] = mat[(n - 1, n - 3)] + mat[(n - 1, n - 1)];
                rhs[n - 1] = 2.0
                    * ((y[n - 2] - y[n - 3]) / (x[n - 2] - x[n - 3]).powi(3)
                        - (y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]).powi(3));
            }
            SplineBoundary::Natural => {
                mat[(0, 0)] = 2.0 / (x[1] - x[0]);
                mat[(0, 1)] = 1.0 / (x[1] - x[0]);
                rhs[0] = 3.0 * (y[1] - y[0]) / ((x[1] - x[0]) * (x[1] - x[0]));

                mat[(n - 1, n - 2)] = 1.0 / (x[n - 1] - x[n - 2]);
                mat[(n - 1, n - 1)] = 2.0 / (x[n - 1] - x[n - 2]);
                rhs[n - 1] = 3.0 * (y[n - 1] - y[n - 2])
                    / ((x[n - 1] - x[n - 2]) * (x[n - 1] - x[n - 2]));
            }
        }

        let k = mat.lu().solve(&rhs).ok_or_else(|| {
            Error::Domain("singular spline coefficient system".into())
        })?;

        let mut coefficients = Vec::with_capacity(n - 1);
        for i in 1..n {
            let h = x[i] - x[i - 1];
            let dy = y[i] - y[i - 1];
            let c1 = k[i - 1] * h - dy;
            let c2 = -k[i] * h + dy;
            coefficients.push((c1, c2));
        }
        Ok(coefficients)
    }

    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        let g = &self.grid;
        if let Some(i) = g.knot_index(x) {
            return Ok(g.ys[i]);
        }
        if g.len() == 1 {
            return Ok(g.ys[0]);
        }
        let i = g.bracket(x);
        let t = (x - g.xs[i]) / (g.xs[i + 1] - g.xs[i]);
        let (c1, c2) = self.coefficients[i];
        Ok((1.0 - t) * g.ys[i]
            + t * g.ys[i + 1]
            + t * (1.0 - t) * (c1 * (1.0 - t) + c2 * t))
    }
}

// ── The sealed union ─────────────────────────────────────────────────────────

/// A constructed interpolator: the sealed union over the scheme catalogue.
#[derive(Debug, Clone)]
pub enum Interpolator {
    /// Constant level everywhere.
    Flat(Flat),
    /// Defined only at the knots.
    No(KnotsOnly),
    /// Knot values at the knots, zero elsewhere.
    Zero(ZeroFill),
    /// Left-constant step function.
    Constant(LeftConstant),
    /// Right-constant step function.
    Right(RightConstant),
    /// Nearest-knot value, ties to the left.
    Nearest(Nearest),
    /// Piecewise linear.
    Linear(Linear),
    /// Linear in log values.
    LogLinear(LogLinear),
    /// Left-constant in log values.
    LogConstant(LogConstant),
    /// Linear in implied rates.
    LogLinearRate(LogLinearRate),
    /// Left-constant in implied rates.
    LogConstantRate(LogConstantRate),
    /// Linear in squared values.
    SquaredLinear(SquaredLinear),
    /// Cubic spline.
    Spline(CubicSpline),
}

impl Interpolator {
    /// Evaluate the interpolator at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        match self {
            Interpolator::Flat(f) => f.value(x),
            Interpolator::No(f) => f.value(x),
            Interpolator::Zero(f) => f.value(x),
            Interpolator::Constant(f) => f.value(x),
            Interpolator::Right(f) => f.value(x),
            Interpolator::Nearest(f) => f.value(x),
            Interpolator::Linear(f) => f.value(x),
            Interpolator::LogLinear(f) => f.value(x),
            Interpolator::LogConstant(f) => f.value(x),
            Interpolator::LogLinearRate(f) => f.value(x),
            Interpolator::LogConstantRate(f) => f.value(x),
            Interpolator::SquaredLinear(f) => f.value(x),
            Interpolator::Spline(f) => f.value(x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const XS: [Real; 4] = [0.0, 1.0, 2.0, 4.0];
    const YS: [Real; 4] = [1.0, 2.0, 3.0, 2.5];

    #[test]
    fn rejects_bad_grids() {
        assert!(matches!(
            Linear::new(&[0.0, 1.0], &[1.0]),
            Err(Error::Shape(_))
        ));
        assert!(Linear::new(&[1.0, 1.0], &[1.0, 2.0]).is_err());
        assert!(Linear::new(&[], &[]).is_err());
    }

    #[test]
    fn knot_exactness_for_every_scheme() {
        let schemes: Vec<Box<dyn Fn(Real) -> Result<Real>>> = vec![
            {
                let f = KnotsOnly::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = ZeroFill::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = LeftConstant::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = RightConstant::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = Nearest::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = Linear::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = LogLinear::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = LogConstant::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = LogLinearRate::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = LogConstantRate::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = SquaredLinear::new(&XS, &YS).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = CubicSpline::new(&XS, &YS, SplineBoundary::Natural).unwrap();
                Box::new(move |x| f.value(x))
            },
            {
                let f = CubicSpline::new(&XS, &YS, SplineBoundary::NotAKnot).unwrap();
                Box::new(move |x| f.value(x))
            },
        ];
        for f in &schemes {
            for (x, y) in XS.iter().zip(YS) {
                assert_eq!(f(*x).unwrap(), y, "knot value mismatch at x={x}");
            }
        }
    }

    #[test]
    fn no_scheme_fails_off_knots() {
        let f = KnotsOnly::new(&XS, &YS).unwrap();
        assert!(matches!(f.value(0.5), Err(Error::Domain(_))));
    }

    #[test]
    fn zero_scheme_fills_zero() {
        let f = ZeroFill::new(&XS, &YS).unwrap();
        assert_eq!(f.value(0.5).unwrap(), 0.0);
        assert_eq!(f.value(-3.0).unwrap(), 0.0);
    }

    #[test]
    fn constant_steps() {
        let f = LeftConstant::new(&XS, &YS).unwrap();
        assert_eq!(f.value(0.5).unwrap(), 1.0);
        assert_eq!(f.value(1.5).unwrap(), 2.0);
        assert_eq!(f.value(-1.0).unwrap(), 1.0);
        assert_eq!(f.value(9.0).unwrap(), 2.5);

        let f = RightConstant::new(&XS, &YS).unwrap();
        assert_eq!(f.value(0.5).unwrap(), 2.0);
        assert_eq!(f.value(1.5).unwrap(), 3.0);
        assert_eq!(f.value(-1.0).unwrap(), 1.0);
        assert_eq!(f.value(9.0).unwrap(), 2.5);
    }

    #[test]
    fn nearest_ties_left() {
        let f = Nearest::new(&[0.0, 1.0], &[10.0, 20.0]).unwrap();
        assert_eq!(f.value(0.4).unwrap(), 10.0);
        assert_eq!(f.value(0.5).unwrap(), 10.0);
        assert_eq!(f.value(0.51).unwrap(), 20.0);
    }

    #[test]
    fn linear_inter_and_extrapolates() {
        let f = Linear::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert_abs_diff_eq!(f.value(0.5).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(f.value(1.5).unwrap(), 2.5, epsilon = 1e-12);
        // extrapolation continues the boundary segments
        assert_abs_diff_eq!(f.value(-1.0).unwrap(), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.value(3.0).unwrap(), 7.0, epsilon = 1e-12);
    }

    #[test]
    fn log_linear_is_geometric() {
        let f = LogLinear::new(&[0.0, 1.0], &[1.0, std::f64::consts::E]).unwrap();
        assert_abs_diff_eq!(
            f.value(0.5).unwrap(),
            std::f64::consts::E.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn log_schemes_reject_non_positive() {
        assert!(LogLinear::new(&[0.0, 1.0], &[1.0, 0.0]).is_err());
        assert!(LogConstant::new(&[0.0, 1.0], &[-1.0, 1.0]).is_err());
        assert!(LogLinearRate::new(&[0.0, 1.0], &[1.0, -0.5]).is_err());
    }

    #[test]
    fn log_linear_rate_matches_flat_discounting() {
        // values from a flat 5% continuous rate: y = exp(-0.05 x)
        let xs: [Real; 3] = [1.0, 2.0, 5.0];
        let ys: Vec<Real> = xs.iter().map(|x| (-0.05 * x).exp()).collect();
        let f = LogLinearRate::new(&xs, &ys).unwrap();
        for x in [0.5, 1.5, 3.0, 7.0] {
            assert_abs_diff_eq!(
                f.value(x).unwrap(),
                (-0.05 * x).exp(),
                epsilon = 1e-12
            );
        }
        // limit towards zero is one
        assert_abs_diff_eq!(f.value(0.0).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn squared_linear_interpolates_variance() {
        let f = SquaredLinear::new(&[0.0, 1.0], &[0.1, 0.3]).unwrap();
        let expected = (0.5 * (0.1f64 * 0.1 + 0.3 * 0.3)).sqrt();
        assert_abs_diff_eq!(f.value(0.5).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn spline_reproduces_line() {
        // a straight line is reproduced by both boundary conditions
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        for b in [SplineBoundary::Natural, SplineBoundary::NotAKnot] {
            let f = CubicSpline::new(&xs, &ys, b).unwrap();
            for x in [0.25, 1.5, 2.75, 3.5, -0.5] {
                assert_abs_diff_eq!(
                    f.value(x).unwrap(),
                    1.0 + 2.0 * x,
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn nak_spline_reproduces_cubic() {
        // not-a-knot reproduces a cubic polynomial exactly
        let p = |x: Real| 0.5 * x * x * x - x * x + 2.0 * x - 1.0;
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys: Vec<Real> = xs.iter().map(|&x| p(x)).collect();
        let f = CubicSpline::new(&xs, &ys, SplineBoundary::NotAKnot).unwrap();
        for x in [0.3, 1.7, 2.2, 3.9, 4.5] {
            assert_abs_diff_eq!(f.value(x).unwrap(), p(x), epsilon = 1e-9);
        }
    }

    #[test]
    fn natural_spline_smooth_interior() {
        let xs: Vec<Real> = (-3..=3).map(|i| i as Real).collect();
        let ys: Vec<Real> = xs.iter().map(|&x| x * x).collect();
        let f = CubicSpline::new(&xs, &ys, SplineBoundary::Natural).unwrap();
        for &x in &[-1.5, -0.5, 0.5, 1.5] {
            assert!((f.value(x).unwrap() - x * x).abs() < 0.05);
        }
    }
}

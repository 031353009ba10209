//! Interpolation scheme selection and piecewise composition.
//!
//! [`InterpolationScheme`] is the closed catalogue of scheme names;
//! [`Scheme`] composes a `(left, mid, right)` triple applied to the same
//! knot data, where `left` governs queries below the first knot and
//! `right` queries above the last.

use std::fmt;
use std::str::FromStr;

use dcf_core::{errors::Result, Error, Real};

use crate::interpolation::{
    CubicSpline, Flat, Interpolator, KnotsOnly, LeftConstant, Linear,
    LogConstant, LogConstantRate, LogLinear, LogLinearRate, Nearest,
    RightConstant, SplineBoundary, SquaredLinear, ZeroFill,
};

/// The closed catalogue of interpolation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterpolationScheme {
    /// Constant at the first knot value, everywhere.
    Flat,
    /// Defined only at the knots.
    No,
    /// Knot values at the knots, zero elsewhere.
    Zero,
    /// Left-constant step function.
    Constant,
    /// Right-constant step function.
    Right,
    /// Nearest-knot value, ties to the left.
    Nearest,
    /// Piecewise linear.
    Linear,
    /// Linear in log values.
    LogLinear,
    /// Left-constant in log values.
    LogConstant,
    /// Linear in implied rates `−ln(y)/x`.
    LogLinearRate,
    /// Left-constant in implied rates.
    LogConstantRate,
    /// Linear in squared values.
    SquaredLinear,
    /// Natural cubic spline.
    Spline,
    /// Not-a-knot cubic spline.
    NakSpline,
}

impl InterpolationScheme {
    /// Construct an [`Interpolator`] from knot data under this scheme.
    pub fn build(self, xs: &[Real], ys: &[Real]) -> Result<Interpolator> {
        Ok(match self {
            InterpolationScheme::Flat => {
                Interpolator::Flat(Flat::new(ys.first().copied().unwrap_or(0.0)))
            }
            InterpolationScheme::No => Interpolator::No(KnotsOnly::new(xs, ys)?),
            InterpolationScheme::Zero => Interpolator::Zero(ZeroFill::new(xs, ys)?),
            InterpolationScheme::Constant => {
                Interpolator::Constant(LeftConstant::new(xs, ys)?)
            }
            InterpolationScheme::Right => {
                Interpolator::Right(RightConstant::new(xs, ys)?)
            }
            InterpolationScheme::Nearest => {
                Interpolator::Nearest(Nearest::new(xs, ys)?)
            }
            InterpolationScheme::Linear => Interpolator::Linear(Linear::new(xs, ys)?),
            InterpolationScheme::LogLinear => {
                Interpolator::LogLinear(LogLinear::new(xs, ys)?)
            }
            InterpolationScheme::LogConstant => {
                Interpolator::LogConstant(LogConstant::new(xs, ys)?)
            }
            InterpolationScheme::LogLinearRate => {
                Interpolator::LogLinearRate(LogLinearRate::new(xs, ys)?)
            }
            InterpolationScheme::LogConstantRate => {
                Interpolator::LogConstantRate(LogConstantRate::new(xs, ys)?)
            }
            InterpolationScheme::SquaredLinear => {
                Interpolator::SquaredLinear(SquaredLinear::new(xs, ys)?)
            }
            InterpolationScheme::Spline => Interpolator::Spline(CubicSpline::new(
                xs,
                ys,
                SplineBoundary::Natural,
            )?),
            InterpolationScheme::NakSpline => Interpolator::Spline(
                CubicSpline::new(xs, ys, SplineBoundary::NotAKnot)?,
            ),
        })
    }

    /// The scheme's canonical name.
    pub fn name(self) -> &'static str {
        match self {
            InterpolationScheme::Flat => "flat",
            InterpolationScheme::No => "no",
            InterpolationScheme::Zero => "zero",
            InterpolationScheme::Constant => "constant",
            InterpolationScheme::Right => "right",
            InterpolationScheme::Nearest => "nearest",
            InterpolationScheme::Linear => "linear",
            InterpolationScheme::LogLinear => "loglinear",
            InterpolationScheme::LogConstant => "logconstant",
            InterpolationScheme::LogLinearRate => "loglinearrate",
            InterpolationScheme::LogConstantRate => "logconstantrate",
            InterpolationScheme::SquaredLinear => "squaredlinear",
            InterpolationScheme::Spline => "spline",
            InterpolationScheme::NakSpline => "nak_spline",
        }
    }
}

impl fmt::Display for InterpolationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "flat" => InterpolationScheme::Flat,
            "no" => InterpolationScheme::No,
            "zero" => InterpolationScheme::Zero,
            "constant" | "left" => InterpolationScheme::Constant,
            "right" => InterpolationScheme::Right,
            "nearest" => InterpolationScheme::Nearest,
            "linear" => InterpolationScheme::Linear,
            "loglinear" => InterpolationScheme::LogLinear,
            "logconstant" => InterpolationScheme::LogConstant,
            "loglinearrate" => InterpolationScheme::LogLinearRate,
            "logconstantrate" => InterpolationScheme::LogConstantRate,
            "squaredlinear" => InterpolationScheme::SquaredLinear,
            "spline" | "natural_spline" => InterpolationScheme::Spline,
            "nak_spline" => InterpolationScheme::NakSpline,
            other => {
                return Err(Error::Config(format!(
                    "unknown interpolation scheme '{other}'"
                )))
            }
        })
    }
}

/// A `(left, mid, right)` scheme triple applied to the same knot data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scheme {
    /// Scheme consulted below the first knot.
    pub left: InterpolationScheme,
    /// Scheme consulted between the first and last knot.
    pub mid: InterpolationScheme,
    /// Scheme consulted above the last knot.
    pub right: InterpolationScheme,
}

impl Scheme {
    /// A triple with explicit left/mid/right schemes.
    pub fn new(
        left: InterpolationScheme,
        mid: InterpolationScheme,
        right: InterpolationScheme,
    ) -> Self {
        Self { left, mid, right }
    }

    /// The same scheme on the whole real line.
    pub fn uniform(scheme: InterpolationScheme) -> Self {
        Self::new(scheme, scheme, scheme)
    }

    /// Linear inside, constant extrapolation.
    pub fn linear() -> Self {
        Self::new(
            InterpolationScheme::Constant,
            InterpolationScheme::Linear,
            InterpolationScheme::Constant,
        )
    }

    /// Log-linear inside, log-constant extrapolation.
    pub fn log_linear() -> Self {
        Self::new(
            InterpolationScheme::LogConstant,
            InterpolationScheme::LogLinear,
            InterpolationScheme::LogConstant,
        )
    }

    /// Log-linear in implied rates inside, log-constant-rate extrapolation.
    pub fn log_linear_rate() -> Self {
        Self::new(
            InterpolationScheme::LogConstantRate,
            InterpolationScheme::LogLinearRate,
            InterpolationScheme::LogConstantRate,
        )
    }

    /// Left-constant everywhere.
    pub fn constant() -> Self {
        Self::uniform(InterpolationScheme::Constant)
    }

    /// Zero fill inside, linear towards the knots, constant beyond.
    pub fn zero_linear() -> Self {
        Self::new(
            InterpolationScheme::Zero,
            InterpolationScheme::Linear,
            InterpolationScheme::Constant,
        )
    }

    /// Build the composite interpolator from knot data.
    pub fn build(&self, xs: &[Real], ys: &[Real]) -> Result<PiecewiseInterpolator> {
        let mid = self.mid.build(xs, ys)?;
        let left = if self.left == self.mid {
            None
        } else {
            Some(self.left.build(xs, ys)?)
        };
        let right = if self.right == self.mid {
            None
        } else {
            Some(self.right.build(xs, ys)?)
        };
        let (x_min, x_max) = match (xs.first(), xs.last()) {
            (Some(&a), Some(&b)) => (a, b),
            _ => (0.0, 0.0),
        };
        Ok(PiecewiseInterpolator {
            left,
            mid,
            right,
            x_min,
            x_max,
        })
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Scheme::linear()
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.left == self.mid && self.right == self.mid {
            write!(f, "{}", self.mid)
        } else {
            write!(f, "{}_{}_{}", self.left, self.mid, self.right)
        }
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // single scheme names may themselves contain underscores
        // (nak_spline, natural_spline)
        if let Ok(scheme) = s.parse::<InterpolationScheme>() {
            return Ok(Scheme::uniform(scheme));
        }
        let parts: Vec<&str> = s.split('_').filter(|p| !p.is_empty()).collect();
        match parts.as_slice() {
            [mid] => Ok(Scheme::uniform(mid.parse()?)),
            [left, mid, right] => {
                Ok(Scheme::new(left.parse()?, mid.parse()?, right.parse()?))
            }
            _ => Err(Error::Config(format!(
                "expected 'mid' or 'left_mid_right' scheme name, got '{s}'"
            ))),
        }
    }
}

/// A composite interpolator consulting left/mid/right members depending on
/// where the query falls relative to the knot range.
#[derive(Debug, Clone)]
pub struct PiecewiseInterpolator {
    left: Option<Interpolator>,
    mid: Interpolator,
    right: Option<Interpolator>,
    x_min: Real,
    x_max: Real,
}

impl PiecewiseInterpolator {
    /// Evaluate at `x`.
    pub fn value(&self, x: Real) -> Result<Real> {
        if x < self.x_min {
            if let Some(left) = &self.left {
                return left.value(x);
            }
        } else if x > self.x_max {
            if let Some(right) = &self.right {
                return right.value(x);
            }
        }
        self.mid.value(x)
    }

    /// Lower bound of the knot range.
    pub fn x_min(&self) -> Real {
        self.x_min
    }

    /// Upper bound of the knot range.
    pub fn x_max(&self) -> Real {
        self.x_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn parse_names() {
        assert_eq!(
            "loglinearrate".parse::<InterpolationScheme>().unwrap(),
            InterpolationScheme::LogLinearRate
        );
        assert_eq!(
            "left".parse::<InterpolationScheme>().unwrap(),
            InterpolationScheme::Constant
        );
        assert!(matches!(
            "cubic-hermite".parse::<InterpolationScheme>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn parse_triple() {
        let s: Scheme = "constant_linear_constant".parse().unwrap();
        assert_eq!(s, Scheme::linear());
        let s: Scheme = "linear".parse().unwrap();
        assert_eq!(s, Scheme::uniform(InterpolationScheme::Linear));
        assert!("a_b".parse::<Scheme>().is_err());
    }

    #[test]
    fn composite_extrapolates_with_sides() {
        // linear inside, constant outside
        let f = Scheme::linear()
            .build(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0])
            .unwrap();
        assert_abs_diff_eq!(f.value(0.5).unwrap(), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(f.value(-5.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.value(10.0).unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_linear_extrapolates_linearly() {
        let f = Scheme::uniform(InterpolationScheme::Linear)
            .build(&[0.0, 1.0], &[0.0, 1.0])
            .unwrap();
        assert_abs_diff_eq!(f.value(2.0).unwrap(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.value(-1.0).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn knots_hit_the_mid_scheme() {
        let f = Scheme::linear()
            .build(&[0.0, 1.0], &[2.0, 3.0])
            .unwrap();
        assert_eq!(f.value(0.0).unwrap(), 2.0);
        assert_eq!(f.value(1.0).unwrap(), 3.0);
    }

    #[test]
    fn display_round_trips() {
        let s = Scheme::log_linear_rate();
        let parsed: Scheme = s.to_string().parse().unwrap();
        assert_eq!(parsed, s);
    }
}

//! Standard-normal distribution helpers.
//!
//! Wraps the `statrs` crate's error function for the CDF.

use std::f64::consts::PI;

use dcf_core::Real;
use statrs::function::erf::erf;

/// The standard normal probability density function.
///
/// `φ(x) = exp(−x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function.
///
/// `Φ(x) = (1 + erf(x/√2)) / 2`
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cdf_symmetry() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
        for x in [0.1, 0.5, 1.0, 2.5] {
            assert_abs_diff_eq!(
                normal_cdf(x) + normal_cdf(-x),
                1.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn cdf_known_values() {
        // Φ(1) and Φ(2) to standard table accuracy
        assert_abs_diff_eq!(normal_cdf(1.0), 0.841_344_746_068_5, epsilon = 1e-9);
        assert_abs_diff_eq!(normal_cdf(2.0), 0.977_249_868_051_8, epsilon = 1e-9);
    }

    #[test]
    fn pdf_is_cdf_derivative() {
        let h = 1e-6;
        for x in [-1.5, 0.0, 0.7, 2.0] {
            let fd = (normal_cdf(x + h) - normal_cdf(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(fd, normal_pdf(x), epsilon = 1e-8);
        }
    }
}

//! 1-D root finding by interval bracketing.

use dcf_core::{errors::Result, Error, Real};

const MAX_ITERATIONS: u32 = 1_000;

/// Find a root of `f` in `[a, b]` by interval halving.
///
/// The function must be locally monotone on the bracket with a sign change
/// between the endpoints; a decreasing `f` is handled by negation.  Returns
/// the bracket midpoint once both the interval width and the function-value
/// spread fall below `precision`.
///
/// # Errors
/// [`Error::RootNotBracketed`] if `f(a)` and `f(b)` have the same sign.
pub fn bracketing<F>(f: F, a: Real, b: Real, precision: Real) -> Result<Real>
where
    F: Fn(Real) -> Result<Real>,
{
    let fa = f(a)?;
    let fb = f(b)?;

    // orient so the function increases along the bracket
    let sign = if fb < fa { -1.0 } else { 1.0 };
    let (mut fa, mut fb) = if sign < 0.0 { (fb, fa) } else { (fa, fb) };
    let g = |x: Real| -> Result<Real> { Ok(sign * f(x)?) };

    if !(fa <= 0.0 && 0.0 <= fb) {
        return Err(Error::RootNotBracketed(format!(
            "no sign change between {a:.4} and {b:.4} (f values {fa:.4} and {fb:.4})"
        )));
    }

    let (mut a, mut b) = (a, b);
    for _ in 0..MAX_ITERATIONS {
        let m = a + (b - a) * 0.5;
        if (b - a).abs() < precision && (fb - fa).abs() < precision {
            return Ok(m);
        }
        let fm = g(m)?;
        if fm < 0.0 {
            a = m;
            fa = fm;
        } else {
            b = m;
            fb = fm;
        }
    }
    Ok(a + (b - a) * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn finds_simple_root() {
        let root = bracketing(|x| Ok(x * x - 2.0), 0.0, 2.0, 1e-12).unwrap();
        assert_abs_diff_eq!(root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn handles_decreasing_functions() {
        let root = bracketing(|x| Ok(1.0 - x), -5.0, 5.0, 1e-12).unwrap();
        assert_abs_diff_eq!(root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn rejects_unbracketed_roots() {
        let err = bracketing(|x| Ok(x * x + 1.0), -1.0, 1.0, 1e-12).unwrap_err();
        assert!(matches!(err, Error::RootNotBracketed(_)));
    }

    #[test]
    fn propagates_inner_errors() {
        let err = bracketing(
            |_| Err(Error::Domain("query failed".into())),
            0.0,
            1.0,
            1e-12,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Domain(_)));
    }

    #[test]
    fn respects_loose_precision() {
        // a coarse precision still lands near the root
        let root = bracketing(|x| Ok(x - 0.123), -1.0, 1.0, 1e-2).unwrap();
        assert!((root - 0.123).abs() < 1e-2);
    }

    proptest::proptest! {
        #[test]
        fn recovers_random_roots(target in -0.99f64..0.99) {
            let root = bracketing(|x| Ok((x - target).exp() - 1.0), -1.0, 1.0, 1e-10)
                .unwrap();
            proptest::prop_assert!((root - target).abs() < 1e-8);
        }
    }
}

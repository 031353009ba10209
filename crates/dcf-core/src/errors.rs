//! Error types for dcf-rs.
//!
//! A single `thiserror`-derived enum covers every failure mode of the
//! library.  All errors are surfaced to the caller; advisory numerical
//! conditions are logged instead and never abort a pricing call.

use thiserror::Error;

/// The top-level error type used throughout dcf-rs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A curve or interpolator was queried outside its domain of
    /// definition: empty grid, a non-knot query against a knots-only
    /// scheme, a non-strictly-increasing grid, or a non-positive value
    /// fed to a log-based scheme.
    #[error("domain error: {0}")]
    Domain(String),

    /// Construction with mismatched container lengths.
    #[error("shape error: {0}")]
    Shape(String),

    /// Terminal-volatility variance differencing produced a negative
    /// forward variance and no floor is configured.
    #[error("negative variance: {0}")]
    NegativeVariance(String),

    /// A root solver's bracket endpoints have the same sign.
    #[error("root not bracketed: {0}")]
    RootNotBracketed(String),

    /// The rate-bearing payoffs of a cashflow list disagree on the fixed
    /// rate, so a single list-level fixed rate is undefined.
    #[error("ambiguous fixed rate: {0}")]
    AmbiguousFixedRate(String),

    /// A pricing routine was invoked without a curve it requires.
    #[error("missing curve: {0}")]
    MissingCurve(String),

    /// Invalid configuration, e.g. an unknown interpolation-scheme name.
    #[error("config error: {0}")]
    Config(String),
}

/// Shorthand `Result` type used throughout dcf-rs.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Return `Err(Error::Domain(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use dcf_core::ensure;
/// fn positive(x: f64) -> dcf_core::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Domain(format!($($msg)*)));
        }
    };
}

/// Like [`ensure!`] but for a specific error variant.
///
/// ```
/// use dcf_core::{ensure_kind, errors::Error};
/// fn same_len(xs: &[f64], ys: &[f64]) -> dcf_core::Result<()> {
///     ensure_kind!(Shape, xs.len() == ys.len(),
///         "expected equal lengths, got {} and {}", xs.len(), ys.len());
///     Ok(())
/// }
/// assert!(same_len(&[1.0], &[1.0, 2.0]).is_err());
/// ```
#[macro_export]
macro_rules! ensure_kind {
    ($kind:ident, $cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::$kind(format!($($msg)*)));
        }
    };
}

/// Return `Err(Error::$kind(...))` immediately.
///
/// ```
/// use dcf_core::fail;
/// fn always_err() -> dcf_core::Result<()> {
///     fail!(Config, "unknown scheme name");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($kind:ident, $($msg:tt)*) => {
        return Err($crate::errors::Error::$kind(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind() {
        let e = Error::Domain("empty curve".into());
        assert_eq!(e.to_string(), "domain error: empty curve");
        let e = Error::RootNotBracketed("f(a) and f(b) share a sign".into());
        assert!(e.to_string().starts_with("root not bracketed"));
    }

    #[test]
    fn ensure_macro_returns_domain() {
        fn check(x: f64) -> Result<f64> {
            crate::ensure!(x >= 0.0, "negative input {x}");
            Ok(x.sqrt())
        }
        assert!(check(4.0).is_ok());
        assert_eq!(
            check(-1.0),
            Err(Error::Domain("negative input -1".into()))
        );
    }
}

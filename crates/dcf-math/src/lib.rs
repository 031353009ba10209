//! # dcf-math
//!
//! Numerical building blocks for dcf-rs: the interpolation-scheme
//! catalogue with composable extrapolation, standard-normal distribution
//! helpers, and 1-D bracketing root solvers.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod distributions;
pub mod interpolation;
pub mod scheme;
pub mod solvers1d;

pub use interpolation::Interpolator;
pub use scheme::{InterpolationScheme, PiecewiseInterpolator, Scheme};
pub use solvers1d::bracketing;

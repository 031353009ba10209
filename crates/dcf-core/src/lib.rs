//! # dcf-core
//!
//! Core types, the error hierarchy, and compounding conventions shared
//! across all other crates of the dcf-rs workspace.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod compounding;
pub mod errors;

pub use errors::{Error, Result};

/// Floating-point type used throughout the library.
pub type Real = f64;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A spread over a reference rate.
pub type Spread = Real;

/// A discount factor in (0, 1].
pub type DiscountFactor = Real;

/// A probability in [0, 1].
pub type Probability = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

//! # dcf-options
//!
//! Closed-form option pricing for dcf-rs: the intrinsic, Bachelier,
//! Black-76, and displaced Black-76 formulas, and the
//! [`OptionPricingCurve`] valuation context that binds a formula to
//! forward and volatility curves.
//!
//! Put values are always derived from calls by put-call parity
//! `P = K − F + C`; binary payoffs fall back to a centred call spread
//! when a formula has no analytic binary.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bachelier;
pub mod black76;
pub mod formula;
pub mod intrinsic;
pub mod pricing_curve;

pub use bachelier::Bachelier;
pub use black76::{Black76, DisplacedBlack76};
pub use formula::OptionPricingFormula;
pub use intrinsic::Intrinsic;
pub use pricing_curve::OptionPricingCurve;

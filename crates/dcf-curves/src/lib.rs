//! # dcf-curves
//!
//! Time-value curves for dcf-rs: the generic interpolated [`Curve`] with
//! arithmetic, the date-domain [`DateCurve`], and the typed rate, credit,
//! volatility, and forward-price curve families that expose every
//! semantically equivalent view of their stored quantity.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod credit_curve;
pub mod curve;
pub mod date_curve;
pub mod details;
pub mod forward_curve;
pub mod fx;
pub mod price;
pub mod rate_curve;
pub mod sources;
pub mod volatility_curve;

pub use credit_curve::{CreditCurve, CreditStorage};
pub use curve::Curve;
pub use date_curve::DateCurve;
pub use details::{Details, Value};
pub use forward_curve::{ForwardCurve, YieldExtrapolator};
pub use fx::{Currency, FxContainer, FxForwardCurve};
pub use price::Price;
pub use rate_curve::{InterestRateCurve, RateStorage};
pub use sources::{source_id, ForwardSource, VolatilitySource};
pub use volatility_curve::{VolStorage, VolatilityCurve};

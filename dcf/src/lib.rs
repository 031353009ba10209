//! # dcf
//!
//! A library for generating and pricing discounted cashflows: yield,
//! credit, volatility, and forward-price curves; fixed, floating, and
//! optional payoffs; and the pricing routines connecting them.
//!
//! This crate is a façade that re-exports the public items of the
//! underlying workspace crates.  Application code should depend on this
//! crate rather than the individual `dcf-*` crates.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use dcf::time::{Date, Period};
//! use dcf::curves::InterestRateCurve;
//! use dcf::cashflows::CashFlowList;
//! use dcf::pricing::present_value;
//!
//! // a flat 2% zero curve and a two-period fixed leg
//! let today = Date::new(0.0);
//! let curve = InterestRateCurve::zero_rates(&[today], &[0.02]).unwrap();
//! let leg = CashFlowList::from_rate_cashflows(&[Date::new(1.0), Date::new(2.0)])
//!     .with_origin(today)
//!     .with_fixed_rate(0.03)
//!     .build()
//!     .unwrap();
//!
//! let pv = present_value(&leg, &curve, None).unwrap();
//! assert!(0.0 < pv && pv < 0.06);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, errors, and compounding conventions.
pub use dcf_core as core;

/// Date, period, and day-count types.
pub use dcf_time as time;

/// Interpolation schemes, distributions, and root solvers.
pub use dcf_math as math;

/// Rate, credit, volatility, and forward-price curves.
pub use dcf_curves as curves;

/// Option pricing formulas and the option valuation context.
pub use dcf_options as options;

/// Payoff objects and cashflow lists.
pub use dcf_cashflows as cashflows;

/// Present value, yield, sensitivity, and curve-fitting routines.
pub use dcf_pricing as pricing;

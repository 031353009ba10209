//! # dcf-pricing
//!
//! Pricing routines for cashflow lists against discount curves: present
//! value, yield to maturity, fair-rate solving, accrued interest,
//! basis-point values, bucketed sensitivities, and small-scale curve
//! fitting, plus schedule-driven product builders.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod pricer;
pub mod products;

pub use pricer::{
    basis_point_value, bucketed_delta, fair_rate, fit_curve, interest_accrued,
    present_value, present_value_with, yield_to_maturity, ShiftTarget,
};
pub use products::{asset_swap, bond, interest_rate_swap, payment_schedule};

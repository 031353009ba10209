//! # dcf-cashflows
//!
//! Payoff objects and cashflow lists for dcf-rs.
//!
//! A payoff describes a (possibly contingent) amount payable at a pay
//! date; given a valuation context it produces an expected cashflow and a
//! detail record for reporting.  A [`CashFlowList`] is an ordered,
//! time-sliceable container of payoffs with arithmetic on notionals.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cashflow_list;
pub mod payoffs;

pub use cashflow_list::{
    CashFlowList, ContingentRateCashFlowsBuilder, OptionCashFlowsBuilder,
    RateCashFlowsBuilder,
};
pub use payoffs::{
    CashFlowPayOff, ContingentRateCashFlowPayOff, DigitalOptionCashFlowPayOff,
    FixedCashFlowPayOff, OptionCashFlowPayOff, OptionStrategyCashFlowPayOff,
    OptionType, RateCashFlowPayOff, Valuation, DEFAULT_AMOUNT,
};

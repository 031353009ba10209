//! Ordered, time-sliceable cashflow containers.

use std::fmt;
use std::ops::{Add, Bound, Div, Mul, Neg, RangeBounds, Sub};
use std::sync::Arc;

use dcf_core::{ensure_kind, errors::Result, Error, Real};
use dcf_curves::{Details, ForwardSource, Value};
use dcf_options::OptionPricingCurve;
use dcf_time::{Date, DayCount, Period};

use crate::payoffs::{
    CashFlowPayOff, ContingentRateCashFlowPayOff, DigitalOptionCashFlowPayOff,
    FixedCashFlowPayOff, OptionCashFlowPayOff, OptionType, RateCashFlowPayOff,
    Valuation, DEFAULT_AMOUNT,
};

/// Broadcast a scalar amount over `n` periods, or validate an explicit
/// vector.
fn broadcast(amounts: &[Real], n: usize) -> Result<Vec<Real>> {
    if amounts.len() == 1 {
        return Ok(vec![amounts[0]; n]);
    }
    ensure_kind!(
        Shape,
        amounts.len() == n,
        "per-period values ({}) must match payment dates ({})",
        amounts.len(),
        n
    );
    Ok(amounts.to_vec())
}

/// Accrual period start dates for a payment schedule: the first period is
/// anchored at `origin`, or back-filled from the schedule's first step.
fn accrual_starts(payment_dates: &[Date], origin: Option<Date>) -> Vec<Date> {
    let mut starts = Vec::with_capacity(payment_dates.len());
    match origin {
        Some(origin) => starts.push(origin),
        None if payment_dates.len() > 1 => {
            let step = payment_dates[1] - payment_dates[0];
            starts.push(payment_dates[0] - step);
        }
        None => return payment_dates.to_vec(),
    }
    starts.extend_from_slice(&payment_dates[..payment_dates.len() - 1]);
    starts
}

/// An ordered list of payoffs, time-sliceable by pay date, with
/// arithmetic on notionals.
#[derive(Debug, Clone, Default)]
pub struct CashFlowList {
    payoffs: Vec<CashFlowPayOff>,
    origin: Option<Date>,
    exclude_value_date: bool,
}

impl CashFlowList {
    /// A list over the given payoffs.
    pub fn new(payoffs: Vec<CashFlowPayOff>) -> Self {
        Self {
            payoffs,
            origin: None,
            exclude_value_date: false,
        }
    }

    /// Fixed cashflows at the payment dates; a single amount broadcasts.
    pub fn from_fixed_cashflows(payment_dates: &[Date], amounts: &[Real]) -> Result<Self> {
        let amounts = broadcast(amounts, payment_dates.len())?;
        let payoffs = payment_dates
            .iter()
            .zip(amounts)
            .map(|(&d, a)| FixedCashFlowPayOff::new(d, a).into())
            .collect();
        Ok(Self::new(payoffs))
    }

    /// Start building a list of rate cashflows over the schedule.
    pub fn from_rate_cashflows(payment_dates: &[Date]) -> RateCashFlowsBuilder {
        RateCashFlowsBuilder::new(payment_dates)
    }

    /// Start building a list of option cashflows at the payment dates.
    pub fn from_option_cashflows(payment_dates: &[Date]) -> OptionCashFlowsBuilder {
        OptionCashFlowsBuilder::new(payment_dates)
    }

    /// Start building a list of collared rate cashflows over the
    /// schedule.
    pub fn from_contingent_rate_cashflows(
        payment_dates: &[Date],
    ) -> ContingentRateCashFlowsBuilder {
        ContingentRateCashFlowsBuilder::new(payment_dates)
    }

    /// Set the list's product start date.
    pub fn with_origin(mut self, origin: Date) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Mark the list to exclude cashflows paying exactly on the valuation
    /// date from present values.
    pub fn with_value_date_excluded(mut self) -> Self {
        self.exclude_value_date = true;
        self
    }

    /// Whether cashflows on the valuation date are excluded from pricing.
    pub fn excludes_value_date(&self) -> bool {
        self.exclude_value_date
    }

    /// The payoffs in list order.
    pub fn payoffs(&self) -> &[CashFlowPayOff] {
        &self.payoffs
    }

    /// Mutable access to the payoffs (re-parameterisation).
    pub fn payoffs_mut(&mut self) -> &mut [CashFlowPayOff] {
        &mut self.payoffs
    }

    /// Number of payoffs.
    pub fn len(&self) -> usize {
        self.payoffs.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.payoffs.is_empty()
    }

    /// The pay dates in list order.
    pub fn domain(&self) -> Vec<Date> {
        self.payoffs.iter().map(CashFlowPayOff::pay_date).collect()
    }

    /// The list's start date: the explicit origin, or the minimum over
    /// all start and pay dates.
    pub fn origin(&self) -> Option<Date> {
        if self.origin.is_some() {
            return self.origin;
        }
        self.payoffs
            .iter()
            .flat_map(|p| {
                p.start_date()
                    .into_iter()
                    .chain(std::iter::once(p.pay_date()))
            })
            .min()
    }

    /// The payoffs whose pay date falls into `range`, as a new list.
    pub fn slice<R: RangeBounds<Date>>(&self, range: R) -> CashFlowList {
        let payoffs = self
            .payoffs
            .iter()
            .filter(|p| {
                let d = p.pay_date();
                let lower_ok = match range.start_bound() {
                    Bound::Included(&s) => s <= d,
                    Bound::Excluded(&s) => s < d,
                    Bound::Unbounded => true,
                };
                let upper_ok = match range.end_bound() {
                    Bound::Included(&e) => d <= e,
                    Bound::Excluded(&e) => d < e,
                    Bound::Unbounded => true,
                };
                lower_ok && upper_ok
            })
            .cloned()
            .collect();
        CashFlowList {
            payoffs,
            origin: self.origin,
            exclude_value_date: self.exclude_value_date,
        }
    }

    /// The single fixed rate shared by all rate-bearing payoffs.
    ///
    /// Returns `None` when the list has no rate-bearing payoff.
    ///
    /// # Errors
    /// [`Error::AmbiguousFixedRate`] when the rate-bearing payoffs
    /// disagree.
    pub fn fixed_rate(&self) -> Result<Option<Real>> {
        let rates: Vec<Real> = self
            .payoffs
            .iter()
            .filter_map(CashFlowPayOff::fixed_rate)
            .collect();
        match rates.split_first() {
            None => Ok(None),
            Some((&first, rest)) => {
                if rest.iter().any(|&r| r != first) {
                    return Err(Error::AmbiguousFixedRate(
                        "rate-bearing payoffs disagree on the fixed rate".into(),
                    ));
                }
                Ok(Some(first))
            }
        }
    }

    /// Set the fixed rate on every rate-bearing payoff.
    pub fn set_fixed_rate(&mut self, fixed_rate: Real) {
        for payoff in &mut self.payoffs {
            payoff.set_fixed_rate(fixed_rate);
        }
    }

    /// The detail records of all payoffs under a valuation context.
    pub fn details(&self, valuation: &Valuation) -> Result<Vec<Details>> {
        self.payoffs.iter().map(|p| p.details(valuation)).collect()
    }

    /// The expected cashflow amounts of all payoffs.
    pub fn cashflows(&self, valuation: &Valuation) -> Result<Vec<Real>> {
        self.payoffs
            .iter()
            .map(|p| p.cashflow(valuation))
            .collect()
    }
}

impl Neg for CashFlowList {
    type Output = CashFlowList;

    fn neg(mut self) -> CashFlowList {
        for payoff in &mut self.payoffs {
            payoff.scale_amount(-1.0);
        }
        self
    }
}

impl Add<CashFlowList> for CashFlowList {
    type Output = CashFlowList;

    /// Concatenation; the origin becomes the earlier of both.
    fn add(mut self, other: CashFlowList) -> CashFlowList {
        let origin = match (self.origin(), other.origin()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.payoffs.extend(other.payoffs);
        self.origin = origin;
        self
    }
}

impl Add<CashFlowPayOff> for CashFlowList {
    type Output = CashFlowList;

    fn add(mut self, payoff: CashFlowPayOff) -> CashFlowList {
        self.payoffs.push(payoff);
        self
    }
}

impl Add<Real> for CashFlowList {
    type Output = CashFlowList;

    /// Broadcast `scalar` onto every payoff's amount.
    fn add(mut self, scalar: Real) -> CashFlowList {
        for payoff in &mut self.payoffs {
            payoff.add_amount(scalar);
        }
        self
    }
}

impl Sub<Real> for CashFlowList {
    type Output = CashFlowList;

    fn sub(self, scalar: Real) -> CashFlowList {
        self + (-scalar)
    }
}

impl Mul<Real> for CashFlowList {
    type Output = CashFlowList;

    fn mul(mut self, scalar: Real) -> CashFlowList {
        for payoff in &mut self.payoffs {
            payoff.scale_amount(scalar);
        }
        self
    }
}

impl Div<Real> for CashFlowList {
    type Output = CashFlowList;

    fn div(self, scalar: Real) -> CashFlowList {
        self * (1.0 / scalar)
    }
}

impl fmt::Display for CashFlowList {
    /// A table with one row per payoff and columns drawn from the union
    /// of the payoffs' detail keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valuation = Valuation::new();
        let rows: Vec<Details> = self
            .payoffs
            .iter()
            .map(|p| {
                p.details(&valuation).unwrap_or_else(|_| {
                    let mut row = Details::new();
                    row.set("pay date", p.pay_date());
                    row
                })
            })
            .collect();

        let mut header: Vec<String> = Vec::new();
        for row in &rows {
            for key in row.keys() {
                if !header.iter().any(|h| h == key) {
                    header.push(key.to_string());
                }
            }
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                header
                    .iter()
                    .map(|key| row.get(key).map(Value::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = header
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for (h, w) in header.iter().zip(widths.iter().copied()) {
            write!(f, "{h:>w$}  ")?;
        }
        writeln!(f)?;
        for row in &cells {
            for (cell, w) in row.iter().zip(widths.iter().copied()) {
                write!(f, "{cell:>w$}  ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ── Builders ─────────────────────────────────────────────────────────────────

/// Builder for a list of rate cashflows over a payment schedule.
#[derive(Debug, Clone)]
pub struct RateCashFlowsBuilder {
    payment_dates: Vec<Date>,
    amounts: Vec<Real>,
    origin: Option<Date>,
    day_count: Option<Arc<dyn DayCount>>,
    fixing_offset: Option<Period>,
    pay_offset: Option<Period>,
    fixed_rate: Real,
    forward_curve: Option<Arc<dyn ForwardSource>>,
}

impl RateCashFlowsBuilder {
    fn new(payment_dates: &[Date]) -> Self {
        Self {
            payment_dates: payment_dates.to_vec(),
            amounts: vec![DEFAULT_AMOUNT],
            origin: None,
            day_count: None,
            fixing_offset: None,
            pay_offset: None,
            fixed_rate: 0.0,
            forward_curve: None,
        }
    }

    /// Set a single notional for all periods.
    pub fn with_amount(mut self, amount: Real) -> Self {
        self.amounts = vec![amount];
        self
    }

    /// Set per-period notionals.
    pub fn with_amounts(mut self, amounts: &[Real]) -> Self {
        self.amounts = amounts.to_vec();
        self
    }

    /// Anchor the first accrual period at `origin`.
    pub fn with_origin(mut self, origin: Date) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Set the accrual day count.
    pub fn with_day_count(mut self, day_count: Arc<dyn DayCount>) -> Self {
        self.day_count = Some(day_count);
        self
    }

    /// Set the fixing offset.
    pub fn with_fixing_offset(mut self, fixing_offset: Period) -> Self {
        self.fixing_offset = Some(fixing_offset);
        self
    }

    /// Set the payment offset (accrual periods shift back by it).
    pub fn with_pay_offset(mut self, pay_offset: Period) -> Self {
        self.pay_offset = Some(pay_offset);
        self
    }

    /// Set the fixed rate.
    pub fn with_fixed_rate(mut self, fixed_rate: Real) -> Self {
        self.fixed_rate = fixed_rate;
        self
    }

    /// Attach a forward curve for the float rate.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// Build the cashflow list.
    pub fn build(self) -> Result<CashFlowList> {
        let amounts = broadcast(&self.amounts, self.payment_dates.len())?;
        let starts = accrual_starts(&self.payment_dates, self.origin);
        let mut payoffs = Vec::with_capacity(self.payment_dates.len());
        for ((&pay, &start), amount) in
            self.payment_dates.iter().zip(&starts).zip(amounts)
        {
            let (mut s, mut e) = (start, pay);
            if let Some(offset) = self.pay_offset {
                s = s - offset;
                e = e - offset;
            }
            let mut payoff =
                RateCashFlowPayOff::new(pay, s, e, amount).with_fixed_rate(self.fixed_rate);
            if let Some(day_count) = &self.day_count {
                payoff = payoff.with_day_count(day_count.clone());
            }
            if let Some(offset) = self.fixing_offset {
                payoff = payoff.with_fixing_offset(offset);
            }
            if let Some(curve) = &self.forward_curve {
                payoff = payoff.with_forward_curve(curve.clone());
            }
            payoffs.push(payoff.into());
        }
        let mut list = CashFlowList::new(payoffs);
        list.origin = self.origin;
        Ok(list)
    }
}

/// Builder for a list of (digital) option cashflows.
#[derive(Debug, Clone)]
pub struct OptionCashFlowsBuilder {
    payment_dates: Vec<Date>,
    amounts: Vec<Real>,
    strikes: Vec<Real>,
    option_type: OptionType,
    digital: bool,
    fixing_offset: Option<Period>,
    pay_offset: Option<Period>,
    forward_curve: Option<Arc<dyn ForwardSource>>,
    option_curve: Option<Arc<OptionPricingCurve>>,
}

impl OptionCashFlowsBuilder {
    fn new(payment_dates: &[Date]) -> Self {
        Self {
            payment_dates: payment_dates.to_vec(),
            amounts: vec![DEFAULT_AMOUNT],
            strikes: Vec::new(),
            option_type: OptionType::Call,
            digital: false,
            fixing_offset: None,
            pay_offset: None,
            forward_curve: None,
            option_curve: None,
        }
    }

    /// Set a single notional for all options.
    pub fn with_amount(mut self, amount: Real) -> Self {
        self.amounts = vec![amount];
        self
    }

    /// Set per-option notionals.
    pub fn with_amounts(mut self, amounts: &[Real]) -> Self {
        self.amounts = amounts.to_vec();
        self
    }

    /// Set a single strike for all options.
    pub fn with_strike(mut self, strike: Real) -> Self {
        self.strikes = vec![strike];
        self
    }

    /// Set per-option strikes.
    pub fn with_strikes(mut self, strikes: &[Real]) -> Self {
        self.strikes = strikes.to_vec();
        self
    }

    /// Set the option flavour.
    pub fn with_option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Build digital (cash-or-nothing) options.
    pub fn digital(mut self) -> Self {
        self.digital = true;
        self
    }

    /// Set the fixing offset (expiry moves before the pay date).
    pub fn with_fixing_offset(mut self, fixing_offset: Period) -> Self {
        self.fixing_offset = Some(fixing_offset);
        self
    }

    /// Set the payment offset (expiry moves before the pay date).
    pub fn with_pay_offset(mut self, pay_offset: Period) -> Self {
        self.pay_offset = Some(pay_offset);
        self
    }

    /// Attach a bare forward curve (intrinsic fallback).
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// Attach an option pricing model.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option_curve = Some(option_curve);
        self
    }

    /// Build the cashflow list.
    pub fn build(self) -> Result<CashFlowList> {
        let n = self.payment_dates.len();
        let amounts = broadcast(&self.amounts, n)?;
        let strikes = broadcast(&self.strikes, n)?;
        let mut payoffs = Vec::with_capacity(n);
        for ((&pay, amount), strike) in
            self.payment_dates.iter().zip(amounts).zip(strikes)
        {
            let mut expiry = pay;
            if let Some(offset) = self.pay_offset {
                expiry = expiry - offset;
            }
            if let Some(offset) = self.fixing_offset {
                expiry = expiry - offset;
            }
            let mut option =
                OptionCashFlowPayOff::new(pay, amount, Some(strike), self.option_type)
                    .with_expiry(expiry);
            if let Some(curve) = &self.forward_curve {
                option = option.with_forward_curve(curve.clone());
            }
            if let Some(curve) = &self.option_curve {
                option = option.with_option_curve(curve.clone());
            }
            payoffs.push(if self.digital {
                DigitalOptionCashFlowPayOff { option }.into()
            } else {
                option.into()
            });
        }
        Ok(CashFlowList::new(payoffs))
    }
}

/// Builder for a list of collared rate cashflows.
#[derive(Debug, Clone)]
pub struct ContingentRateCashFlowsBuilder {
    rate: RateCashFlowsBuilder,
    floor_strike: Option<Real>,
    cap_strike: Option<Real>,
    option_curve: Option<Arc<OptionPricingCurve>>,
}

impl ContingentRateCashFlowsBuilder {
    fn new(payment_dates: &[Date]) -> Self {
        Self {
            rate: RateCashFlowsBuilder::new(payment_dates),
            floor_strike: None,
            cap_strike: None,
            option_curve: None,
        }
    }

    /// Set a single notional for all periods.
    pub fn with_amount(mut self, amount: Real) -> Self {
        self.rate = self.rate.with_amount(amount);
        self
    }

    /// Set per-period notionals.
    pub fn with_amounts(mut self, amounts: &[Real]) -> Self {
        self.rate = self.rate.with_amounts(amounts);
        self
    }

    /// Anchor the first accrual period at `origin`.
    pub fn with_origin(mut self, origin: Date) -> Self {
        self.rate = self.rate.with_origin(origin);
        self
    }

    /// Set the accrual day count.
    pub fn with_day_count(mut self, day_count: Arc<dyn DayCount>) -> Self {
        self.rate = self.rate.with_day_count(day_count);
        self
    }

    /// Set the fixing offset.
    pub fn with_fixing_offset(mut self, fixing_offset: Period) -> Self {
        self.rate = self.rate.with_fixing_offset(fixing_offset);
        self
    }

    /// Set the payment offset.
    pub fn with_pay_offset(mut self, pay_offset: Period) -> Self {
        self.rate = self.rate.with_pay_offset(pay_offset);
        self
    }

    /// Set the fixed rate.
    pub fn with_fixed_rate(mut self, fixed_rate: Real) -> Self {
        self.rate = self.rate.with_fixed_rate(fixed_rate);
        self
    }

    /// Attach a forward curve for the float rate.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.rate = self.rate.with_forward_curve(forward_curve);
        self
    }

    /// Set the floorlet strike.
    pub fn with_floor_strike(mut self, floor_strike: Real) -> Self {
        self.floor_strike = Some(floor_strike);
        self
    }

    /// Set the caplet strike.
    pub fn with_cap_strike(mut self, cap_strike: Real) -> Self {
        self.cap_strike = Some(cap_strike);
        self
    }

    /// Attach an option pricing model for the collar legs.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option_curve = Some(option_curve);
        self
    }

    /// Build the cashflow list.
    pub fn build(self) -> Result<CashFlowList> {
        let rate_list = self.rate.build()?;
        let origin = rate_list.origin;
        let payoffs = rate_list
            .payoffs
            .into_iter()
            .map(|payoff| match payoff {
                CashFlowPayOff::Rate(rate) => {
                    let mut contingent = ContingentRateCashFlowPayOff::new(rate);
                    contingent.floor_strike = self.floor_strike;
                    contingent.cap_strike = self.cap_strike;
                    contingent.option_curve = self.option_curve.clone();
                    contingent.into()
                }
                other => other,
            })
            .collect();
        let mut list = CashFlowList::new(payoffs);
        list.origin = origin;
        Ok(list)
    }
}

//! Cashflow payoff objects.
//!
//! Each payoff computes its expected cashflow from its own amount and the
//! curves it was constructed with, falling back to the curves supplied in
//! the [`Valuation`] context.  Priority: explicit argument > stored field
//! > none.  For fixed and rate payoffs the stored field also gates
//! whether a forward applies at all, so a context override never turns a
//! fixed-only leg into a floating one.

use std::str::FromStr;
use std::sync::Arc;

use dcf_core::{errors::Result, Error, Real};
use dcf_curves::{source_id, Details, ForwardSource};
use dcf_options::OptionPricingCurve;
use dcf_time::{default_day_count, Date, DayCount, Period};

/// Default notional amount of a payoff.
pub const DEFAULT_AMOUNT: Real = 1.0;

/// Option flavour of an [`OptionCashFlowPayOff`].
///
/// `Cap` and `Floor` are the rate-market names for calls and puts on
/// forward rates; they price identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionType {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
    /// A caplet: a call on a forward rate.
    Cap,
    /// A floorlet: a put on a forward rate.
    Floor,
}

impl OptionType {
    /// Whether this flavour prices as a put.
    pub fn is_put(self) -> bool {
        matches!(self, OptionType::Put | OptionType::Floor)
    }

    /// The flavour's display name.
    pub fn name(self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
            OptionType::Cap => "cap",
            OptionType::Floor => "floor",
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "call" => OptionType::Call,
            "put" => OptionType::Put,
            "cap" => OptionType::Cap,
            "floor" => OptionType::Floor,
            other => {
                return Err(Error::Config(format!("unknown option type '{other}'")))
            }
        })
    }
}

/// Explicit curves supplied at valuation time; they take priority over
/// the curves stored on a payoff.
#[derive(Debug, Clone, Default)]
pub struct Valuation {
    /// Forward curve override.
    pub forward_curve: Option<Arc<dyn ForwardSource>>,
    /// Option model override.
    pub option_curve: Option<Arc<OptionPricingCurve>>,
}

impl Valuation {
    /// An empty context: every payoff uses its stored curves.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the forward curve.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// Override the option model.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option_curve = Some(option_curve);
        self
    }
}

// ── Fixed ────────────────────────────────────────────────────────────────────

/// A fixed amount payable at the pay date, optionally carrying a price
/// forward addend.
#[derive(Debug, Clone)]
pub struct FixedCashFlowPayOff {
    /// Payment date.
    pub pay_date: Date,
    /// Notional amount.
    pub amount: Real,
    /// Optional price forward curve; its value at the pay date is added
    /// to the amount.
    pub forward_curve: Option<Arc<dyn ForwardSource>>,
}

impl FixedCashFlowPayOff {
    /// A fixed cashflow of `amount` at `pay_date`.
    pub fn new(pay_date: Date, amount: Real) -> Self {
        Self {
            pay_date,
            amount,
            forward_curve: None,
        }
    }

    /// Attach a price forward curve.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// Cashflow details: `cashflow = amount + forward(pay_date)`.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let mut details = Details::new();
        details.set("pay date", self.pay_date);
        details.set("cashflow", self.amount);

        // the stored curve gates the price addend; an explicit curve only
        // overrides where the addend applies at all
        if let Some(stored) = &self.forward_curve {
            let curve = valuation
                .forward_curve
                .clone()
                .unwrap_or_else(|| stored.clone());
            let forward = curve.forward_value(self.pay_date)?;
            details.set("fixed amount", self.amount);
            details.set("forward price", forward);
            details.set("forward-curve-id", source_id(&curve));
            details.set("cashflow", self.amount + forward);
        }
        Ok(details)
    }
}

// ── Rate ─────────────────────────────────────────────────────────────────────

/// An interest-rate accrual cashflow:
/// `cashflow = (fixed_rate + forward_rate) · τ(start, end) · amount`.
#[derive(Debug, Clone)]
pub struct RateCashFlowPayOff {
    /// Payment date.
    pub pay_date: Date,
    /// Accrual period start date.
    pub start: Date,
    /// Accrual period end date.
    pub end: Date,
    /// Notional amount.
    pub amount: Real,
    /// Day count for the accrual year fraction (default convention when
    /// unset).
    pub day_count: Option<Arc<dyn DayCount>>,
    /// Offset of the rate fixing before the accrual start date.
    pub fixing_offset: Option<Period>,
    /// Agreed fixed rate.
    pub fixed_rate: Real,
    /// Forward curve for the float rate.
    pub forward_curve: Option<Arc<dyn ForwardSource>>,
}

impl RateCashFlowPayOff {
    /// A rate cashflow accruing over `[start, end]`, paid at `pay_date`.
    pub fn new(pay_date: Date, start: Date, end: Date, amount: Real) -> Self {
        Self {
            pay_date,
            start,
            end,
            amount,
            day_count: None,
            fixing_offset: None,
            fixed_rate: 0.0,
            forward_curve: None,
        }
    }

    /// Set the fixed rate.
    pub fn with_fixed_rate(mut self, fixed_rate: Real) -> Self {
        self.fixed_rate = fixed_rate;
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

    /// Attach a forward curve for the float rate.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// The accrual year fraction `τ(start, end)`.
    pub fn year_fraction(&self) -> Real {
        self.day_count
            .clone()
            .unwrap_or_else(default_day_count)
            .year_fraction(self.start, self.end)
    }

    /// The fixing date `start − fixing_offset`.
    pub fn fixing_date(&self) -> Date {
        match self.fixing_offset {
            Some(offset) => self.start - offset,
            None => self.start,
        }
    }

    /// Cashflow details.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let yf = self.year_fraction();
        let mut details = Details::new();
        details.set("pay date", self.pay_date);
        details.set("cashflow", 0.0);
        details.set("notional", self.amount);
        details.set("pay rec", if self.amount > 0.0 { "pay" } else { "rec" });
        details.set("fixed rate", self.fixed_rate);
        details.set("start date", self.start);
        details.set("end date", self.end);
        details.set("year fraction", yf);
        if let Some(day_count) = &self.day_count {
            details.set("day count", day_count.name());
        }

        // a float rate applies only when the payoff was built with a
        // forward curve; an explicit curve overrides which one is read
        let mut forward = 0.0;
        if let Some(stored) = &self.forward_curve {
            let curve = valuation
                .forward_curve
                .clone()
                .unwrap_or_else(|| stored.clone());
            let fixing_date = self.fixing_date();
            forward = curve.forward_value(fixing_date)?;
            details.set("forward rate", forward);
            details.set("fixing date", fixing_date);
            if let Some(tenor) = curve.forward_tenor() {
                details.set("tenor", tenor.as_years());
            }
            details.set("forward-curve-id", source_id(&curve));
        }

        details.set(
            "cashflow",
            (self.fixed_rate + forward) * yf * self.amount,
        );
        Ok(details)
    }
}

// ── Option ───────────────────────────────────────────────────────────────────

/// A European option payoff.
#[derive(Debug, Clone)]
pub struct OptionCashFlowPayOff {
    /// Payment date.
    pub pay_date: Date,
    /// Expiry date; defaults to the pay date.
    pub expiry: Option<Date>,
    /// Notional amount.
    pub amount: Real,
    /// Strike; `None` means at-the-money.
    pub strike: Option<Real>,
    /// Option flavour.
    pub option_type: OptionType,
    /// Forward curve used when no option model is available (intrinsic
    /// fallback).
    pub forward_curve: Option<Arc<dyn ForwardSource>>,
    /// Option pricing model.
    pub option_curve: Option<Arc<OptionPricingCurve>>,
}

impl OptionCashFlowPayOff {
    /// An option cashflow paying at `pay_date`.
    pub fn new(pay_date: Date, amount: Real, strike: Option<Real>, option_type: OptionType) -> Self {
        Self {
            pay_date,
            expiry: None,
            amount,
            strike,
            option_type,
            forward_curve: None,
            option_curve: None,
        }
    }

    /// Set an expiry date distinct from the pay date.
    pub fn with_expiry(mut self, expiry: Date) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Attach a bare forward curve (intrinsic fallback rung).
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.forward_curve = Some(forward_curve);
        self
    }

    /// Attach an option pricing model.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option_curve = Some(option_curve);
        self
    }

    /// The effective expiry date.
    pub fn expiry_date(&self) -> Date {
        self.expiry.unwrap_or(self.pay_date)
    }

    fn base_details(&self) -> Details {
        let mut details = Details::new();
        details.set("pay date", self.pay_date);
        details.set("cashflow", 0.0);
        details.set("option type", self.option_type.name());
        details.set("is put", self.option_type.is_put());
        details.set(
            "long short",
            if self.amount > 0.0 { "long" } else { "short" },
        );
        details.set("notional", self.amount);
        match self.strike {
            Some(strike) => details.set("strike", strike),
            None => details.set("strike", "atm"),
        }
        details.set("expiry date", self.expiry_date());
        details
    }

    /// Cashflow details.
    ///
    /// Valuation ladder: option model (explicit, then stored) → intrinsic
    /// value off a bare forward source → [`Error::MissingCurve`] when a
    /// strike is set but no curve at all is available.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let mut details = self.base_details();
        let expiry = self.expiry_date();
        let is_put = self.option_type.is_put();

        let model = valuation
            .option_curve
            .clone()
            .or_else(|| self.option_curve.clone());
        let forward = valuation
            .forward_curve
            .clone()
            .or_else(|| self.forward_curve.clone());

        if let Some(model) = model {
            details.merge(model.details(expiry, self.strike)?);
            details.set("option-curve-id", source_id(&model));
            let option = if is_put {
                model.put(expiry, self.strike)?
            } else {
                model.call(expiry, self.strike)?
            };
            details.set("cashflow", option * self.amount);
        } else if let Some(forward) = forward {
            let f = forward.forward_value(expiry)?;
            details.set("forward", f);
            details.set("forward-curve-id", source_id(&forward));
            details.set("option model", "no model");
            let option = match self.strike {
                Some(k) if is_put => (k - f).max(0.0),
                Some(k) => (f - k).max(0.0),
                None => 0.0,
            };
            details.set("cashflow", option * self.amount);
        } else if self.strike.is_some() {
            return Err(Error::MissingCurve(
                "option payoff with a strike requires an option model or forward curve"
                    .into(),
            ));
        }
        Ok(details)
    }
}

// ── Digital option ───────────────────────────────────────────────────────────

/// A digital (cash-or-nothing) European option payoff.
#[derive(Debug, Clone)]
pub struct DigitalOptionCashFlowPayOff {
    /// The underlying option description.
    pub option: OptionCashFlowPayOff,
}

impl DigitalOptionCashFlowPayOff {
    /// A digital option cashflow paying at `pay_date`.
    pub fn new(pay_date: Date, amount: Real, strike: Option<Real>, option_type: OptionType) -> Self {
        Self {
            option: OptionCashFlowPayOff::new(pay_date, amount, strike, option_type),
        }
    }

    /// Set an expiry date distinct from the pay date.
    pub fn with_expiry(mut self, expiry: Date) -> Self {
        self.option.expiry = Some(expiry);
        self
    }

    /// Attach a bare forward curve.
    pub fn with_forward_curve(mut self, forward_curve: Arc<dyn ForwardSource>) -> Self {
        self.option.forward_curve = Some(forward_curve);
        self
    }

    /// Attach an option pricing model.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option.option_curve = Some(option_curve);
        self
    }

    /// Cashflow details: the binary value from the model (analytic or
    /// call-spread), or the 0/1 intrinsic step off a bare forward.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let payoff = &self.option;
        let mut details = payoff.base_details();
        details.set("is digital", true);
        let expiry = payoff.expiry_date();
        let is_put = payoff.option_type.is_put();

        let model = valuation
            .option_curve
            .clone()
            .or_else(|| payoff.option_curve.clone());
        let forward = valuation
            .forward_curve
            .clone()
            .or_else(|| payoff.forward_curve.clone());

        if let Some(model) = model {
            details.merge(model.details(expiry, payoff.strike)?);
            details.set("option-curve-id", source_id(&model));
            let binary = if is_put {
                model.binary_put(expiry, payoff.strike)?
            } else {
                model.binary_call(expiry, payoff.strike)?
            };
            details.set("cashflow", binary * payoff.amount);
        } else if let Some(forward) = forward {
            let f = forward.forward_value(expiry)?;
            details.set("forward", f);
            details.set("forward-curve-id", source_id(&forward));
            details.set("option model", "no model");
            // without a strike the digital is defined to pay
            let binary = match payoff.strike {
                Some(k) if is_put => {
                    if f < k {
                        1.0
                    } else {
                        0.0
                    }
                }
                Some(k) => {
                    if f > k {
                        1.0
                    } else {
                        0.0
                    }
                }
                None => 1.0,
            };
            details.set("cashflow", binary * payoff.amount);
        } else if payoff.strike.is_some() {
            return Err(Error::MissingCurve(
                "digital option payoff with a strike requires an option model \
                 or forward curve"
                    .into(),
            ));
        }
        Ok(details)
    }
}

// ── Contingent rate ──────────────────────────────────────────────────────────

/// A collared rate cashflow: the rate accrual plus a long floorlet minus
/// a short caplet, each priced on the fixing date.
#[derive(Debug, Clone)]
pub struct ContingentRateCashFlowPayOff {
    /// The underlying rate accrual.
    pub rate: RateCashFlowPayOff,
    /// Lower rate boundary; ignored when `None`.
    pub floor_strike: Option<Real>,
    /// Upper rate boundary; ignored when `None`.
    pub cap_strike: Option<Real>,
    /// Option pricing model for the collar legs.
    pub option_curve: Option<Arc<OptionPricingCurve>>,
}

impl ContingentRateCashFlowPayOff {
    /// A collared rate cashflow over `[start, end]`, paid at `pay_date`.
    pub fn new(rate: RateCashFlowPayOff) -> Self {
        Self {
            rate,
            floor_strike: None,
            cap_strike: None,
            option_curve: None,
        }
    }

    /// Set the floor strike.
    pub fn with_floor_strike(mut self, floor_strike: Real) -> Self {
        self.floor_strike = Some(floor_strike);
        self
    }

    /// Set the cap strike.
    pub fn with_cap_strike(mut self, cap_strike: Real) -> Self {
        self.cap_strike = Some(cap_strike);
        self
    }

    /// Attach an option pricing model for the collar legs.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        self.option_curve = Some(option_curve);
        self
    }

    /// Cashflow details.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let model = valuation
            .option_curve
            .clone()
            .or_else(|| self.option_curve.clone());

        // the model doubles as the rate leg's forward source when the
        // rate payoff carries none
        let mut rate = self.rate.clone();
        if rate.forward_curve.is_none() {
            if let Some(model) = &model {
                let forward: Arc<dyn ForwardSource> = model.clone();
                rate.forward_curve = Some(forward);
            }
        }
        let mut details = rate.details(valuation)?;

        if let Some(model) = model {
            let fixing_date = self.rate.fixing_date();
            let yf = self.rate.year_fraction();
            let amount = self.rate.amount;
            let mut floorlet = 0.0;
            let mut caplet = 0.0;

            if let Some(floor_strike) = self.floor_strike {
                floorlet = model.put(fixing_date, Some(floor_strike))? * yf * amount;
                details.set("floorlet", floorlet);
                details.set("floorlet strike", floor_strike);
                let model_details = model.details(fixing_date, Some(floor_strike))?;
                if let Some(vol) = model_details.get("volatility") {
                    details.set("floorlet volatility", vol.clone());
                }
            }
            if let Some(cap_strike) = self.cap_strike {
                caplet = model.call(fixing_date, Some(cap_strike))? * yf * amount;
                details.set("caplet", caplet);
                details.set("caplet strike", cap_strike);
                let model_details = model.details(fixing_date, Some(cap_strike))?;
                if let Some(vol) = model_details.get("volatility") {
                    details.set("caplet volatility", vol.clone());
                }
            }
            details.set("option-curve-id", source_id(&model));
            let cashflow = details.cashflow() + floorlet - caplet;
            details.set("cashflow", cashflow);
        }
        Ok(details)
    }
}

// ── Option strategy ──────────────────────────────────────────────────────────

/// A series of call and put options sharing a single expiry, kept sorted
/// by strike (puts before calls at equal strikes).
#[derive(Debug, Clone)]
pub struct OptionStrategyCashFlowPayOff {
    /// Payment date.
    pub pay_date: Date,
    /// Common expiry of all legs.
    pub expiry: Date,
    options: Vec<OptionCashFlowPayOff>,
}

impl OptionStrategyCashFlowPayOff {
    /// A strategy from call and put amount/strike lists.
    pub fn new(
        pay_date: Date,
        expiry: Date,
        call_amounts: &[Real],
        call_strikes: &[Real],
        put_amounts: &[Real],
        put_strikes: &[Real],
    ) -> Result<Self> {
        dcf_core::ensure_kind!(
            Shape,
            call_amounts.len() == call_strikes.len(),
            "call amounts ({}) and strikes ({}) must have the same length",
            call_amounts.len(),
            call_strikes.len()
        );
        dcf_core::ensure_kind!(
            Shape,
            put_amounts.len() == put_strikes.len(),
            "put amounts ({}) and strikes ({}) must have the same length",
            put_amounts.len(),
            put_strikes.len()
        );
        let mut options = Vec::with_capacity(call_amounts.len() + put_amounts.len());
        for (&amount, &strike) in put_amounts.iter().zip(put_strikes) {
            options.push(
                OptionCashFlowPayOff::new(pay_date, amount, Some(strike), OptionType::Put)
                    .with_expiry(expiry),
            );
        }
        for (&amount, &strike) in call_amounts.iter().zip(call_strikes) {
            options.push(
                OptionCashFlowPayOff::new(pay_date, amount, Some(strike), OptionType::Call)
                    .with_expiry(expiry),
            );
        }
        // stable sort by strike keeps puts ahead of calls at equal strikes
        options.sort_by(|a, b| {
            a.strike
                .unwrap_or(0.0)
                .total_cmp(&b.strike.unwrap_or(0.0))
        });
        Ok(Self {
            pay_date,
            expiry,
            options,
        })
    }

    /// Attach an option pricing model to every leg.
    pub fn with_option_curve(mut self, option_curve: Arc<OptionPricingCurve>) -> Self {
        for option in &mut self.options {
            option.option_curve = Some(option_curve.clone());
        }
        self
    }

    /// The strategy legs, sorted by strike.
    pub fn options(&self) -> &[OptionCashFlowPayOff] {
        &self.options
    }

    pub(crate) fn scale_amounts(&mut self, factor: Real) {
        for option in &mut self.options {
            option.amount *= factor;
        }
    }

    pub(crate) fn add_amounts(&mut self, delta: Real) {
        for option in &mut self.options {
            option.amount += delta;
        }
    }

    /// Cashflow details: the sum over all legs, with per-leg entries
    /// prefixed `#i`.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        let mut details = Details::new();
        details.set("pay date", self.pay_date);
        details.set("cashflow", 0.0);
        details.set("expiry date", self.expiry);
        let mut cashflow = 0.0;
        for (i, option) in self.options.iter().enumerate() {
            let leg = option.details(valuation)?;
            cashflow += leg.cashflow();
            for (key, value) in leg.iter() {
                details.set(format!("#{i} {key}"), value.clone());
            }
        }
        details.set("cashflow", cashflow);
        Ok(details)
    }
}

// ── The payoff union ─────────────────────────────────────────────────────────

/// A cashflow payoff: the sealed union over all payoff variants.
#[derive(Debug, Clone)]
pub enum CashFlowPayOff {
    /// Fixed amount.
    Fixed(FixedCashFlowPayOff),
    /// Rate accrual.
    Rate(RateCashFlowPayOff),
    /// European option.
    Option(OptionCashFlowPayOff),
    /// Digital European option.
    DigitalOption(DigitalOptionCashFlowPayOff),
    /// Collared rate.
    ContingentRate(ContingentRateCashFlowPayOff),
    /// Option strategy.
    OptionStrategy(OptionStrategyCashFlowPayOff),
}

impl CashFlowPayOff {
    /// The payment date.
    pub fn pay_date(&self) -> Date {
        match self {
            CashFlowPayOff::Fixed(p) => p.pay_date,
            CashFlowPayOff::Rate(p) => p.pay_date,
            CashFlowPayOff::Option(p) => p.pay_date,
            CashFlowPayOff::DigitalOption(p) => p.option.pay_date,
            CashFlowPayOff::ContingentRate(p) => p.rate.pay_date,
            CashFlowPayOff::OptionStrategy(p) => p.pay_date,
        }
    }

    /// The accrual start date, for rate-bearing payoffs.
    pub fn start_date(&self) -> Option<Date> {
        match self {
            CashFlowPayOff::Rate(p) => Some(p.start),
            CashFlowPayOff::ContingentRate(p) => Some(p.rate.start),
            _ => None,
        }
    }

    /// The stored forward curve, where the variant carries one.
    pub fn forward_curve(&self) -> Option<Arc<dyn ForwardSource>> {
        match self {
            CashFlowPayOff::Fixed(p) => p.forward_curve.clone(),
            CashFlowPayOff::Rate(p) => p.forward_curve.clone(),
            CashFlowPayOff::Option(p) => p.forward_curve.clone(),
            CashFlowPayOff::DigitalOption(p) => p.option.forward_curve.clone(),
            CashFlowPayOff::ContingentRate(p) => p.rate.forward_curve.clone(),
            CashFlowPayOff::OptionStrategy(_) => None,
        }
    }

    /// The fixed rate, for rate-bearing payoffs.
    pub fn fixed_rate(&self) -> Option<Real> {
        match self {
            CashFlowPayOff::Rate(p) => Some(p.fixed_rate),
            CashFlowPayOff::ContingentRate(p) => Some(p.rate.fixed_rate),
            _ => None,
        }
    }

    /// Set the fixed rate on rate-bearing payoffs (no-op otherwise).
    pub fn set_fixed_rate(&mut self, fixed_rate: Real) {
        match self {
            CashFlowPayOff::Rate(p) => p.fixed_rate = fixed_rate,
            CashFlowPayOff::ContingentRate(p) => p.rate.fixed_rate = fixed_rate,
            _ => {}
        }
    }

    /// The detail record under a valuation context.
    pub fn details(&self, valuation: &Valuation) -> Result<Details> {
        match self {
            CashFlowPayOff::Fixed(p) => p.details(valuation),
            CashFlowPayOff::Rate(p) => p.details(valuation),
            CashFlowPayOff::Option(p) => p.details(valuation),
            CashFlowPayOff::DigitalOption(p) => p.details(valuation),
            CashFlowPayOff::ContingentRate(p) => p.details(valuation),
            CashFlowPayOff::OptionStrategy(p) => p.details(valuation),
        }
    }

    /// The expected cashflow amount under a valuation context.
    pub fn cashflow(&self, valuation: &Valuation) -> Result<Real> {
        Ok(self.details(valuation)?.cashflow())
    }

    /// Scale the notional amount(s) by `factor`.
    pub fn scale_amount(&mut self, factor: Real) {
        match self {
            CashFlowPayOff::Fixed(p) => p.amount *= factor,
            CashFlowPayOff::Rate(p) => p.amount *= factor,
            CashFlowPayOff::Option(p) => p.amount *= factor,
            CashFlowPayOff::DigitalOption(p) => p.option.amount *= factor,
            CashFlowPayOff::ContingentRate(p) => p.rate.amount *= factor,
            CashFlowPayOff::OptionStrategy(p) => p.scale_amounts(factor),
        }
    }

    /// Add `delta` to the notional amount(s).
    pub fn add_amount(&mut self, delta: Real) {
        match self {
            CashFlowPayOff::Fixed(p) => p.amount += delta,
            CashFlowPayOff::Rate(p) => p.amount += delta,
            CashFlowPayOff::Option(p) => p.amount += delta,
            CashFlowPayOff::DigitalOption(p) => p.option.amount += delta,
            CashFlowPayOff::ContingentRate(p) => p.rate.amount += delta,
            CashFlowPayOff::OptionStrategy(p) => p.add_amounts(delta),
        }
    }
}

impl From<FixedCashFlowPayOff> for CashFlowPayOff {
    fn from(p: FixedCashFlowPayOff) -> Self {
        CashFlowPayOff::Fixed(p)
    }
}

impl From<RateCashFlowPayOff> for CashFlowPayOff {
    fn from(p: RateCashFlowPayOff) -> Self {
        CashFlowPayOff::Rate(p)
    }
}

impl From<OptionCashFlowPayOff> for CashFlowPayOff {
    fn from(p: OptionCashFlowPayOff) -> Self {
        CashFlowPayOff::Option(p)
    }
}

impl From<DigitalOptionCashFlowPayOff> for CashFlowPayOff {
    fn from(p: DigitalOptionCashFlowPayOff) -> Self {
        CashFlowPayOff::DigitalOption(p)
    }
}

impl From<ContingentRateCashFlowPayOff> for CashFlowPayOff {
    fn from(p: ContingentRateCashFlowPayOff) -> Self {
        CashFlowPayOff::ContingentRate(p)
    }
}

impl From<OptionStrategyCashFlowPayOff> for CashFlowPayOff {
    fn from(p: OptionStrategyCashFlowPayOff) -> Self {
        CashFlowPayOff::OptionStrategy(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fixed_cashflow_is_its_amount() {
        let cf = FixedCashFlowPayOff::new(Date::new(0.25), 123.456);
        let details = cf.details(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(details.cashflow(), 123.456, epsilon = 1e-12);
    }

    #[test]
    fn fixed_cashflow_adds_price_forward() {
        let forward: Arc<dyn ForwardSource> = Arc::new(10.0);
        let cf = FixedCashFlowPayOff::new(Date::new(0.25), 100.0)
            .with_forward_curve(forward);
        let details = cf.details(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(details.cashflow(), 110.0, epsilon = 1e-12);
    }

    #[test]
    fn rate_cashflow_without_forward_curve() {
        let cf = RateCashFlowPayOff::new(Date::new(1.0), Date::new(1.25), Date::new(1.5), 1.0)
            .with_fixed_rate(0.005);
        let details = cf.details(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(details.cashflow(), 0.005 * 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(
            details.get("year fraction").unwrap().as_float().unwrap(),
            0.25,
            epsilon = 1e-12
        );
    }

    #[test]
    fn rate_cashflow_with_flat_forward() {
        let forward: Arc<dyn ForwardSource> = Arc::new(0.05);
        let cf = RateCashFlowPayOff::new(Date::new(1.0), Date::new(1.25), Date::new(1.5), 1.0)
            .with_fixed_rate(0.005)
            .with_forward_curve(forward);
        let details = cf.details(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(
            details.cashflow(),
            (0.005 + 0.05) * 0.25,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            details.get("forward rate").unwrap().as_float().unwrap(),
            0.05,
            epsilon = 1e-12
        );
    }

    #[test]
    fn explicit_curve_beats_stored_curve() {
        let stored: Arc<dyn ForwardSource> = Arc::new(0.05);
        let explicit: Arc<dyn ForwardSource> = Arc::new(0.03);
        let cf = RateCashFlowPayOff::new(Date::new(1.0), Date::new(1.25), Date::new(1.5), 1.0)
            .with_forward_curve(stored);
        let valuation = Valuation::new().with_forward_curve(explicit);
        let details = cf.details(&valuation).unwrap();
        assert_abs_diff_eq!(details.cashflow(), 0.03 * 0.25, epsilon = 1e-12);
    }

    #[test]
    fn option_without_any_curve_fails_with_strike() {
        let cf = OptionCashFlowPayOff::new(
            Date::new(0.25),
            1.0,
            Some(110.0),
            OptionType::Call,
        );
        assert!(matches!(
            cf.details(&Valuation::new()),
            Err(Error::MissingCurve(_))
        ));
    }

    #[test]
    fn option_intrinsic_fallback_off_bare_forward() {
        let forward: Arc<dyn ForwardSource> = Arc::new(100.0);
        let call = OptionCashFlowPayOff::new(
            Date::new(0.25),
            1.0,
            Some(110.0),
            OptionType::Call,
        )
        .with_forward_curve(forward.clone());
        let put = OptionCashFlowPayOff::new(
            Date::new(0.25),
            1.0,
            Some(110.0),
            OptionType::Put,
        )
        .with_forward_curve(forward);
        assert_eq!(call.details(&Valuation::new()).unwrap().cashflow(), 0.0);
        assert_eq!(put.details(&Valuation::new()).unwrap().cashflow(), 10.0);
    }

    #[test]
    fn digital_intrinsic_steps_off_bare_forward() {
        let forward: Arc<dyn ForwardSource> = Arc::new(100.0);
        let above = DigitalOptionCashFlowPayOff::new(
            Date::new(0.25),
            2.0,
            Some(90.0),
            OptionType::Call,
        )
        .with_forward_curve(forward.clone());
        let below = DigitalOptionCashFlowPayOff::new(
            Date::new(0.25),
            2.0,
            Some(110.0),
            OptionType::Call,
        )
        .with_forward_curve(forward.clone());
        assert_eq!(above.details(&Valuation::new()).unwrap().cashflow(), 2.0);
        assert_eq!(below.details(&Valuation::new()).unwrap().cashflow(), 0.0);

        // a strikeless digital always pays its amount
        let strikeless =
            DigitalOptionCashFlowPayOff::new(Date::new(0.25), 2.0, None, OptionType::Call)
                .with_forward_curve(forward);
        assert_eq!(
            strikeless.details(&Valuation::new()).unwrap().cashflow(),
            2.0
        );
    }

    #[test]
    fn strategy_sorts_puts_before_calls() {
        let strategy = OptionStrategyCashFlowPayOff::new(
            Date::new(1.0),
            Date::new(1.0),
            &[1.0, -2.0, 1.0],
            &[100.0, 110.0, 120.0],
            &[1.0],
            &[110.0],
        )
        .unwrap();
        let strikes: Vec<f64> =
            strategy.options().iter().filter_map(|o| o.strike).collect();
        assert_eq!(strikes, vec![100.0, 110.0, 110.0, 120.0]);
        // at 110 the put leg precedes the call leg
        assert!(strategy.options()[1].option_type.is_put());
        assert!(!strategy.options()[2].option_type.is_put());
    }

    #[test]
    fn contingent_rate_without_model_is_plain_rate() {
        let rate =
            RateCashFlowPayOff::new(Date::new(1.0), Date::new(1.25), Date::new(1.5), 1.0)
                .with_fixed_rate(0.005);
        let cf = ContingentRateCashFlowPayOff::new(rate).with_floor_strike(0.002);
        let details = cf.details(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(details.cashflow(), 0.00125, epsilon = 1e-12);
    }
}

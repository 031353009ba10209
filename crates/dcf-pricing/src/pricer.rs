//! Pricing routines.
//!
//! All functions take a cashflow list, a discount curve, and an optional
//! valuation date (default: the discount curve's origin).  Pricing is a
//! pure function of its inputs; solvers work on clones and leave the
//! supplied list untouched.

use std::sync::Arc;

use dcf_cashflows::{CashFlowList, CashFlowPayOff, Valuation};
use dcf_core::{ensure_kind, errors::Result, Error, Rate, Real};
use dcf_curves::{ForwardSource, InterestRateCurve, RateStorage};
use dcf_math::bracketing;
use dcf_time::{Date, Period};

/// One basis point.
const BASIS_POINT: Real = 1e-4;

/// Which curves a sensitivity shift applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTarget {
    /// Shift the discount curve only.
    Discount,
    /// Shift the payoffs' shared forward curve only.
    Forward,
    /// Shift both.
    Both,
}

/// A parallel or tent-shaped spread, evaluated per date.
#[derive(Debug, Clone, Copy)]
enum Spread {
    Flat(Real),
    /// 1bp-style tent: zero at `prev`, `size` at `node`, zero at `next`.
    /// A missing shoulder extends the peak flat to that side.
    Tent {
        prev: Option<Date>,
        node: Date,
        next: Option<Date>,
        size: Real,
    },
}

impl Spread {
    fn value(&self, d: Date) -> Real {
        match *self {
            Spread::Flat(size) => size,
            Spread::Tent {
                prev,
                node,
                next,
                size,
            } => {
                if d < node {
                    match prev {
                        None => size,
                        Some(prev) if d <= prev => 0.0,
                        Some(prev) => {
                            size * (d - prev).as_years() / (node - prev).as_years()
                        }
                    }
                } else {
                    match next {
                        None => size,
                        Some(next) if next <= d => 0.0,
                        Some(next) => {
                            size * (next - d).as_years() / (next - node).as_years()
                        }
                    }
                }
            }
        }
    }

    fn knot_dates(&self) -> Vec<Date> {
        match *self {
            Spread::Flat(_) => Vec::new(),
            Spread::Tent {
                prev, node, next, ..
            } => prev
                .into_iter()
                .chain(std::iter::once(node))
                .chain(next)
                .collect(),
        }
    }
}

/// A forward source with an additive spread on its values.
#[derive(Debug)]
struct SpreadedForward {
    inner: Arc<dyn ForwardSource>,
    spread: Spread,
}

impl ForwardSource for SpreadedForward {
    fn forward_value(&self, date: Date) -> Result<Real> {
        Ok(self.inner.forward_value(date)? + self.spread.value(date))
    }

    fn forward_tenor(&self) -> Option<Period> {
        self.inner.forward_tenor()
    }
}

// ── Present value ────────────────────────────────────────────────────────────

/// Present value of a cashflow list:
/// `Σ df(valuation_date, pay_dateᵢ) · cashflowᵢ` over the payoffs paying
/// on or after the valuation date (strictly after when the list excludes
/// the value date).
pub fn present_value(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
) -> Result<Real> {
    present_value_with(
        cashflow_list,
        discount_curve,
        valuation_date,
        &Valuation::new(),
    )
}

/// Present value with explicit valuation-context overrides (explicit
/// curves win over the curves stored on the payoffs).
pub fn present_value_with(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
    valuation: &Valuation,
) -> Result<Real> {
    let valuation_date = valuation_date.unwrap_or_else(|| discount_curve.origin());
    let mut value = 0.0;
    for payoff in cashflow_list.payoffs() {
        let pay_date = payoff.pay_date();
        let pays = if cashflow_list.excludes_value_date() {
            valuation_date < pay_date
        } else {
            valuation_date <= pay_date
        };
        if !pays {
            continue;
        }
        let df = discount_curve.discount_factor(valuation_date, pay_date)?;
        value += df * payoff.cashflow(valuation)?;
    }
    Ok(value)
}

// ── Yield to maturity ────────────────────────────────────────────────────────

/// The flat continuously compounded rate whose zero curve reprices the
/// list to `target_pv`.  Bracketed in `[−0.1, 0.2]` at 1e-2 precision.
pub fn yield_to_maturity(
    cashflow_list: &CashFlowList,
    valuation_date: Option<Date>,
    target_pv: Real,
) -> Result<Rate> {
    let valuation_date = valuation_date
        .or_else(|| cashflow_list.origin())
        .ok_or_else(|| Error::Domain("yield of an empty cashflow list".into()))?;
    bracketing(
        |rate| {
            let flat = InterestRateCurve::zero_rates(&[valuation_date], &[rate])?;
            Ok(present_value(cashflow_list, &flat, Some(valuation_date))? - target_pv)
        },
        -0.1,
        0.2,
        1e-2,
    )
}

// ── Fair rate ────────────────────────────────────────────────────────────────

/// The fixed rate at which the list reprices to `target_pv`.
///
/// The solver works on clones; the supplied list keeps its fixed rate.
/// Bracketed in `[−0.1, 0.2]` at 1e-7 precision.
pub fn fair_rate(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
    target_pv: Real,
) -> Result<Rate> {
    // fails early when rate-bearing payoffs disagree
    let current = cashflow_list.fixed_rate()?;
    if current.is_none() {
        return Err(Error::MissingCurve(
            "fair rate requires rate-bearing payoffs".into(),
        ));
    }
    let valuation_date =
        valuation_date.or_else(|| cashflow_list.origin());
    bracketing(
        |rate| {
            let mut trial = cashflow_list.clone();
            trial.set_fixed_rate(rate);
            Ok(present_value(&trial, discount_curve, valuation_date)? - target_pv)
        },
        -0.1,
        0.2,
        1e-7,
    )
}

// ── Accrued interest ─────────────────────────────────────────────────────────

/// The pro-rata un-paid portion of the next rate coupon for a valuation
/// date strictly between the first and last pay date:
/// `next_cf · (1 − remaining/total)`.
pub fn interest_accrued(
    cashflow_list: &CashFlowList,
    valuation_date: Date,
) -> Result<Real> {
    let mut pay_dates = cashflow_list.domain();
    pay_dates.sort();
    let (Some(&first), Some(&last)) = (pay_dates.first(), pay_dates.last()) else {
        return Ok(0.0);
    };
    if !(first < valuation_date && valuation_date < last) {
        return Ok(0.0);
    }
    let previous = pay_dates
        .iter()
        .copied()
        .filter(|&d| d < valuation_date)
        .next_back()
        .unwrap_or(first);
    let next = pay_dates
        .iter()
        .copied()
        .find(|&d| valuation_date <= d)
        .unwrap_or(last);

    let mut accrued = 0.0;
    for payoff in cashflow_list.payoffs() {
        let (day_count, is_rate) = match payoff {
            CashFlowPayOff::Rate(p) => (p.day_count.clone(), true),
            CashFlowPayOff::ContingentRate(p) => (p.rate.day_count.clone(), true),
            _ => (None, false),
        };
        if !is_rate || payoff.pay_date() != next {
            continue;
        }
        let day_count = day_count.unwrap_or_else(dcf_time::default_day_count);
        let total = day_count.year_fraction(previous, next);
        let remaining = day_count.year_fraction(valuation_date, next);
        accrued += payoff.cashflow(&Valuation::new())? * (1.0 - remaining / total);
    }
    Ok(accrued)
}

// ── Sensitivities ────────────────────────────────────────────────────────────

/// The single forward curve shared by the list's payoffs.
fn shared_forward_curve(cashflow_list: &CashFlowList) -> Result<Arc<dyn ForwardSource>> {
    let mut found: Option<Arc<dyn ForwardSource>> = None;
    for payoff in cashflow_list.payoffs() {
        if let Some(curve) = payoff.forward_curve() {
            match &found {
                None => found = Some(curve),
                Some(existing) => {
                    if !Arc::ptr_eq(existing, &curve) {
                        return Err(Error::Config(
                            "forward shift requires a single shared forward curve"
                                .into(),
                        ));
                    }
                }
            }
        }
    }
    found.ok_or_else(|| {
        Error::MissingCurve("no forward curve stored on any payoff".into())
    })
}

fn shifted_pv(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
    target: ShiftTarget,
    spread: Spread,
) -> Result<Real> {
    let shift_discount =
        matches!(target, ShiftTarget::Discount | ShiftTarget::Both);
    let shift_forward = matches!(target, ShiftTarget::Forward | ShiftTarget::Both);

    let discount = if shift_discount {
        Some(discount_curve.shifted(|d| spread.value(d), &spread.knot_dates())?)
    } else {
        None
    };
    let discount = discount.as_ref().unwrap_or(discount_curve);

    let mut valuation = Valuation::new();
    if shift_forward {
        let inner = shared_forward_curve(cashflow_list)?;
        valuation.forward_curve = Some(Arc::new(SpreadedForward { inner, spread }));
    }
    present_value_with(cashflow_list, discount, valuation_date, &valuation)
}

/// Basis-point value: the change in present value under a +1bp parallel
/// shift of the target curves.
pub fn basis_point_value(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
    target: ShiftTarget,
) -> Result<Real> {
    let base = present_value(cashflow_list, discount_curve, valuation_date)?;
    let shifted = shifted_pv(
        cashflow_list,
        discount_curve,
        valuation_date,
        target,
        Spread::Flat(BASIS_POINT),
    )?;
    Ok(shifted - base)
}

/// Bucketed deltas: for every bucket date, the present-value change under
/// a tent-shaped +1bp perturbation peaking at that date and vanishing at
/// the neighbouring bucket dates.  Zero-width buckets are skipped with a
/// warning.  With bucket dates spanning the curve grid the bucket sum
/// approximates the parallel basis-point value.
pub fn bucketed_delta(
    cashflow_list: &CashFlowList,
    discount_curve: &InterestRateCurve,
    valuation_date: Option<Date>,
    delta_grid: &[Date],
    target: ShiftTarget,
) -> Result<Vec<Real>> {
    ensure_kind!(
        Domain,
        !delta_grid.is_empty(),
        "bucketed delta requires at least one bucket date"
    );
    let base = present_value(cashflow_list, discount_curve, valuation_date)?;
    let mut deltas = Vec::with_capacity(delta_grid.len());
    for (i, &node) in delta_grid.iter().enumerate() {
        let prev = (i > 0).then(|| delta_grid[i - 1]);
        let next = delta_grid.get(i + 1).copied();
        if prev == Some(node) || next == Some(node) {
            log::warn!("skipping zero-width sensitivity bucket at {node}");
            deltas.push(0.0);
            continue;
        }
        let spread = Spread::Tent {
            prev,
            node,
            next,
            size: BASIS_POINT,
        };
        let shifted = shifted_pv(
            cashflow_list,
            discount_curve,
            valuation_date,
            target,
            spread,
        )?;
        deltas.push(shifted - base);
    }
    Ok(deltas)
}

// ── Curve fitting ────────────────────────────────────────────────────────────

const FIT_SWEEPS: usize = 10;

/// Fit the curve's stored values at `pillars` so that each calibration
/// product's present value matches its target, by successive univariate
/// bracketing at each pillar.
pub fn fit_curve(
    initial: &InterestRateCurve,
    pillars: &[Date],
    products: &[CashFlowList],
    target_pvs: &[Real],
    precision: Real,
) -> Result<InterestRateCurve> {
    ensure_kind!(
        Shape,
        pillars.len() == products.len() && products.len() == target_pvs.len(),
        "pillars ({}), products ({}), and targets ({}) must have the same length",
        pillars.len(),
        products.len(),
        target_pvs.len()
    );
    let (lo, hi) = match initial.storage() {
        RateStorage::DiscountFactor => (1e-4, 2.0),
        _ => (-0.1, 0.2),
    };

    // seed every pillar so the grids stay fixed during the sweeps
    let mut curve = initial.clone();
    for &pillar in pillars {
        let value = curve.storage_value(pillar)?;
        curve = curve.with_storage_value(pillar, value)?;
    }

    for _ in 0..FIT_SWEEPS {
        for ((&pillar, product), &target) in
            pillars.iter().zip(products).zip(target_pvs)
        {
            let value = bracketing(
                |value| {
                    let trial = curve.with_storage_value(pillar, value)?;
                    Ok(present_value(product, &trial, None)? - target)
                },
                lo,
                hi,
                precision,
            )?;
            curve = curve.with_storage_value(pillar, value)?;
        }

        let worst = pillars
            .iter()
            .zip(products)
            .zip(target_pvs)
            .map(|((_, product), &target)| {
                Ok((present_value(product, &curve, None)? - target).abs())
            })
            .collect::<Result<Vec<Real>>>()?
            .into_iter()
            .fold(0.0_f64, Real::max);
        if worst < precision {
            break;
        }
    }
    Ok(curve)
}

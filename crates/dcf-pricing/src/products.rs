//! Schedule-driven product builders.

use std::sync::Arc;

use dcf_cashflows::CashFlowList;
use dcf_core::{ensure, ensure_kind, errors::Result, Rate, Real};
use dcf_curves::ForwardSource;
use dcf_time::{Date, DayCount, Period};

/// Payment dates between `start` (exclusive) and `end` (inclusive),
/// rolled backward from `end` in steps of `period`; a short stub sits at
/// the front.
pub fn payment_schedule(start: Date, end: Date, period: Period) -> Result<Vec<Date>> {
    ensure!(period.is_positive(), "schedule period must be positive");
    ensure!(start < end, "schedule start must precede end");
    let mut dates = Vec::new();
    let mut current = end;
    while start < current {
        dates.push(current);
        current = current - period;
    }
    dates.reverse();
    Ok(dates)
}

/// A bullet bond: notional exchange (−N at start, +N at end) plus a
/// fixed/float coupon leg on notional N.
#[allow(clippy::too_many_arguments)]
pub fn bond(
    start: Date,
    end: Date,
    period: Period,
    notional: Real,
    fixed_rate: Rate,
    day_count: Option<Arc<dyn DayCount>>,
    forward_curve: Option<Arc<dyn ForwardSource>>,
) -> Result<CashFlowList> {
    let coupon_dates = payment_schedule(start, end, period)?;

    let notional_leg =
        CashFlowList::from_fixed_cashflows(&[start, end], &[-notional, notional])?
            .with_origin(start);

    let mut coupon_leg = CashFlowList::from_rate_cashflows(&coupon_dates)
        .with_origin(start)
        .with_amount(notional)
        .with_fixed_rate(fixed_rate);
    if let Some(day_count) = day_count {
        coupon_leg = coupon_leg.with_day_count(day_count);
    }
    if let Some(curve) = forward_curve {
        coupon_leg = coupon_leg.with_forward_curve(curve);
    }

    Ok(notional_leg + coupon_leg.build()?)
}

/// A plain-vanilla interest-rate swap: pay fixed on `pay_period`, receive
/// float (estimated off `forward_curve`) on `rec_period`.
#[allow(clippy::too_many_arguments)]
pub fn interest_rate_swap(
    start: Date,
    end: Date,
    pay_period: Period,
    rec_period: Period,
    notional: Real,
    fixed_rate: Rate,
    forward_curve: Arc<dyn ForwardSource>,
) -> Result<CashFlowList> {
    let pay_dates = payment_schedule(start, end, pay_period)?;
    let pay_leg = CashFlowList::from_rate_cashflows(&pay_dates)
        .with_origin(start)
        .with_amount(-notional)
        .with_fixed_rate(fixed_rate)
        .build()?;

    let rec_dates = payment_schedule(start, end, rec_period)?;
    let rec_leg = CashFlowList::from_rate_cashflows(&rec_dates)
        .with_origin(start)
        .with_amount(notional)
        .with_forward_curve(forward_curve)
        .build()?;

    Ok(pay_leg + rec_leg)
}

/// An asset swap: pay away the coupon leg, receive float plus `spread` on
/// `notional`, rolled at the forward curve's tenor.
pub fn asset_swap(
    coupon_leg: CashFlowList,
    notional: Real,
    forward_curve: Arc<dyn ForwardSource>,
    spread: Rate,
) -> Result<CashFlowList> {
    let origin = coupon_leg
        .origin()
        .ok_or_else(|| dcf_core::Error::Domain("asset swap of an empty leg".into()))?;
    let mut pay_dates = coupon_leg.domain();
    pay_dates.sort();
    let last = *pay_dates.last().ok_or_else(|| {
        dcf_core::Error::Domain("asset swap of an empty leg".into())
    })?;
    ensure_kind!(
        Domain,
        origin < last,
        "asset swap needs a coupon leg extending beyond its origin"
    );

    let tenor = forward_curve
        .forward_tenor()
        .unwrap_or_else(|| Period::months(3.0));
    let rec_dates = payment_schedule(origin, last, tenor)?;
    let rec_leg = CashFlowList::from_rate_cashflows(&rec_dates)
        .with_origin(origin)
        .with_amount(notional)
        .with_fixed_rate(spread)
        .with_forward_curve(forward_curve)
        .build()?;

    Ok((-coupon_leg) + rec_leg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use dcf_cashflows::{CashFlowPayOff, Valuation};
    use dcf_curves::InterestRateCurve;
    use dcf_time::Date;

    #[test]
    fn schedule_rolls_backward_with_front_stub() {
        let dates = payment_schedule(
            Date::new(0.0),
            Date::new(2.25),
            Period::years(1.0),
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![Date::new(0.25), Date::new(1.25), Date::new(2.25)]
        );
    }

    #[test]
    fn schedule_rejects_degenerate_input() {
        assert!(payment_schedule(Date::new(1.0), Date::new(1.0), Period::years(1.0))
            .is_err());
        assert!(payment_schedule(Date::new(0.0), Date::new(1.0), Period::years(0.0))
            .is_err());
    }

    #[test]
    fn bond_has_notional_exchange_and_coupons() {
        let bond = bond(
            Date::new(0.0),
            Date::new(5.0),
            Period::years(1.0),
            1.0,
            0.01,
            None,
            None,
        )
        .unwrap();
        // 2 notional flows + 5 coupons
        assert_eq!(bond.len(), 7);
        let flows = bond.cashflows(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(flows[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(flows[1], 1.0, epsilon = 1e-12);
        for coupon in &flows[2..] {
            assert_abs_diff_eq!(*coupon, 0.01, epsilon = 1e-10);
        }
    }

    #[test]
    fn swap_legs_have_opposite_signs() {
        let forward: Arc<dyn ForwardSource> = Arc::new(
            InterestRateCurve::zero_rates(&[Date::new(0.0)], &[0.02]).unwrap(),
        );
        let swap = interest_rate_swap(
            Date::new(0.0),
            Date::new(2.0),
            Period::years(1.0),
            Period::months(6.0),
            100.0,
            0.02,
            forward,
        )
        .unwrap();
        // 2 fixed payments + 4 float receipts
        assert_eq!(swap.len(), 6);
        let fixed_count = swap
            .payoffs()
            .iter()
            .filter(|p| match p {
                CashFlowPayOff::Rate(r) => r.amount < 0.0,
                _ => false,
            })
            .count();
        assert_eq!(fixed_count, 2);
    }

    #[test]
    fn asset_swap_flips_the_coupon_leg() {
        let forward: Arc<dyn ForwardSource> = Arc::new(
            InterestRateCurve::zero_rates(&[Date::new(0.0)], &[0.02]).unwrap(),
        );
        let coupons = CashFlowList::from_rate_cashflows(&[Date::new(1.0), Date::new(2.0)])
            .with_origin(Date::new(0.0))
            .with_amount(100.0)
            .with_fixed_rate(0.03)
            .build()
            .unwrap();
        let package = asset_swap(coupons, 100.0, forward, 0.001).unwrap();
        // 2 flipped coupons + 8 quarterly float receipts
        assert_eq!(package.len(), 10);
        let flows = package.cashflows(&Valuation::new()).unwrap();
        assert_abs_diff_eq!(flows[0], -3.0, epsilon = 1e-10);
    }
}

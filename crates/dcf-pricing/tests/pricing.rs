//! End-to-end pricing scenarios across curves, payoffs, and the pricer.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use dcf_cashflows::{CashFlowList, OptionType, Valuation};
use dcf_curves::{ForwardCurve, ForwardSource, InterestRateCurve};
use dcf_options::OptionPricingCurve;
use dcf_pricing::{
    basis_point_value, bucketed_delta, fair_rate, present_value, ShiftTarget,
};
use dcf_time::{Date, Period};

fn dates(xs: &[f64]) -> Vec<Date> {
    xs.iter().map(|&x| Date::new(x)).collect()
}

#[test]
fn flat_two_percent_curve_discounts_and_forwards() {
    let origin = Date::new(0.0);
    let curve = InterestRateCurve::zero_rates(&[origin], &[0.02]).unwrap();
    let horizon = origin + Period::years(1.0);

    assert_abs_diff_eq!(
        curve.discount_factor(origin, horizon).unwrap(),
        0.980_198_7,
        epsilon = 1e-7
    );
    assert_abs_diff_eq!(
        curve
            .cash_rate_with_step(origin, Period::years(1.0))
            .unwrap(),
        0.020_201_34,
        epsilon = 1e-7
    );
}

#[test]
fn rate_cashflow_scenarios() {
    // fixed 0.5% over a quarter year on unit notional
    let payoff = dcf_cashflows::RateCashFlowPayOff::new(
        Date::new(1.0),
        Date::new(1.25),
        Date::new(1.5),
        1.0,
    )
    .with_fixed_rate(0.005);
    assert_abs_diff_eq!(
        payoff.details(&Valuation::new()).unwrap().cashflow(),
        0.001_25,
        epsilon = 1e-12
    );

    let with_forward = payoff.with_forward_curve(Arc::new(0.05));
    assert_abs_diff_eq!(
        with_forward.details(&Valuation::new()).unwrap().cashflow(),
        0.013_75,
        epsilon = 1e-12
    );
}

fn black_model() -> Arc<OptionPricingCurve> {
    // spot 100 with a 5% funding yield, flat 10% volatility
    let grid: Vec<Date> = (0..=4).map(|i| Date::new(i as f64 * 0.25)).collect();
    let prices: Vec<f64> = grid
        .iter()
        .map(|d| 100.0 * (0.05 * d.as_years()).exp())
        .collect();
    let forward = Arc::new(ForwardCurve::new(&grid, &prices).unwrap());
    Arc::new(OptionPricingCurve::black76(
        forward,
        Arc::new(0.1),
        Date::new(0.0),
    ))
}

#[test]
fn european_option_scenarios() {
    // intrinsic: zero volatility
    let forward: Arc<dyn ForwardSource> = Arc::new(100.0);
    let intrinsic = Arc::new(OptionPricingCurve::black76(
        forward,
        Arc::new(0.0),
        Date::new(0.0),
    ));
    let expiry = Date::new(0.25);
    assert_abs_diff_eq!(
        intrinsic.call(expiry, Some(110.0)).unwrap(),
        0.0,
        epsilon = 1e-12
    );
    assert_abs_diff_eq!(
        intrinsic.put(expiry, Some(110.0)).unwrap(),
        10.0,
        epsilon = 1e-12
    );

    // Black-76 at the spec reference point
    let model = black_model();
    assert_abs_diff_eq!(
        model.call(expiry, Some(110.0)).unwrap(),
        0.107_27,
        epsilon = 1e-5
    );
    assert_abs_diff_eq!(
        model.put(expiry, Some(110.0)).unwrap(),
        8.849_4,
        epsilon = 1e-4
    );
}

#[test]
fn option_cashflow_lists_price_through_the_pricer() {
    let model = black_model();
    let list = CashFlowList::from_option_cashflows(&dates(&[0.25]))
        .with_strike(110.0)
        .with_option_type(OptionType::Call)
        .with_option_curve(model)
        .build()
        .unwrap();
    let disc = InterestRateCurve::zero_rates(&[Date::new(0.0)], &[0.0]).unwrap();
    let pv = present_value(&list, &disc, None).unwrap();
    assert_abs_diff_eq!(pv, 0.107_27, epsilon = 1e-5);
}

#[test]
fn five_year_bond_par_rate_on_flat_curve() {
    let origin = Date::new(0.0);
    let disc = InterestRateCurve::zero_rates(&[origin], &[0.01]).unwrap();
    let bond = dcf_pricing::bond(
        origin,
        Date::new(5.0),
        Period::years(1.0),
        1.0,
        0.0,
        None,
        None,
    )
    .unwrap();

    let par = fair_rate(&bond, &disc, Some(origin), 0.0).unwrap();

    // the analytic par rate of a bullet bond: (1 − df(5)) / Σᵢ df(tᵢ),
    // each coupon discounted at its pay date
    let df5 = disc.discount_factor(origin, Date::new(5.0)).unwrap();
    let mut coupon_annuity = 0.0;
    for pay in dates(&[1.0, 2.0, 3.0, 4.0, 5.0]) {
        coupon_annuity += disc.discount_factor(origin, pay).unwrap();
    }
    assert_abs_diff_eq!(par, (1.0 - df5) / coupon_annuity, epsilon = 1e-6);
    assert_abs_diff_eq!(par, 0.01, epsilon = 1e-4);

    // par-rate recovery: repricing at the solved rate hits the target
    let mut repriced = bond.clone();
    repriced.set_fixed_rate(par);
    let pv = present_value(&repriced, &disc, Some(origin)).unwrap();
    assert_abs_diff_eq!(pv, 0.0, epsilon = 1e-7);
}

#[test]
fn bucketed_deltas_reconcile_with_parallel_bpv() {
    let origin = Date::new(0.0);
    let disc = InterestRateCurve::zero_rates(
        &dates(&[0.0, 1.0, 2.0, 5.0]),
        &[0.01, 0.012, 0.016, 0.02],
    )
    .unwrap();
    let bond = dcf_pricing::bond(
        origin,
        Date::new(5.0),
        Period::years(1.0),
        100.0,
        0.02,
        None,
        None,
    )
    .unwrap();

    let parallel = basis_point_value(&bond, &disc, None, ShiftTarget::Discount).unwrap();
    let buckets = bucketed_delta(
        &bond,
        &disc,
        None,
        &dates(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]),
        ShiftTarget::Discount,
    )
    .unwrap();
    let sum: f64 = buckets.iter().sum();
    assert!(
        (sum - parallel).abs() <= 0.005 * parallel.abs(),
        "bucket sum {sum} vs parallel bpv {parallel}"
    );
    // the long end carries most of the risk
    assert!(buckets[5].abs() > buckets[1].abs());
}

//! Storage round-trip invariants: building a curve of storage type B from
//! an instance of type A and back must reproduce A's query values at A's
//! grid points.

use approx::assert_abs_diff_eq;
use dcf_curves::{
    CreditCurve, CreditStorage, InterestRateCurve, RateStorage, VolStorage,
    VolatilityCurve,
};
use dcf_time::Date;

fn dates(xs: &[f64]) -> Vec<Date> {
    xs.iter().map(|&x| Date::new(x)).collect()
}

const RATE_STORAGES: [RateStorage; 4] = [
    RateStorage::DiscountFactor,
    RateStorage::ZeroRate,
    RateStorage::ShortRate,
    RateStorage::CashRate,
];

const CREDIT_STORAGES: [CreditStorage; 6] = [
    CreditStorage::SurvivalProbability,
    CreditStorage::DefaultProbability,
    CreditStorage::FlatIntensity,
    CreditStorage::HazardRate,
    CreditStorage::MarginalSurvival,
    CreditStorage::MarginalDefault,
];

#[test]
fn flat_rate_curve_round_trips_every_storage_pair() {
    let domain = dates(&[0.0, 1.0, 2.0, 3.0]);
    let original =
        InterestRateCurve::zero_rates(&domain, &[0.02, 0.02, 0.02, 0.02]).unwrap();
    let origin = original.origin();

    for b in RATE_STORAGES {
        let via = InterestRateCurve::from_curve(&original, b).unwrap();
        let back = InterestRateCurve::from_curve(&via, RateStorage::ZeroRate).unwrap();
        for &d in domain.iter().filter(|&&d| origin < d) {
            assert_abs_diff_eq!(
                back.zero_rate(origin, d).unwrap(),
                original.zero_rate(origin, d).unwrap(),
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn flat_discount_round_trips_discount_factors() {
    let domain = dates(&[0.0, 0.5, 1.0, 2.0, 5.0]);
    let data: Vec<f64> = domain
        .iter()
        .map(|d| (-0.015 * d.as_years()).exp())
        .collect();
    let original = InterestRateCurve::discount_factors(&domain, &data).unwrap();
    let origin = original.origin();

    for b in RATE_STORAGES {
        let via = InterestRateCurve::from_curve(&original, b).unwrap();
        let back =
            InterestRateCurve::from_curve(&via, RateStorage::DiscountFactor).unwrap();
        for &d in &domain {
            assert_abs_diff_eq!(
                back.discount_factor(origin, d).unwrap(),
                original.discount_factor(origin, d).unwrap(),
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn cash_zero_round_trip_on_sloped_curve() {
    let domain = dates(&[0.0, 1.0, 2.0, 3.0]);
    let original =
        InterestRateCurve::zero_rates(&domain, &[0.01, 0.015, 0.02, 0.022]).unwrap();
    let origin = original.origin();

    let cash = InterestRateCurve::from_curve(&original, RateStorage::CashRate).unwrap();
    let back = InterestRateCurve::from_curve(&cash, RateStorage::ZeroRate).unwrap();
    for &d in domain.iter().filter(|&&d| origin < d) {
        let a = original.zero_rate(origin, d).unwrap();
        let b = back.zero_rate(origin, d).unwrap();
        assert!((a - b).abs() < 1e-2, "zero rate {a} vs round-tripped {b}");
        // cash rates agree to the same tolerance
        let ca = original.cash_rate(d).unwrap();
        let cb = back.cash_rate(d).unwrap();
        assert!((ca - cb).abs() < 1e-2, "cash rate {ca} vs round-tripped {cb}");
    }
}

#[test]
fn flat_credit_curve_round_trips_every_storage_pair() {
    let domain = dates(&[0.0, 1.0, 2.0, 3.0]);
    let original =
        CreditCurve::flat_intensities(&domain, &[0.02, 0.02, 0.02, 0.02]).unwrap();
    let origin = original.origin();

    for b in CREDIT_STORAGES {
        let via = CreditCurve::from_curve(&original, b).unwrap();
        let back = CreditCurve::from_curve(&via, CreditStorage::FlatIntensity).unwrap();
        for &d in domain.iter().filter(|&&d| origin < d) {
            assert_abs_diff_eq!(
                back.flat_intensity(origin, d).unwrap(),
                original.flat_intensity(origin, d).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn survival_curve_survives_complement_round_trip() {
    let domain = dates(&[0.0, 1.0, 3.0]);
    let data = [1.0, 0.98, 0.93];
    let original = CreditCurve::survival_probabilities(&domain, &data).unwrap();
    let origin = original.origin();

    let pd = CreditCurve::from_curve(&original, CreditStorage::DefaultProbability)
        .unwrap();
    let back =
        CreditCurve::from_curve(&pd, CreditStorage::SurvivalProbability).unwrap();
    for &d in &domain {
        assert_abs_diff_eq!(
            back.survival_probability(origin, d).unwrap(),
            original.survival_probability(origin, d).unwrap(),
            epsilon = 1e-10
        );
    }
}

#[test]
fn flat_vol_curve_round_trips_both_storages() {
    let domain = dates(&[0.0, 1.0, 2.0]);
    let original = VolatilityCurve::terminal(&domain, &[0.1, 0.1, 0.1]).unwrap();
    let origin = original.origin();

    for b in [VolStorage::Instantaneous, VolStorage::Terminal] {
        let via = VolatilityCurve::from_curve(&original, b).unwrap();
        let back = VolatilityCurve::from_curve(&via, VolStorage::Terminal).unwrap();
        for &d in domain.iter().filter(|&&d| origin < d) {
            assert_abs_diff_eq!(
                back.terminal_vol(d).unwrap(),
                original.terminal_vol(d).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dcf_math::Scheme;

fn bench_interpolation(c: &mut Criterion) {
    let xs: Vec<f64> = (0..50).map(|i| i as f64 * 0.25).collect();
    let ys: Vec<f64> = xs.iter().map(|x| (-0.02 * x).exp()).collect();

    let linear = Scheme::linear().build(&xs, &ys).unwrap();
    c.bench_function("linear_query", |b| {
        b.iter(|| linear.value(black_box(6.125)).unwrap())
    });

    let llr = Scheme::log_linear_rate().build(&xs, &ys).unwrap();
    c.bench_function("log_linear_rate_query", |b| {
        b.iter(|| llr.value(black_box(6.125)).unwrap())
    });

    c.bench_function("log_linear_rate_build", |b| {
        b.iter(|| Scheme::log_linear_rate().build(black_box(&xs), black_box(&ys)))
    });
}

criterion_group!(benches, bench_interpolation);
criterion_main!(benches);

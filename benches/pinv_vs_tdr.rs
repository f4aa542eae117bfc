use criterion::Benchmark;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};

use unuran::distr::standard;
use unuran::method::pinv::PinvParams;
use unuran::method::tdr::TdrParams;
use unuran::urng::StdUrng;

fn bench_normal_sampling(c: &mut Criterion) {
    c.bench(
        "normal_sampling",
        Benchmark::new("tdr", |b| {
            let params = TdrParams::new(standard::normal(), Box::new(StdUrng::seed_from_u64(1))).construction_points(vec![-1.0, 0.0, 1.0]);
            let mut gen = params.init().unwrap();
            b.iter(|| gen.sample())
        })
        .with_function("pinv", |b| {
            let params = PinvParams::new(standard::normal(), Box::new(StdUrng::seed_from_u64(1)));
            let mut gen = params.init().unwrap();
            b.iter(|| gen.sample())
        }),
    );
}

criterion_group!(normal_benches, bench_normal_sampling);
criterion_main!(normal_benches);

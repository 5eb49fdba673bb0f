use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kalman_rudolf::scenario;
use ndarray::{arr1, Array2};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn kalman_estimate_benchmark(c: &mut Criterion) {
    let system = scenario::projectile::<f64>().unwrap();
    let (_, observations) = system
        .evolve(&arr1(&[0.0, 0.0, 300.0, 600.0]), 1000, &mut StdRng::seed_from_u64(0))
        .unwrap();
    let initial_covariance = Array2::eye(4) * 1e6;
    c.bench_function("Kalman filter estimate over 1000 observations", |b| {
        b.iter(|| {
            system.estimate(
                &black_box(arr1(&[0.0, 0.0, 300.0, 600.0])),
                &initial_covariance,
                black_box(&observations),
            )
        })
    });
}

pub fn kalman_predict_benchmark(c: &mut Criterion) {
    let system = scenario::projectile::<f64>().unwrap();
    c.bench_function("Kalman system predict for 1000 steps", |b| {
        b.iter(|| system.predict(&black_box(arr1(&[0.0, 0.0, 300.0, 600.0])), 1000))
    });
    c.bench_function("Kalman system rewind for 1000 steps", |b| {
        b.iter(|| system.rewind(&black_box(arr1(&[0.0, 0.0, 300.0, 600.0])), 1000))
    });
}

pub fn kalman_evolve_benchmark(c: &mut Criterion) {
    let system = scenario::projectile::<f64>().unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    c.bench_function("Kalman system evolve for 1000 steps", |b| {
        b.iter_with_large_drop(|| {
            system.evolve(&black_box(arr1(&[0.0, 0.0, 300.0, 600.0])), 1000, &mut rng)
        })
    });
}

criterion_group!(estimate, kalman_estimate_benchmark);
criterion_group!(predict, kalman_predict_benchmark);
criterion_group!(evolve, kalman_evolve_benchmark);
criterion_main!(estimate, predict, evolve);

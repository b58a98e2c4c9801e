//! Benchmarks for the integrator envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use morphslew_dsp::dsp::{IntegratorEnvelope, IntegratorParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_integrator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/integrator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Linear: no curve math
        let params = IntegratorParams::new(0.01, 0.01, 0.0, true);
        let mut env = IntegratorEnvelope::new();
        env.trigger(1.0);
        group.bench_with_input(BenchmarkId::new("linear", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), &params, SAMPLE_RATE))
        });

        // Exponential: exp() per sample
        let params = IntegratorParams::new(0.01, 0.01, -0.8, true);
        let mut env = IntegratorEnvelope::new();
        env.trigger(1.0);
        group.bench_with_input(BenchmarkId::new("exponential", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), &params, SAMPLE_RATE))
        });

        // Logarithmic
        let params = IntegratorParams::new(0.01, 0.01, 0.8, true);
        let mut env = IntegratorEnvelope::new();
        env.trigger(1.0);
        group.bench_with_input(BenchmarkId::new("logarithmic", size), &size, |b, _| {
            b.iter(|| env.render(black_box(&mut buffer), &params, SAMPLE_RATE))
        });
    }

    group.finish();
}

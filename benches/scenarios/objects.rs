//! Benchmarks for the host-facing objects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use morphslew_dsp::{
    Cycle2d, Cycle2dConfig, DspSetup, SignalNode, SlewEnv, SlewEnvConfig, MAX_BLOCK_SIZE,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/objects");

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f64; size];

        // All inlets float-driven
        let mut osc = Cycle2d::new(Cycle2dConfig::default());
        osc.dsp_setup(&DspSetup::new(SAMPLE_RATE, MAX_BLOCK_SIZE, &[0; 4]));
        group.bench_with_input(BenchmarkId::new("cycle2d_floats", size), &size, |b, _| {
            b.iter(|| osc.perform(&[], black_box(&mut out)))
        });

        // Looping envelope patched into x
        let mut env = SlewEnv::new(SlewEnvConfig::default().with_rise(0.01).with_fall(0.02));
        env.dsp_setup(&DspSetup::new(SAMPLE_RATE, MAX_BLOCK_SIZE, &[0; 5]));
        env.set_looping(true);
        let mut osc = Cycle2d::new(Cycle2dConfig::default());
        osc.dsp_setup(&DspSetup::new(SAMPLE_RATE, MAX_BLOCK_SIZE, &[0, 1, 0, 0]));
        let mut env_buf = vec![0.0f64; size];
        group.bench_with_input(BenchmarkId::new("slewenv_to_x", size), &size, |b, _| {
            b.iter(|| {
                env.perform(&[], &mut env_buf);
                let inputs: [&[f64]; 4] = [&[], &env_buf, &[], &[]];
                osc.perform(&inputs, black_box(&mut out));
            })
        });
    }

    group.finish();
}

//! Benchmarks for DSP primitives and complete objects.
//!
//! Run with: cargo bench
//!
//! Every object runs its full per-sample loop, so cost scales linearly with
//! block size. Reference deadlines at 48kHz:
//!   - 64 samples  = 1.33ms
//!   - 128 samples = 2.67ms
//!   - 256 samples = 5.33ms
//!   - 512 samples = 10.67ms
//!
//! Benchmark groups:
//!   - dsp/*        Primitives (blender, integrator)
//!   - scenarios/*  Objects driven through their inlets

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f64 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_blend,
    dsp::bench_integrator,
    scenarios::bench_objects,
);
criterion_main!(benches);

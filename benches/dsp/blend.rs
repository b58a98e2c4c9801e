//! Benchmarks for wavetable blending.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use morphslew_dsp::dsp::{
    wavetable::LoadRequest, BilinearBlender, InterpolationMode, PhaseAccumulator, WavetableStore,
};
use morphslew_dsp::{MAX_CUSTOM_TABLES, WAVETABLE_SIZE};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn render(
    buffer: &mut [f64],
    phase: &mut PhaseAccumulator,
    blender: &BilinearBlender,
    store: &WavetableStore,
) {
    for sample in buffer.iter_mut() {
        let p = phase.advance(440.0, SAMPLE_RATE);
        *sample = blender.sample(store, p, 0.37, 0.61);
    }
}

pub fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/blend");

    let corners_only = WavetableStore::default();

    let mut full = WavetableStore::default();
    let ramp: Vec<f32> = (0..WAVETABLE_SIZE)
        .map(|i| i as f32 / WAVETABLE_SIZE as f32 * 2.0 - 1.0)
        .collect();
    for i in 0..MAX_CUSTOM_TABLES {
        let t = i as f64 / MAX_CUSTOM_TABLES as f64;
        let _ = full.load(&LoadRequest::new("ramp", t, 1.0 - t).with_offset(i * 97), &ramp);
    }

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Four table reads per sample
        let blender = BilinearBlender::default();
        let mut phase = PhaseAccumulator::new();
        group.bench_with_input(BenchmarkId::new("corners", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), &mut phase, &blender, &corners_only))
        });

        // Worst case: every custom slot occupied
        let mut phase = PhaseAccumulator::new();
        group.bench_with_input(BenchmarkId::new("custom_16", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), &mut phase, &blender, &full))
        });

        // Single table read
        let nearest = BilinearBlender::new(InterpolationMode::NearestCorner);
        let mut phase = PhaseAccumulator::new();
        group.bench_with_input(BenchmarkId::new("nearest", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), &mut phase, &nearest, &full))
        });
    }

    group.finish();
}

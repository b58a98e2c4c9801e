//! Benchmarks for low-level DSP primitives.

mod blend;
mod integrator;

pub use blend::bench_blend;
pub use integrator::bench_integrator;

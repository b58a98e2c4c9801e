//! Low-level DSP primitives used by the signal objects in `graph`.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can be embedded directly inside an object's state. They stay
//! focused on the signal-processing math; inlet arbitration and message
//! handling live one layer up.

/// Bilinear corner morphing plus distance-weighted custom tables.
pub mod blend;
/// Linearity-driven remap of integration rates.
pub mod curve;
/// Rise/fall integrator with trigger, looping and curve shaping.
pub mod integrator;
/// Normalized phase accumulation.
pub mod phase;
/// Corner and custom wavetable storage.
pub mod wavetable;

pub use blend::{BilinearBlender, InterpolationMode};
pub use integrator::{IntegratorEnvelope, IntegratorParams, IntegratorStage};
pub use phase::PhaseAccumulator;
pub use wavetable::{Corner, CornerSet, WavetableStore};

/// Clamp into [0, 1]. NaN reads as 0.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

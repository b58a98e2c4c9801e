//! Host-facing signal objects.
//!
//! Each object wraps the allocation-free primitives in [`crate::dsp`] behind
//! the [`node::SignalNode`] contract: a reconfiguration callback that resolves
//! inlet tags, a per-sample `perform` loop, and discrete control messages.

/// 2D morphing wavetable oscillator.
pub mod cycle2d;
/// Core trait and reconfiguration record shared by all objects.
pub mod node;
/// Integrator envelope with looping and curve shaping.
pub mod slewenv;

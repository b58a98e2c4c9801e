use crate::dsp::curve::{self, clamp_linearity};

/*
Integrator Envelope
===================

This module implements a rise/fall function generator in the style of an
analog slew integrator: a capacitor that charges toward 1.0 and discharges
back toward 0.0 at controllable rates.

Vocabulary
----------

  level       The integrator's current value, always within [0, 1].

  stage       Idle, Rising or Falling. A small state machine governs moves
              between them.

  trigger     A rising edge on the trigger input: the value crosses from
              ≤ 0 to > 0. The value at that instant becomes the amplitude.

  amplitude   Output scale captured at trigger time, clamped to [0, 10].
              output = level × amplitude

  rise/fall   Normalized segment times in [0.001, 1]. Mapped to seconds by
              ×10, so 0.1 → 1 s and 1.0 → 10 s.

  looping     When set, reaching the bottom starts a new rise instead of
              stopping.


The State Machine
-----------------

                  trigger (from any stage)
              ┌──────────────────────────────┐
              ▼                              │
    ┌──────┐ trigger ┌────────┐ level≥1 ┌─────────┐
    │ Idle │ ──────▶ │ Rising │ ──────▶ │ Falling │
    └──────┘         └────────┘         └─────────┘
        ▲                 ▲   level≤0 & loop  │
        │                 └───────────────────┤
        │              level≤0 & !loop        │
        └─────────────────────────────────────┘

There is no hold: a completed rise always turns into a fall.

A trigger does NOT reset the level. Retriggering mid-fall rises from wherever
the level currently is, the way a capacitor would.


The Math: Time to Rate
----------------------

    seconds = max(time × 10, 0.01)
    rate    = 1 / (seconds × sample_rate)

The 10 ms floor keeps the division finite no matter what reaches the input.
The rate is then bent by the curve shaper (see `curve.rs`) using progress
through the current segment.


Implementation Notes
--------------------

`transition` is a pure function of (stage, level, params). All stage checks
live there, so the per-sample loop is a single call. Idle performs no
integration at all; the level simply stays where it is.

The level is clamped only at the boundary checks. A shaped rate can overshoot
1.0 or 0.0 within a sample, but the same step pins it back and switches
stage.
*/

pub const MIN_TIME: f64 = 0.001;
pub const MAX_TIME: f64 = 1.0;
pub const MAX_TRIGGER_AMPLITUDE: f64 = 10.0;

/// Normalized time → seconds.
const TIME_TO_SECONDS: f64 = 10.0;
const MIN_SECONDS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorStage {
    #[default]
    Idle,    // No integration, level holds
    Rising,  // Charging toward 1.0
    Falling, // Discharging toward 0.0
}

/// Clamp a normalized rise/fall time. NaN reads as the shortest time.
#[inline]
pub fn clamp_time(time: f64) -> f64 {
    if time.is_nan() {
        return MIN_TIME;
    }
    time.clamp(MIN_TIME, MAX_TIME)
}

#[inline]
pub fn clamp_amplitude(amplitude: f64) -> f64 {
    if amplitude.is_nan() {
        return 0.0;
    }
    amplitude.clamp(0.0, MAX_TRIGGER_AMPLITUDE)
}

/// Per-sample level change for a full 0 → 1 segment of `time`.
#[inline]
pub fn time_to_rate(time: f64, sample_rate: f64) -> f64 {
    let seconds = (time * TIME_TO_SECONDS).max(MIN_SECONDS);
    1.0 / (seconds * sample_rate)
}

/// Shape parameters, always stored clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorParams {
    pub rise: f64,
    pub fall: f64,
    pub linearity: f64,
    pub looping: bool,
}

impl IntegratorParams {
    pub fn new(rise: f64, fall: f64, linearity: f64, looping: bool) -> Self {
        Self {
            rise: clamp_time(rise),
            fall: clamp_time(fall),
            linearity: clamp_linearity(linearity),
            looping,
        }
    }
}

impl Default for IntegratorParams {
    fn default() -> Self {
        Self::new(0.1, 0.1, 0.0, false)
    }
}

/// One integration step. Returns the next stage and level.
#[inline]
pub fn transition(
    stage: IntegratorStage,
    level: f64,
    params: &IntegratorParams,
    sample_rate: f64,
) -> (IntegratorStage, f64) {
    match stage {
        IntegratorStage::Idle => (IntegratorStage::Idle, level),

        IntegratorStage::Rising => {
            let rate = time_to_rate(params.rise, sample_rate);
            let level = level + curve::shape(rate, params.linearity, level);

            if level >= 1.0 {
                (IntegratorStage::Falling, 1.0)
            } else {
                (IntegratorStage::Rising, level)
            }
        }

        IntegratorStage::Falling => {
            let rate = time_to_rate(params.fall, sample_rate);
            let level = level - curve::shape(rate, params.linearity, 1.0 - level);

            if level <= 0.0 {
                let next = if params.looping {
                    IntegratorStage::Rising
                } else {
                    IntegratorStage::Idle
                };
                (next, 0.0)
            } else {
                (IntegratorStage::Falling, level)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntegratorEnvelope {
    stage: IntegratorStage,
    level: f64,
    amplitude: f64,
    prev_trigger: f64,
}

impl IntegratorEnvelope {
    pub fn new() -> Self {
        Self {
            stage: IntegratorStage::Idle,
            level: 0.0,
            amplitude: 1.0,
            prev_trigger: 0.0,
        }
    }

    /// Start (or restart) a rise from the current level.
    pub fn trigger(&mut self, amplitude: f64) {
        self.stage = IntegratorStage::Rising;
        self.amplitude = clamp_amplitude(amplitude);
    }

    /// Feed one trigger-input value. Fires on a ≤0 → >0 edge.
    #[inline]
    pub fn detect_trigger(&mut self, value: f64) -> bool {
        let value = if value.is_nan() { 0.0 } else { value };
        let edge = value > 0.0 && self.prev_trigger <= 0.0;
        if edge {
            self.trigger(value);
        }
        self.prev_trigger = value;
        edge
    }

    /// Advance one sample and return the scaled output.
    #[inline]
    pub fn step(&mut self, params: &IntegratorParams, sample_rate: f64) -> f64 {
        let (stage, level) = transition(self.stage, self.level, params, sample_rate);
        self.stage = stage;
        self.level = level;
        self.output()
    }

    /// Render a block with fixed parameters and no trigger input.
    pub fn render(&mut self, buffer: &mut [f64], params: &IntegratorParams, sample_rate: f64) {
        for sample in buffer.iter_mut() {
            *sample = self.step(params, sample_rate);
        }
    }

    #[inline]
    pub fn output(&self) -> f64 {
        self.level * self.amplitude
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn stage(&self) -> IntegratorStage {
        self.stage
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn prev_trigger(&self) -> f64 {
        self.prev_trigger
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.stage, IntegratorStage::Idle)
    }

    /// Back to the freshly constructed state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for IntegratorEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

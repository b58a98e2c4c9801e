#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    control::Attribute,
    dsp::{
        curve::clamp_linearity,
        integrator::clamp_time,
        IntegratorEnvelope, IntegratorParams, IntegratorStage,
    },
    graph::node::{DspSetup, SignalNode},
    inlet::InletArbiter,
    DEFAULT_SAMPLE_RATE,
};

pub const INLET_TRIGGER: usize = 0;
pub const INLET_LOOP: usize = 1;
pub const INLET_RISE: usize = 2;
pub const INLET_FALL: usize = 3;
pub const INLET_LINEARITY: usize = 4;

const INLETS: usize = 5;

/// Creation arguments for [`SlewEnv`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlewEnvConfig {
    pub rise: f64,
    pub fall: f64,
    pub linearity: f64,
    pub looping: bool,
}

impl Default for SlewEnvConfig {
    fn default() -> Self {
        Self {
            rise: 0.1,
            fall: 0.1,
            linearity: 0.0,
            looping: false,
        }
    }
}

impl SlewEnvConfig {
    pub fn with_rise(mut self, rise: f64) -> Self {
        self.rise = rise;
        self
    }

    pub fn with_fall(mut self, fall: f64) -> Self {
        self.fall = fall;
        self
    }

    pub fn with_linearity(mut self, linearity: f64) -> Self {
        self.linearity = linearity;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

#[inline]
fn loop_flag(value: f64) -> bool {
    // NaN compares false
    value.abs() > 0.0
}

#[inline]
fn flag_value(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

/// Integrator envelope object.
///
/// Inlets: trigger, loop, rise, fall, linearity. A trigger fires on a
/// rising edge through zero, from either a signal or a float.
pub struct SlewEnv {
    arbiter: InletArbiter<INLETS>,
    env: IntegratorEnvelope,
    params: IntegratorParams,
    sample_rate: f64,
}

impl SlewEnv {
    /// Build an idle envelope. `looping` only arms the loop, it does not
    /// start a cycle.
    pub fn new(config: SlewEnvConfig) -> Self {
        let params = IntegratorParams::new(config.rise, config.fall, config.linearity, config.looping);
        let defaults = [
            0.0,
            flag_value(params.looping),
            params.rise,
            params.fall,
            params.linearity,
        ];

        Self {
            arbiter: InletArbiter::new(defaults),
            env: IntegratorEnvelope::new(),
            params,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub fn level(&self) -> f64 {
        self.env.level()
    }

    pub fn stage(&self) -> IntegratorStage {
        self.env.stage()
    }

    pub fn amplitude(&self) -> f64 {
        self.env.amplitude()
    }

    /// Parameters as last used, clamped.
    pub fn params(&self) -> IntegratorParams {
        self.params
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Enable or disable looping. Switching it on also starts a cycle at
    /// amplitude 1.
    pub fn set_looping(&mut self, looping: bool) {
        let was_looping = self.params.looping;
        self.params.looping = looping;
        self.arbiter.set_scalar(INLET_LOOP, flag_value(looping));

        if looping && !was_looping {
            self.env.trigger(1.0);
        }
    }
}

impl Default for SlewEnv {
    fn default() -> Self {
        Self::new(SlewEnvConfig::default())
    }
}

impl SignalNode for SlewEnv {
    fn inlet_count(&self) -> usize {
        INLETS
    }

    fn dsp_setup(&mut self, setup: &DspSetup) {
        self.sample_rate = setup.sanitized_sample_rate();
        self.arbiter.configure(setup.connections);
        tracing::debug!(
            sample_rate = self.sample_rate,
            block_size = setup.block_size,
            connections = ?setup.connections,
            "slewenv configured"
        );
    }

    fn perform(&mut self, inputs: &[&[f64]], out: &mut [f64]) {
        for (frame, sample) in out.iter_mut().enumerate() {
            let trigger = self.arbiter.read(INLET_TRIGGER, inputs, frame);
            let looping = self.arbiter.read(INLET_LOOP, inputs, frame);
            let rise = self.arbiter.read(INLET_RISE, inputs, frame);
            let fall = self.arbiter.read(INLET_FALL, inputs, frame);
            let linearity = self.arbiter.read(INLET_LINEARITY, inputs, frame);

            self.env.detect_trigger(trigger);
            self.params = IntegratorParams::new(rise, fall, linearity, loop_flag(looping));

            *sample = self.env.step(&self.params, self.sample_rate);
        }
    }

    fn float(&mut self, inlet: usize, value: f64) {
        match inlet {
            INLET_TRIGGER => {
                let value = if value.is_nan() { 0.0 } else { value };
                self.env.detect_trigger(value);
                self.arbiter.set_scalar(INLET_TRIGGER, value);
            }
            INLET_LOOP => {
                let looping = loop_flag(value);
                self.params.looping = looping;
                self.arbiter.set_scalar(INLET_LOOP, flag_value(looping));
            }
            INLET_RISE => {
                self.params.rise = clamp_time(value);
                self.arbiter.set_scalar(INLET_RISE, self.params.rise);
            }
            INLET_FALL => {
                self.params.fall = clamp_time(value);
                self.arbiter.set_scalar(INLET_FALL, self.params.fall);
            }
            INLET_LINEARITY => {
                self.params.linearity = clamp_linearity(value);
                self.arbiter.set_scalar(INLET_LINEARITY, self.params.linearity);
            }
            _ => {}
        }
    }

    fn set_attribute(&mut self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Looping(looping) => {
                self.set_looping(looping);
                true
            }
            Attribute::Interpolation(_) | Attribute::CornerSet(_) => false,
        }
    }
}

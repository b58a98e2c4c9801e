use crate::control::Attribute;
use crate::DEFAULT_SAMPLE_RATE;

/// Reconfiguration record passed when the host (re)builds its audio graph.
///
/// - sample_rate: audio sample rate in Hz
/// - block_size: frames per `perform` call (informational)
/// - connections: per-inlet connection counts, indexed by inlet
#[derive(Debug, Clone, Copy)]
pub struct DspSetup<'a> {
    pub sample_rate: f64,
    pub block_size: usize,
    pub connections: &'a [u16],
}

impl<'a> DspSetup<'a> {
    pub fn new(sample_rate: f64, block_size: usize, connections: &'a [u16]) -> Self {
        Self {
            sample_rate,
            block_size,
            connections,
        }
    }

    /// Sample rate with non-finite or non-positive values replaced by the
    /// default.
    pub fn sanitized_sample_rate(&self) -> f64 {
        if self.sample_rate.is_finite() && self.sample_rate > 0.0 {
            self.sample_rate
        } else {
            DEFAULT_SAMPLE_RATE
        }
    }
}

/// Core trait for host-facing signal objects
///
/// An object owns a fixed number of control inlets and one signal outlet.
/// `perform` runs on the audio thread and never allocates; every other method
/// is control-path.
pub trait SignalNode: Send {
    fn inlet_count(&self) -> usize;

    /// Reconfiguration callback: sample rate and inlet connection tags.
    fn dsp_setup(&mut self, setup: &DspSetup);

    /// Fill `out` with one sample per frame. `inputs[i]` is the signal buffer
    /// of inlet `i`; it is only read if that inlet was connected at setup.
    fn perform(&mut self, inputs: &[&[f64]], out: &mut [f64]);

    /// Discrete float on `inlet`. Unknown inlets are ignored.
    fn float(&mut self, inlet: usize, value: f64);

    /// Discrete int on `inlet`, handled like a float.
    fn int(&mut self, inlet: usize, value: i64) {
        self.float(inlet, value as f64);
    }

    /// Bang on `inlet`.
    ///
    /// Default implementation does nothing.
    fn bang(&mut self, _inlet: usize) {}

    /// Apply an attribute. Returns `false` if this object has no such
    /// attribute.
    fn set_attribute(&mut self, _attribute: Attribute) -> bool {
        false
    }
}

/// Allow boxed nodes to be used as nodes (for dynamic dispatch)
impl SignalNode for Box<dyn SignalNode> {
    fn inlet_count(&self) -> usize {
        (**self).inlet_count()
    }

    fn dsp_setup(&mut self, setup: &DspSetup) {
        (**self).dsp_setup(setup)
    }

    fn perform(&mut self, inputs: &[&[f64]], out: &mut [f64]) {
        (**self).perform(inputs, out)
    }

    fn float(&mut self, inlet: usize, value: f64) {
        (**self).float(inlet, value)
    }

    fn int(&mut self, inlet: usize, value: i64) {
        (**self).int(inlet, value)
    }

    fn bang(&mut self, inlet: usize) {
        (**self).bang(inlet)
    }

    fn set_attribute(&mut self, attribute: Attribute) -> bool {
        (**self).set_attribute(attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_sample_rates_fall_back_to_default() {
        let connections = [0u16; 2];
        for bad in [0.0, -48_000.0, f64::NAN, f64::INFINITY] {
            let setup = DspSetup::new(bad, 64, &connections);
            assert_eq!(setup.sanitized_sample_rate(), DEFAULT_SAMPLE_RATE);
        }
        assert_eq!(
            DspSetup::new(48_000.0, 64, &connections).sanitized_sample_rate(),
            48_000.0
        );
    }
}

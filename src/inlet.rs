//! Signal/float arbitration for control inlets.

/*
Inlet Arbitration
=================

Every control inlet can be fed two ways:

  signal   A live sample stream, one value per frame.
  float    A discrete message that updates a stored scalar.

The host hands the DSP loop a buffer for EVERY inlet, connected or not. An
unconnected inlet gets a buffer of zeros, so "is there a buffer?" cannot tell
the two cases apart. Reading the buffer whenever it exists silently pins the
parameter at 0 and every float message is ignored.

The only reliable source is the connection count the host passes at
reconfiguration time:

    configure:   has_signal[i] = connections[i] > 0
    per frame:   value = has_signal[i] ? buffer[i][n] : stored[i]

The tag is resolved once and held until the next reconfiguration. Float
messages always update `stored[i]`, whatever the tag says, so a value sent
while a cable is plugged in takes effect as soon as it is removed.

A buffer that is missing or shorter than the block falls back to the stored
scalar for the missing frames.
*/

#[derive(Debug, Clone, Copy)]
pub struct InletArbiter<const N: usize> {
    has_signal: [bool; N],
    stored: [f64; N],
}

impl<const N: usize> InletArbiter<N> {
    /// All inlets start float-driven with the given scalars.
    pub fn new(defaults: [f64; N]) -> Self {
        Self {
            has_signal: [false; N],
            stored: defaults,
        }
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Resolve the per-inlet tags from host connection counts. Inlets past
    /// the end of `connections` are treated as unconnected.
    pub fn configure(&mut self, connections: &[u16]) {
        for (inlet, tag) in self.has_signal.iter_mut().enumerate() {
            *tag = connections.get(inlet).is_some_and(|&count| count > 0);
        }
    }

    /// Update the stored scalar of `inlet`. Returns `false` if the inlet does
    /// not exist.
    pub fn set_scalar(&mut self, inlet: usize, value: f64) -> bool {
        match self.stored.get_mut(inlet) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn scalar(&self, inlet: usize) -> Option<f64> {
        self.stored.get(inlet).copied()
    }

    pub fn has_signal(&self, inlet: usize) -> bool {
        self.has_signal.get(inlet).copied().unwrap_or(false)
    }

    /// Effective value of `inlet` at `frame`.
    #[inline]
    pub fn read(&self, inlet: usize, inputs: &[&[f64]], frame: usize) -> f64 {
        let stored = self.stored.get(inlet).copied().unwrap_or(0.0);
        if !self.has_signal(inlet) {
            return stored;
        }
        inputs
            .get(inlet)
            .and_then(|buffer| buffer.get(frame))
            .copied()
            .unwrap_or(stored)
    }
}

impl<const N: usize> Default for InletArbiter<N> {
    fn default() -> Self {
        Self::new([0.0; N])
    }
}

//! Normalized phase accumulation.

/*
Phase Accumulation
==================

Every table-reading oscillator is driven by a phase: a number that walks from
0.0 up to (but never reaching) 1.0 once per cycle, then wraps.

Vocabulary
----------

  phase        Position within one cycle, normalized to [0, 1).
               0.0 = start of the table, 0.5 = halfway through.

  increment    How far phase moves per sample: frequency / sample_rate.
               440 Hz at 48 kHz → 0.00916 per sample.

  wrap         Folding phase back into [0, 1) after it passes 1.0:
                 wrap01(p) = p - floor(p)
               Using floor (not a loop of `-= 1.0`) keeps the work bounded
               even for pathological increments.

  phase sync   Forcing phase back to 0.0 from outside (a "bang"), so the
               waveform restarts at a known point.


Frequency Range
---------------

Frequency is clamped to [0, 20000] Hz before use. Zero is legal: the phase
simply stops, and the oscillator outputs a constant sample. Negative or huge
values saturate instead of being rejected.

No smoothing is applied between frequency changes. A step in frequency only
changes the slope of the phase ramp, so it is inaudible unless the table has
a discontinuity at that point.
*/

pub const MIN_FREQUENCY: f64 = 0.0;
pub const MAX_FREQUENCY: f64 = 20_000.0;

/// Fold any finite value into [0, 1).
#[inline]
pub fn wrap01(phase: f64) -> f64 {
    let wrapped = phase - phase.floor();
    // floor() can round a tiny negative input up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamp a frequency in Hz into the accepted range.
#[inline]
pub fn clamp_frequency(frequency: f64) -> f64 {
    if frequency.is_nan() {
        return MIN_FREQUENCY;
    }
    frequency.clamp(MIN_FREQUENCY, MAX_FREQUENCY)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAccumulator {
    phase: f64,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Advance by `frequency / sample_rate` and return the wrapped phase.
    #[inline]
    pub fn advance(&mut self, frequency: f64, sample_rate: f64) -> f64 {
        let frequency = clamp_frequency(frequency);
        self.phase = wrap01(self.phase + frequency / sample_rate);
        self.phase
    }

    /// Phase sync: restart the cycle immediately.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }
}

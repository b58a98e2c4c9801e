#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    control::Attribute,
    dsp::{
        clamp_unit,
        phase::{clamp_frequency, wrap01},
        wavetable::{LoadRequest, SampleSource},
        BilinearBlender, CornerSet, InterpolationMode, PhaseAccumulator, WavetableStore,
    },
    error::TableError,
    graph::node::{DspSetup, SignalNode},
    inlet::InletArbiter,
    DEFAULT_SAMPLE_RATE,
};

pub const INLET_FREQUENCY: usize = 0;
pub const INLET_X: usize = 1;
pub const INLET_Y: usize = 2;
pub const INLET_OFFSET: usize = 3;

const INLETS: usize = 4;

/// Creation arguments for [`Cycle2d`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cycle2dConfig {
    pub frequency: f64,
    pub x: f64,
    pub y: f64,
    pub interpolation: InterpolationMode,
    pub corner_set: CornerSet,
}

impl Default for Cycle2dConfig {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            x: 0.5,
            y: 0.5,
            interpolation: InterpolationMode::Bilinear,
            corner_set: CornerSet::Standard,
        }
    }
}

impl Cycle2dConfig {
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_interpolation(mut self, mode: InterpolationMode) -> Self {
        self.interpolation = mode;
        self
    }

    pub fn with_corner_set(mut self, set: CornerSet) -> Self {
        self.corner_set = set;
        self
    }
}

/// Morphing wavetable oscillator.
///
/// Inlets: frequency, x, y, phase offset. Every inlet accepts a signal or a
/// float; which one is read is decided in [`SignalNode::dsp_setup`].
pub struct Cycle2d {
    arbiter: InletArbiter<INLETS>,
    phase: PhaseAccumulator,
    blender: BilinearBlender,
    store: WavetableStore,
    sample_rate: f64,
}

impl Cycle2d {
    pub fn new(config: Cycle2dConfig) -> Self {
        let defaults = [
            clamp_frequency(config.frequency),
            clamp_unit(config.x),
            clamp_unit(config.y),
            0.0,
        ];

        Self {
            arbiter: InletArbiter::new(defaults),
            phase: PhaseAccumulator::new(),
            blender: BilinearBlender::new(config.interpolation),
            store: WavetableStore::new(config.corner_set),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Stored frequency scalar (the value used while the inlet is unconnected).
    pub fn frequency(&self) -> f64 {
        self.arbiter.scalar(INLET_FREQUENCY).unwrap_or(0.0)
    }

    pub fn position(&self) -> (f64, f64) {
        (
            self.arbiter.scalar(INLET_X).unwrap_or(0.0),
            self.arbiter.scalar(INLET_Y).unwrap_or(0.0),
        )
    }

    pub fn phase(&self) -> f64 {
        self.phase.phase()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn interpolation(&self) -> InterpolationMode {
        self.blender.mode()
    }

    pub fn set_interpolation(&mut self, mode: InterpolationMode) {
        self.blender.set_mode(mode);
    }

    pub fn corner_set(&self) -> CornerSet {
        self.store.corner_set()
    }

    pub fn set_corner_set(&mut self, set: CornerSet) {
        self.store.set_corner_set(set);
    }

    pub fn store(&self) -> &WavetableStore {
        &self.store
    }

    /// Place raw samples into a custom slot.
    ///
    /// Must not race `perform`; hosts that run the two concurrently have to
    /// sequence loads themselves.
    pub fn load_table(&mut self, request: &LoadRequest, samples: &[f32]) -> Result<usize, TableError> {
        self.store.load(request, samples)
    }

    pub fn load_table_from<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        request: &LoadRequest,
    ) -> Result<usize, TableError> {
        self.store.load_from(source, request)
    }

    pub fn unload_table(&mut self, slot: usize) -> Result<(), TableError> {
        self.store.unload(slot)
    }

    pub fn clear_tables(&mut self) {
        self.store.clear_custom();
    }

    /// Restart the cycle at phase 0.
    pub fn reset_phase(&mut self) {
        self.phase.reset();
    }
}

impl Default for Cycle2d {
    fn default() -> Self {
        Self::new(Cycle2dConfig::default())
    }
}

impl SignalNode for Cycle2d {
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
            "cycle2d configured"
        );
    }

    fn perform(&mut self, inputs: &[&[f64]], out: &mut [f64]) {
        for (frame, sample) in out.iter_mut().enumerate() {
            let frequency = self.arbiter.read(INLET_FREQUENCY, inputs, frame);
            let x = self.arbiter.read(INLET_X, inputs, frame);
            let y = self.arbiter.read(INLET_Y, inputs, frame);
            let offset = clamp_unit(self.arbiter.read(INLET_OFFSET, inputs, frame));

            let phase = self.phase.advance(frequency, self.sample_rate);
            let read_phase = wrap01(phase + offset);

            *sample = self.blender.sample(&self.store, read_phase, x, y);
        }
    }

    fn float(&mut self, inlet: usize, value: f64) {
        let value = match inlet {
            INLET_FREQUENCY => clamp_frequency(value),
            INLET_X | INLET_Y | INLET_OFFSET => clamp_unit(value),
            _ => return,
        };
        self.arbiter.set_scalar(inlet, value);
    }

    fn bang(&mut self, inlet: usize) {
        if inlet == INLET_FREQUENCY {
            self.phase.reset();
        }
    }

    fn set_attribute(&mut self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Interpolation(mode) => {
                self.set_interpolation(mode);
                true
            }
            Attribute::CornerSet(set) => {
                self.set_corner_set(set);
                true
            }
            Attribute::Looping(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{wavetable::read_interpolated, Corner};
    use crate::WAVETABLE_SIZE;

    const SAMPLE_RATE: f64 = 48_000.0;
    const BLOCK: usize = 64;

    fn configured(config: Cycle2dConfig, connections: &[u16]) -> Cycle2d {
        let mut osc = Cycle2d::new(config);
        osc.dsp_setup(&DspSetup::new(SAMPLE_RATE, BLOCK, connections));
        osc
    }

    fn render(osc: &mut Cycle2d, inputs: &[&[f64]]) -> [f64; BLOCK] {
        let mut out = [0.0; BLOCK];
        osc.perform(inputs, &mut out);
        out
    }

    #[test]
    fn default_config_matches_centre_blend() {
        let mut osc = configured(Cycle2dConfig::default(), &[0; 4]);
        let out = render(&mut osc, &[]);

        let store = WavetableStore::default();
        let blender = BilinearBlender::default();
        let mut phase = PhaseAccumulator::new();
        for sample in out {
            let expected = blender.sample(&store, phase.advance(440.0, SAMPLE_RATE), 0.5, 0.5);
            assert_eq!(sample, expected);
        }
    }

    #[test]
    fn phase_advances_before_first_lookup() {
        let mut osc = configured(
            Cycle2dConfig::default().with_position(0.0, 0.0),
            &[0; 4],
        );
        let mut out = [0.0; 1];
        osc.perform(&[], &mut out);

        let phase = 440.0 / SAMPLE_RATE;
        let sine = WavetableStore::default().corner(Corner::Sine).read(phase);
        assert_eq!(out[0], sine);
        assert!(out[0] > 0.0);
    }

    #[test]
    fn float_messages_work_with_unconnected_zero_buffers() {
        let mut osc = configured(Cycle2dConfig::default(), &[0, 0, 0, 0]);
        let zeros = [0.0; BLOCK];
        let inputs: [&[f64]; 4] = [&zeros, &zeros, &zeros, &zeros];

        osc.float(INLET_X, 1.0);
        osc.float(INLET_Y, 0.0);
        osc.reset_phase();
        let out = render(&mut osc, &inputs);

        // Frequency still 440 from the stored scalar, position on the saw corner.
        let store = WavetableStore::default();
        let mut phase = PhaseAccumulator::new();
        for sample in out {
            let expected = store
                .corner(Corner::Sawtooth)
                .read(phase.advance(440.0, SAMPLE_RATE));
            assert_eq!(sample, expected);
        }
    }

    #[test]
    fn connected_inlet_follows_signal() {
        let mut osc = configured(Cycle2dConfig::default(), &[0, 1, 1, 0]);
        osc.float(INLET_X, 1.0);
        osc.float(INLET_Y, 1.0);

        let zeros = [0.0; BLOCK];
        let inputs: [&[f64]; 4] = [&[], &zeros, &zeros, &[]];
        let out = render(&mut osc, &inputs);

        // Zero signal on x and y wins over the stored scalars: pure sine.
        let store = WavetableStore::default();
        let mut phase = PhaseAccumulator::new();
        for sample in out {
            let expected = store
                .corner(Corner::Sine)
                .read(phase.advance(440.0, SAMPLE_RATE));
            assert_eq!(sample, expected);
        }
    }

    #[test]
    fn messages_clamp_on_entry() {
        let mut osc = Cycle2d::default();
        osc.float(INLET_FREQUENCY, 90_000.0);
        osc.float(INLET_X, -2.0);
        osc.float(INLET_Y, 7.0);
        assert_eq!(osc.frequency(), 20_000.0);
        assert_eq!(osc.position(), (0.0, 1.0));

        osc.int(INLET_FREQUENCY, 220);
        assert_eq!(osc.frequency(), 220.0);

        // Ignored.
        osc.float(9, 1.0);
        osc.bang(2);
    }

    #[test]
    fn bang_resets_phase() {
        let mut osc = configured(Cycle2dConfig::default(), &[0; 4]);
        let first = render(&mut osc, &[]);
        assert!(osc.phase() > 0.0);

        osc.bang(INLET_FREQUENCY);
        assert_eq!(osc.phase(), 0.0);
        let again = render(&mut osc, &[]);
        assert_eq!(first, again);
    }

    #[test]
    fn zero_frequency_outputs_constant() {
        let mut osc = configured(
            Cycle2dConfig::default().with_frequency(0.0).with_position(1.0, 0.0),
            &[0; 4],
        );
        osc.float(INLET_OFFSET, 0.25);
        let out = render(&mut osc, &[]);

        let expected = WavetableStore::default().corner(Corner::Sawtooth).read(0.25);
        assert!(out.iter().all(|&s| s == expected));
    }

    #[test]
    fn offset_shifts_read_position_only() {
        let mut plain = configured(Cycle2dConfig::default(), &[0; 4]);
        let mut shifted = configured(Cycle2dConfig::default(), &[0; 4]);
        shifted.float(INLET_OFFSET, 0.5);

        render(&mut plain, &[]);
        render(&mut shifted, &[]);
        assert_eq!(plain.phase(), shifted.phase());
    }

    #[test]
    fn nearest_corner_attribute() {
        let mut osc = configured(
            Cycle2dConfig::default().with_position(0.8, 0.7),
            &[0; 4],
        );
        assert!(osc.set_attribute(Attribute::Interpolation(InterpolationMode::NearestCorner)));
        assert_eq!(osc.interpolation(), InterpolationMode::NearestCorner);

        let out = render(&mut osc, &[]);
        let store = WavetableStore::default();
        let mut phase = PhaseAccumulator::new();
        for sample in out {
            let expected = store
                .corner(Corner::Square)
                .read(phase.advance(440.0, SAMPLE_RATE));
            assert_eq!(sample, expected);
        }
    }

    #[test]
    fn corner_set_attribute_regenerates_tables() {
        let mut osc = Cycle2d::default();
        assert!(osc.set_attribute(Attribute::CornerSet(CornerSet::Harmonics)));
        assert_eq!(osc.corner_set(), CornerSet::Harmonics);
        assert!(!osc.set_attribute(Attribute::Looping(true)));

        let saw_slot = osc.store().corner(Corner::Sawtooth);
        let expected = (std::f64::consts::TAU * 3.0 * 0.1).sin();
        assert!((read_interpolated(saw_slot.samples(), 0.1) - expected).abs() < 1e-3);
    }

    #[test]
    fn custom_tables_load_and_unload() {
        let mut osc = configured(
            Cycle2dConfig::default().with_position(0.3, 0.3).with_frequency(0.0),
            &[0; 4],
        );
        let dc = vec![0.8f32; WAVETABLE_SIZE];
        let slot = osc.load_table(&LoadRequest::new("dc", 0.3, 0.3), &dc).unwrap();
        assert_eq!(slot, 0);

        let out = render(&mut osc, &[]);
        assert!((out[0] - 0.8).abs() < 1e-3);

        osc.unload_table(slot).unwrap();
        assert_eq!(osc.unload_table(slot), Err(TableError::SlotEmpty(slot)));

        let out = render(&mut osc, &[]);
        let corners = BilinearBlender::default().sample(&WavetableStore::default(), 0.0, 0.3, 0.3);
        assert_eq!(out[0], corners);
    }

    #[test]
    fn load_from_unknown_buffer_is_reported() {
        let mut osc = Cycle2d::default();
        let source: std::collections::HashMap<String, Vec<f32>> =
            [("ramp".to_string(), vec![0.0, 0.5, 1.0])].into_iter().collect();

        assert_eq!(
            osc.load_table_from(&source, &LoadRequest::new("missing", 0.0, 0.0)),
            Err(TableError::UnknownBuffer("missing".into()))
        );
        assert_eq!(osc.load_table_from(&source, &LoadRequest::new("ramp", 0.0, 0.0)), Ok(0));

        osc.clear_tables();
        assert_eq!(osc.store().occupied_count(), 0);
    }

    #[test]
    fn invalid_sample_rate_uses_default() {
        let mut osc = Cycle2d::default();
        osc.dsp_setup(&DspSetup::new(0.0, BLOCK, &[]));
        assert_eq!(osc.sample_rate(), DEFAULT_SAMPLE_RATE);
    }
}

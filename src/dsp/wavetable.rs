use std::collections::HashMap;
use std::f64::consts::TAU;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{clamp_unit, phase::wrap01},
    error::TableError,
    MAX_CUSTOM_TABLES, WAVETABLE_SIZE,
};

/*
Wavetable Storage
=================

A wavetable is one cycle of a waveform, sampled into a fixed-length buffer.
Playing it back at different speeds produces different pitches. This store
holds every table a morphing oscillator can read from.

Layout
------

    y
    1.0 ┌ triangle ─────────── square ┐
        │                             │
        │        · custom slots ·     │
        │     (anywhere in the square)│
        │                             │
    0.0 └ sine ─────────────── saw ───┘
       0.0                           1.0  x

  corner tables   Four fixed waveforms pinned to the corners of the unit
                  square. Generated once, regenerated only when the corner
                  set changes.

  custom slots    Up to MAX_CUSTOM_TABLES user tables, each with its own
                  (x, y) position and an occupancy flag.

Every record, corner or custom, has the same length (WAVETABLE_SIZE) and is
allocated when the store is built. Loading a custom table copies into an
existing buffer, so nothing is allocated afterwards.


Reading a Table
---------------

Phase in [0, 1) is scaled to a fractional index and the two neighbouring
samples are linearly interpolated. The upper neighbour wraps to index 0 at
the end of the table, so the cycle is seamless:

    idx  = phase * N
    i0   = floor(idx) mod N
    i1   = (i0 + 1) mod N
    frac = idx - floor(idx)
    out  = table[i0] * (1 - frac) + table[i1] * frac


Loading Custom Tables
---------------------

The host resolves a buffer name to raw samples (already resampled by the
buffer-loading layer). The store then copies WAVETABLE_SIZE samples starting
at `offset`, wrapping around the source buffer:

    table[i] = source[(offset + i) % source.len()]

Loads happen on the control path. The host must not run them concurrently
with a perform call on the same object.
*/

/// The four fixed waveforms and where they sit in the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Sine,     // (0, 0)
    Triangle, // (0, 1)
    Sawtooth, // (1, 0)
    Square,   // (1, 1)
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::Sine,
        Corner::Triangle,
        Corner::Sawtooth,
        Corner::Square,
    ];

    pub fn position(self) -> (f64, f64) {
        match self {
            Corner::Sine => (0.0, 0.0),
            Corner::Triangle => (0.0, 1.0),
            Corner::Sawtooth => (1.0, 0.0),
            Corner::Square => (1.0, 1.0),
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Corner::Sine => 0,
            Corner::Triangle => 1,
            Corner::Sawtooth => 2,
            Corner::Square => 3,
        }
    }
}

/// Which waveforms are generated for the four corners.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CornerSet {
    /// Sine, triangle, sawtooth, square.
    #[default]
    Standard,
    /// Sine harmonics 1 through 4 in corner order.
    Harmonics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Corner(Corner),
    Custom,
}

/// One fixed-length table plus its placement in the unit square.
pub struct TableRecord {
    kind: TableKind,
    x: f64,
    y: f64,
    occupied: bool,
    samples: Box<[f32]>,
}

impl TableRecord {
    fn corner(corner: Corner, set: CornerSet) -> Self {
        let (x, y) = corner.position();
        let mut samples = vec![0.0; WAVETABLE_SIZE].into_boxed_slice();
        fill_corner(&mut samples, corner, set);
        Self {
            kind: TableKind::Corner(corner),
            x,
            y,
            occupied: true,
            samples,
        }
    }

    fn empty_custom() -> Self {
        Self {
            kind: TableKind::Custom,
            x: 0.0,
            y: 0.0,
            occupied: false,
            samples: vec![0.0; WAVETABLE_SIZE].into_boxed_slice(),
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Interpolated read at `phase`.
    #[inline]
    pub fn read(&self, phase: f64) -> f64 {
        read_interpolated(&self.samples, phase)
    }
}

/// Linear-interpolated table read. Phase is wrapped first, so any finite
/// value is safe.
#[inline]
pub fn read_interpolated(table: &[f32], phase: f64) -> f64 {
    let len = table.len();
    if len == 0 {
        return 0.0;
    }

    let idx = wrap01(phase) * len as f64;
    let base = idx.floor();
    let frac = idx - base;
    let i0 = (base as usize) % len;
    let i1 = (i0 + 1) % len;

    table[i0] as f64 * (1.0 - frac) + table[i1] as f64 * frac
}

fn fill_corner(table: &mut [f32], corner: Corner, set: CornerSet) {
    let len = table.len() as f64;
    for (i, sample) in table.iter_mut().enumerate() {
        let phase = i as f64 / len;
        let value = match (set, corner) {
            (_, Corner::Sine) => (TAU * phase).sin(),
            (CornerSet::Standard, Corner::Triangle) => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
            (CornerSet::Standard, Corner::Sawtooth) => 2.0 * phase - 1.0,
            (CornerSet::Standard, Corner::Square) => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            (CornerSet::Harmonics, Corner::Triangle) => (TAU * phase * 2.0).sin(),
            (CornerSet::Harmonics, Corner::Sawtooth) => (TAU * phase * 3.0).sin(),
            (CornerSet::Harmonics, Corner::Square) => (TAU * phase * 4.0).sin(),
        };
        *sample = value as f32;
    }
}

/// Resolves a buffer name to raw samples.
///
/// Implemented by whatever owns the host's sample buffers. The samples are
/// expected to be already resampled to the table length; the store only
/// applies the offset and wrap.
pub trait SampleSource {
    fn samples(&self, name: &str) -> Option<&[f32]>;
}

impl SampleSource for HashMap<String, Vec<f32>> {
    fn samples(&self, name: &str) -> Option<&[f32]> {
        self.get(name).map(Vec::as_slice)
    }
}

/// A request to place a buffer into a custom slot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// Name the host knows the buffer by.
    pub buffer: String,
    /// Target slot; `None` takes the lowest free one.
    pub slot: Option<usize>,
    pub x: f64,
    pub y: f64,
    /// First sample to copy from the source buffer.
    pub offset: usize,
}

impl LoadRequest {
    pub fn new(buffer: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            buffer: buffer.into(),
            slot: None,
            x,
            y,
            offset: 0,
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn into_slot(mut self, slot: usize) -> Self {
        self.slot = Some(slot);
        self
    }
}

pub struct WavetableStore {
    corners: [TableRecord; 4],
    custom: Vec<TableRecord>,
    corner_set: CornerSet,
}

impl WavetableStore {
    pub fn new(corner_set: CornerSet) -> Self {
        Self {
            corners: Corner::ALL.map(|corner| TableRecord::corner(corner, corner_set)),
            custom: (0..MAX_CUSTOM_TABLES)
                .map(|_| TableRecord::empty_custom())
                .collect(),
            corner_set,
        }
    }

    pub fn corner(&self, corner: Corner) -> &TableRecord {
        &self.corners[corner.index()]
    }

    pub fn corner_set(&self) -> CornerSet {
        self.corner_set
    }

    /// Regenerate the four corner tables in place.
    pub fn set_corner_set(&mut self, set: CornerSet) {
        if set == self.corner_set {
            return;
        }
        for record in &mut self.corners {
            if let TableKind::Corner(corner) = record.kind {
                fill_corner(&mut record.samples, corner, set);
            }
        }
        self.corner_set = set;
    }

    /// Occupied custom tables, in slot order.
    pub fn custom_tables(&self) -> impl Iterator<Item = &TableRecord> {
        self.custom.iter().filter(|record| record.occupied)
    }

    pub fn custom_slot(&self, slot: usize) -> Option<&TableRecord> {
        self.custom.get(slot)
    }

    pub fn occupied_count(&self) -> usize {
        self.custom.iter().filter(|record| record.occupied).count()
    }

    /// Copy `samples` into a custom slot. Returns the slot index used.
    pub fn load(&mut self, request: &LoadRequest, samples: &[f32]) -> Result<usize, TableError> {
        let result = self.try_load(request, samples);
        match &result {
            Ok(slot) => tracing::info!(
                buffer = %request.buffer,
                slot,
                x = request.x,
                y = request.y,
                offset = request.offset,
                "loaded custom table"
            ),
            Err(err) => tracing::warn!(buffer = %request.buffer, %err, "custom table load rejected"),
        }
        result
    }

    /// Resolve the request's buffer through `source`, then load it.
    pub fn load_from<S: SampleSource + ?Sized>(
        &mut self,
        source: &S,
        request: &LoadRequest,
    ) -> Result<usize, TableError> {
        match source.samples(&request.buffer) {
            Some(samples) => self.load(request, samples),
            None => {
                let err = TableError::UnknownBuffer(request.buffer.clone());
                tracing::warn!(buffer = %request.buffer, %err, "custom table load rejected");
                Err(err)
            }
        }
    }

    fn try_load(&mut self, request: &LoadRequest, samples: &[f32]) -> Result<usize, TableError> {
        if samples.is_empty() {
            return Err(TableError::EmptyBuffer(request.buffer.clone()));
        }

        let slot = match request.slot {
            Some(slot) if slot >= MAX_CUSTOM_TABLES => {
                return Err(TableError::InvalidSlot {
                    slot,
                    max: MAX_CUSTOM_TABLES,
                })
            }
            Some(slot) => slot,
            None => self
                .custom
                .iter()
                .position(|record| !record.occupied)
                .ok_or(TableError::SlotsExhausted {
                    max: MAX_CUSTOM_TABLES,
                })?,
        };

        let record = &mut self.custom[slot];
        let len = samples.len();
        let start = request.offset % len;
        for (i, sample) in record.samples.iter_mut().enumerate() {
            *sample = samples[(start + i) % len];
        }
        record.x = clamp_unit(request.x);
        record.y = clamp_unit(request.y);
        record.occupied = true;

        Ok(slot)
    }

    /// Mark a custom slot free. Its buffer is kept for reuse.
    pub fn unload(&mut self, slot: usize) -> Result<(), TableError> {
        let record = self.custom.get_mut(slot).ok_or(TableError::InvalidSlot {
            slot,
            max: MAX_CUSTOM_TABLES,
        })?;
        if !record.occupied {
            return Err(TableError::SlotEmpty(slot));
        }
        record.occupied = false;
        tracing::info!(slot, "unloaded custom table");
        Ok(())
    }

    pub fn clear_custom(&mut self) {
        for record in &mut self.custom {
            record.occupied = false;
        }
        tracing::debug!("cleared all custom tables");
    }
}

impl Default for WavetableStore {
    fn default() -> Self {
        Self::new(CornerSet::Standard)
    }
}

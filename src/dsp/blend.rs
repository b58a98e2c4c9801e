#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{
    clamp_unit,
    wavetable::{Corner, WavetableStore},
};

/*
2D Waveform Morphing
====================

The oscillator's timbre is chosen by a point (x, y) in the unit square. Each
corner holds a fixed waveform; every point in between is a mix of all four.

Bilinear Weights
----------------

    (0,1) tri ●───────────● square (1,1)
              │     ▲     │
              │     y     │
              │  ● (x,y)  │
              │           │
    (0,0) sine●─────x────▶● saw (1,0)

    w_sine   = (1-x)(1-y)
    w_saw    =    x (1-y)
    w_tri    = (1-x)   y
    w_square =    x    y

The four weights always sum to 1. At a corner one weight is exactly 1 and the
rest exactly 0, so the output is that corner's table, bit for bit. At the
centre every weight is 0.25.

All four tables are read at the SAME phase, so the morph never introduces a
phase jump. Only the shape changes.


Custom Tables
-------------

Custom tables can sit anywhere in the square. Their influence is an inverse
squared distance weight (Shepard interpolation):

    d_i = |(x, y) - (cx_i, cy_i)|
    w_i = 1 / (d_i² + SOFTENING)

The bilinear corner result joins the average with a fixed weight of 1:

    out = (corner + Σ w_i · custom_i) / (1 + Σ w_i)

Properties that fall out of this:
  - no custom tables      → out is exactly the corner blend
  - query sits on a slot  → w ≈ 10⁴, that slot dominates
  - every weight positive → out is a convex combination, so if all tables
                            live in [-1, 1], so does the output

SOFTENING keeps the weight finite when the query lands on a slot exactly.


Nearest Corner
--------------

A cheaper, stepped alternative: pick the corner of whichever quadrant (x, y)
falls in and play only that table. Custom tables are ignored in this mode.
*/

/// Keeps custom weights finite at zero distance.
pub const CUSTOM_WEIGHT_SOFTENING: f64 = 1e-4;
/// Weight given to the bilinear corner result in the custom average.
pub const CORNER_WEIGHT: f64 = 1.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Bilinear,
    NearestCorner,
}

/// Bilinear mix of the four corner tables at `phase`.
#[inline]
pub fn corner_blend(store: &WavetableStore, phase: f64, x: f64, y: f64) -> f64 {
    let sine = store.corner(Corner::Sine).read(phase);
    let tri = store.corner(Corner::Triangle).read(phase);
    let saw = store.corner(Corner::Sawtooth).read(phase);
    let square = store.corner(Corner::Square).read(phase);

    (1.0 - x) * (1.0 - y) * sine + x * (1.0 - y) * saw + (1.0 - x) * y * tri + x * y * square
}

/// Weight of a custom table at `distance` from the query point.
#[inline]
pub fn custom_weight(distance: f64) -> f64 {
    1.0 / (distance * distance + CUSTOM_WEIGHT_SOFTENING)
}

/// Fold every occupied custom table into `corner_result`.
#[inline]
pub fn custom_blend(
    store: &WavetableStore,
    phase: f64,
    x: f64,
    y: f64,
    corner_result: f64,
) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;

    for table in store.custom_tables() {
        let (cx, cy) = table.position();
        let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        let weight = custom_weight(distance);
        weighted_sum += table.read(phase) * weight;
        total_weight += weight;
    }

    if total_weight == 0.0 {
        return corner_result;
    }

    (corner_result * CORNER_WEIGHT + weighted_sum) / (CORNER_WEIGHT + total_weight)
}

/// Corner of the quadrant containing (x, y).
#[inline]
pub fn nearest_corner(x: f64, y: f64) -> Corner {
    match (x < 0.5, y < 0.5) {
        (true, true) => Corner::Sine,
        (true, false) => Corner::Triangle,
        (false, true) => Corner::Sawtooth,
        (false, false) => Corner::Square,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BilinearBlender {
    mode: InterpolationMode,
}

impl BilinearBlender {
    pub fn new(mode: InterpolationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> InterpolationMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InterpolationMode) {
        self.mode = mode;
    }

    /// One output sample for a read phase and a position. Position components
    /// are clamped, never wrapped.
    #[inline]
    pub fn sample(&self, store: &WavetableStore, phase: f64, x: f64, y: f64) -> f64 {
        let x = clamp_unit(x);
        let y = clamp_unit(y);

        match self.mode {
            InterpolationMode::Bilinear => {
                let corners = corner_blend(store, phase, x, y);
                custom_blend(store, phase, x, y, corners)
            }
            InterpolationMode::NearestCorner => store.corner(nearest_corner(x, y)).read(phase),
        }
    }
}

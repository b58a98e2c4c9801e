//! Curve shaping for the integrator envelope.

/*
Linearity
=========

An analog function generator charges and discharges a capacitor. A single
"linearity" knob bends the charge curve between three families:

    linearity   -1.0 ......... 0.0 ......... +1.0
                exponential    linear        logarithmic

  exponential   Fast at the start of a segment, slowing as it approaches the
                target. The familiar "RC charge" shape.

  linear        Constant rate, straight ramps.

  logarithmic   Slow at the start, accelerating toward the target.


Progress
--------

The shaper works on "progress": how far the current segment has travelled
toward its target, always running 0 → 1.

    rising    progress = level          (0 at the bottom, 1 at the top)
    falling   progress = 1 - level      (0 at the top, 1 at the bottom)


Multipliers
-----------

The base per-sample rate is scaled by a multiplier:

    exponential (L < -0.001)
        m = exp(-5|L| · progress) · (1 + 3|L|)

    logarithmic (L > 0.001)
        m = (0.1 + 0.9 · progress) · (1 + 2L)

    linear (|L| ≤ 0.001)
        m = 1

Both curved multipliers are strictly positive, so a rising segment never
moves down and a falling segment never moves up.

The constants approximate hardware by ear. They are kept as they are so
existing patches sound the same, not because they are exact.

No clamp is applied to the shaped rate. A large multiplier can overshoot
the target within one sample; the integrator pins the level at the next
boundary check.
*/

/// Linearity values within this distance of zero are treated as linear.
pub const LINEAR_DEADBAND: f64 = 0.001;

const EXP_STEEPNESS: f64 = 5.0;
const EXP_BOOST: f64 = 3.0;
const LOG_FLOOR: f64 = 0.1;
const LOG_SPAN: f64 = 0.9;
const LOG_BOOST: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveRegion {
    Exponential,
    Linear,
    Logarithmic,
}

impl CurveRegion {
    pub fn from_linearity(linearity: f64) -> Self {
        if linearity < -LINEAR_DEADBAND {
            CurveRegion::Exponential
        } else if linearity > LINEAR_DEADBAND {
            CurveRegion::Logarithmic
        } else {
            CurveRegion::Linear
        }
    }
}

/// Clamp a linearity control into [-1, 1]. NaN reads as linear.
#[inline]
pub fn clamp_linearity(linearity: f64) -> f64 {
    if linearity.is_nan() {
        return 0.0;
    }
    linearity.clamp(-1.0, 1.0)
}

/// Rate multiplier for `linearity` at `progress` through a segment.
#[inline]
pub fn multiplier(linearity: f64, progress: f64) -> f64 {
    match CurveRegion::from_linearity(linearity) {
        CurveRegion::Exponential => {
            let amount = linearity.abs();
            (-EXP_STEEPNESS * amount * progress).exp() * (1.0 + EXP_BOOST * amount)
        }
        CurveRegion::Logarithmic => (LOG_FLOOR + LOG_SPAN * progress) * (1.0 + LOG_BOOST * linearity),
        CurveRegion::Linear => 1.0,
    }
}

/// Scale a base per-sample rate by the curve multiplier.
#[inline]
pub fn shape(rate: f64, linearity: f64, progress: f64) -> f64 {
    rate * multiplier(linearity, progress)
}

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{CornerSet, InterpolationMode};

/// Named object settings that are not tied to an inlet.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Attribute {
    Interpolation(InterpolationMode),
    CornerSet(CornerSet),
    Looping(bool),
}

/// A discrete control-path event addressed to one object.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    Float { inlet: usize, value: f64 },
    Int { inlet: usize, value: i64 },
    Bang { inlet: usize },
    Attribute(Attribute),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}

use thiserror::Error;

/// Reasons a custom wavetable request can be refused.
///
/// All of these are reported on the control path. None of them touch the
/// audio path: corner tables and already-occupied slots stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("buffer '{0}' not found")]
    UnknownBuffer(String),

    #[error("buffer '{0}' is empty")]
    EmptyBuffer(String),

    #[error("maximum number of custom tables ({max}) reached")]
    SlotsExhausted { max: usize },

    #[error("slot {slot} is out of range (0..{max})")]
    InvalidSlot { slot: usize, max: usize },

    #[error("slot {0} holds no table")]
    SlotEmpty(usize),
}

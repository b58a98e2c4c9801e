pub mod control; // Control-path messages and lock-free handles
pub mod dsp;
pub mod error;
pub mod graph; // Host-facing signal objects
pub mod inlet; // Signal/float arbitration shared by every object

pub use dsp::wavetable::{LoadRequest, SampleSource};
pub use error::TableError;
pub use graph::cycle2d::{Cycle2d, Cycle2dConfig};
pub use graph::node::{DspSetup, SignalNode};
pub use graph::slewenv::{SlewEnv, SlewEnvConfig};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const WAVETABLE_SIZE: usize = 4096;
pub const MAX_CUSTOM_TABLES: usize = 16;
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

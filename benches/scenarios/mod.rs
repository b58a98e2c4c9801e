//! Objects driven the way a host drives them: reconfigure, then perform
//! with a mix of signal and float inlets.

mod objects;

pub use objects::bench_objects;

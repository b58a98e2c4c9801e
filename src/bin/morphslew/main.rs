//! morphslew - demo host for the morphing oscillator and slew envelope
//!
//! Run with: cargo run -- [seconds]

mod app;

use app::Morphslew;
use color_eyre::eyre::{Result, WrapErr};
use morphslew_dsp::{dsp::CornerSet, Cycle2dConfig, SlewEnvConfig};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f64>()
            .wrap_err_with(|| format!("invalid duration '{arg}'"))?,
        None => 8.0,
    };

    Morphslew::new()
        .oscillator(
            Cycle2dConfig::default()
                .with_frequency(110.0)
                .with_position(0.0, 0.2)
                .with_corner_set(CornerSet::Standard),
        )
        .envelope(
            SlewEnvConfig::default()
                .with_rise(0.05)
                .with_fall(0.15)
                .with_linearity(-0.6),
        )
        .duration(seconds)
        .run()
}

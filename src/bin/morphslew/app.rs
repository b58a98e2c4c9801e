//! Morphslew - demo application builder and runner

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use morphslew_dsp::{
    control::SharedNode,
    graph::cycle2d::{INLET_FREQUENCY, INLET_X, INLET_Y},
    Cycle2d, Cycle2dConfig, DspSetup, SignalNode, SlewEnv, SlewEnvConfig, MAX_BLOCK_SIZE,
};

const OUTPUT_GAIN: f32 = 0.2;
const CONTROL_INTERVAL: Duration = Duration::from_millis(50);
const Y_SWEEP_SECONDS: f64 = 4.0;
const NOTE_SECONDS: f64 = 2.0;
const NOTES: [f64; 4] = [110.0, 146.83, 164.81, 220.0];

/// Main application builder
pub struct Morphslew {
    oscillator: Cycle2dConfig,
    envelope: SlewEnvConfig,
    duration: f64,
}

impl Morphslew {
    pub fn new() -> Self {
        Self {
            oscillator: Cycle2dConfig::default(),
            envelope: SlewEnvConfig::default(),
            duration: 8.0,
        }
    }

    pub fn oscillator(mut self, config: Cycle2dConfig) -> Self {
        self.oscillator = config;
        self
    }

    /// The envelope always loops; it sweeps the oscillator's x position.
    pub fn envelope(mut self, config: SlewEnvConfig) -> Self {
        self.envelope = config;
        self
    }

    /// Playing time in seconds.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    /// Open the default output and play for the configured duration
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;

        tracing::info!(sample_rate, channels, seconds = self.duration, "starting morphslew");

        // The envelope output is patched into the x inlet as a live signal.
        let mut env = SlewEnv::new(self.envelope);
        env.dsp_setup(&DspSetup::new(sample_rate, MAX_BLOCK_SIZE, &[0; 5]));
        env.set_looping(true);

        let (mut osc, mut handle) = SharedNode::new(Cycle2d::new(self.oscillator));
        let mut connections = [0u16; 4];
        connections[INLET_X] = 1;
        osc.dsp_setup(&DspSetup::new(sample_rate, MAX_BLOCK_SIZE, &connections));

        let mut env_buf = vec![0.0f64; MAX_BLOCK_SIZE];
        let mut osc_buf = vec![0.0f64; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                        let env_block = &mut env_buf[..frames];
                        env.perform(&[], env_block);

                        let osc_block = &mut osc_buf[..frames];
                        let inputs: [&[f64]; 4] = [&[], &env_buf[..frames], &[], &[]];
                        osc.perform(&inputs, osc_block);

                        // Mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in osc_buf[..frames].iter().enumerate() {
                            let s = s as f32 * OUTPUT_GAIN;
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames;
                    }
                },
                |err| tracing::error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let start = Instant::now();
        let mut dropped = 0usize;
        let mut note = usize::MAX;

        while start.elapsed().as_secs_f64() < self.duration {
            let t = start.elapsed().as_secs_f64();

            // Triangle sweep of y, 0 → 1 → 0
            let sweep = (t / Y_SWEEP_SECONDS).fract();
            let y = 1.0 - (2.0 * sweep - 1.0).abs();
            if !handle.float(INLET_Y, y) {
                dropped += 1;
            }

            let next = (t / NOTE_SECONDS) as usize % NOTES.len();
            if next != note {
                note = next;
                tracing::info!(frequency = NOTES[note], "note");
                if !handle.float(INLET_FREQUENCY, NOTES[note]) || !handle.bang(INLET_FREQUENCY) {
                    dropped += 1;
                }
            }

            std::thread::sleep(CONTROL_INTERVAL);
        }

        if dropped > 0 {
            tracing::warn!(dropped, "control messages dropped on a full queue");
        }
        tracing::info!("done");

        Ok(())
    }
}

impl Default for Morphslew {
    fn default() -> Self {
        Self::new()
    }
}

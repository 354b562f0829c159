//! Fixed-rate tone generators.
//!
//! Every generator refuses requests above half its sampling frequency
//! rather than aliasing them.

use crate::dsp::signal::Signal;
use crate::error::{ValidationError, WaveSmithError};
use std::f64::consts::PI;

/// Supported waveform shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
    /// One period of arbitrary samples, indexed by rounded phase.
    Wavetable(Vec<f64>),
}

/// A tone generator bound to a sampling frequency.
#[derive(Debug, Clone)]
pub struct Synth {
    waveform: Waveform,
    sampling_freq: u32,
}

impl Synth {
    pub fn sine(sampling_freq: u32) -> Self {
        Synth {
            waveform: Waveform::Sine,
            sampling_freq,
        }
    }

    pub fn square(sampling_freq: u32) -> Self {
        Synth {
            waveform: Waveform::Square,
            sampling_freq,
        }
    }

    /// Rising ramp from -1.0 across one period.
    pub fn sawtooth(sampling_freq: u32) -> Self {
        let half = (sampling_freq / 2) as i64;
        let mut table = Vec::with_capacity(sampling_freq as usize);
        for i in 0..sampling_freq as i64 {
            table.push((i - half) as f64 / half as f64);
        }
        Synth {
            waveform: Waveform::Wavetable(table),
            sampling_freq,
        }
    }

    /// Use one period of caller-provided samples. The table must hold
    /// exactly one sample per Hz of the sampling frequency.
    pub fn with_wavetable(table: Vec<f64>, sampling_freq: u32) -> Result<Self, WaveSmithError> {
        if table.len() != sampling_freq as usize {
            return Err(ValidationError::WavetableSize {
                expected: sampling_freq as usize,
                got: table.len(),
            }
            .into());
        }
        Ok(Synth {
            waveform: Waveform::Wavetable(table),
            sampling_freq,
        })
    }

    pub fn sampling_freq(&self) -> u32 {
        self.sampling_freq
    }

    /// Zero is ignored, keeping the current rate.
    pub fn set_sampling_freq(&mut self, sampling_freq: u32) {
        if sampling_freq > 0 {
            self.sampling_freq = sampling_freq;
        }
    }

    /// Generate `duration` seconds of a tone at `frequency` Hz.
    ///
    /// The sample count rounds up, so any positive duration yields at
    /// least one sample.
    pub fn generate(&self, duration: f64, frequency: f64) -> Result<Signal, WaveSmithError> {
        if (self.sampling_freq as f64) < 2.0 * frequency {
            return Err(ValidationError::ShannonViolation {
                frequency,
                sampling_freq: self.sampling_freq,
            }
            .into());
        }

        let count = (duration * self.sampling_freq as f64).ceil() as usize;
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            samples.push(self.value_at(i as f64 * frequency));
        }
        Ok(Signal::new(samples, self.sampling_freq))
    }

    fn value_at(&self, t: f64) -> f64 {
        let fs = self.sampling_freq;
        match &self.waveform {
            Waveform::Sine => (2.0 * PI * t / fs as f64).sin(),
            Waveform::Square => {
                if (t as i64) % fs as i64 > (fs / 2) as i64 {
                    -1.0
                } else {
                    1.0
                }
            }
            Waveform::Wavetable(table) => {
                let index = (t.round() as i64).rem_euclid(fs as i64) as usize;
                table.get(index).copied().unwrap_or(0.0)
            }
        }
    }
}

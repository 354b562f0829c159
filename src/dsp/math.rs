//! Decibel conversion and window functions.

use crate::dsp::signal::Signal;
use std::f64::consts::PI;

/// Convert a linear amplitude ratio to decibels.
pub fn to_db(v: f64) -> f64 {
    20.0 * v.log10()
}

/// Convert decibels back to a linear amplitude ratio.
pub fn from_db(v: f64) -> f64 {
    10f64.powf(v / 20.0)
}

/// Hamming window of `size` samples, peaking at 1.0 mid-buffer.
pub fn hamming_window(size: usize) -> Signal {
    let alpha = 0.53836;
    let beta = 0.46164;
    let mut window = Vec::with_capacity(size);
    for i in 0..size {
        window.push(alpha - beta * (2.0 * PI * i as f64 / size as f64).cos());
    }
    Signal::from_samples(window)
}

/// Hann window of `size` samples, zero at both edges.
pub fn hann_window(size: usize) -> Signal {
    let mut window = Vec::with_capacity(size);
    for i in 0..size {
        window.push(0.5 * (1.0 - (2.0 * PI * i as f64 / (size as f64 - 1.0)).cos()));
    }
    Signal::from_samples(window)
}

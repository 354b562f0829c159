//! Sample buffers and the direct discrete transform.
//!
//! `Signal` owns a mono f64 sample vector tagged with its sample rate.
//! The transform is the direct O(N^2) evaluation of the definition, which
//! works for any buffer length and keeps the filter pipeline free of
//! power-of-two constraints. Forward output is magnitude only; the
//! inverse keeps the real part, which is exact for the real, symmetric
//! gain masks built by the filter module.

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// Sample rate assigned to buffers created without an explicit rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

/// A mono sample buffer and its sample rate.
///
/// The rate is always positive: constructors fall back to
/// [`DEFAULT_SAMPLE_RATE`] and the setter ignores zero.
#[derive(Debug, Clone)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Default for Signal {
    fn default() -> Self {
        Signal {
            samples: Vec::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Signal {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        let sample_rate = if sample_rate == 0 {
            DEFAULT_SAMPLE_RATE
        } else {
            sample_rate
        };
        Signal { samples, sample_rate }
    }

    /// Wrap samples at the default 8000 Hz rate.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Signal::new(samples, DEFAULT_SAMPLE_RATE)
    }

    /// Read the sample at `i`, or NaN when `i` falls outside `[0, len)`.
    pub fn at(&self, i: isize) -> f64 {
        if i < 0 || i as usize >= self.samples.len() {
            return f64::NAN;
        }
        self.samples[i as usize]
    }

    /// Add `value` into the sample at `i`. Out-of-range indexes are ignored.
    pub fn add_at(&mut self, i: usize, value: f64) {
        if let Some(s) = self.samples.get_mut(i) {
            *s += value;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Set the sample rate. Zero is silently ignored and the last good
    /// value persists.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate > 0 {
            self.sample_rate = sample_rate;
        }
    }

    /// Direct evaluation of the transform definition, O(N^2).
    ///
    /// Forward mode discards phase and returns per-bucket magnitude.
    /// Inverse mode returns `re / N` only. Forward followed by inverse is
    /// therefore not a round trip for arbitrary signals; it is exact for
    /// the real-valued gain masks the filter module feeds it.
    fn direct_transform(&self, inverse: bool) -> Signal {
        let n = self.samples.len();
        if n == 0 {
            return Signal::new(Vec::new(), self.sample_rate);
        }

        let direction = if inverse { 1.0 } else { -1.0 };
        let theta = direction * 2.0 * PI / n as f64;
        let mut out = Vec::with_capacity(n);

        for k in 0..n {
            let theta_k = theta * k as f64;
            let mut sum_re = 0.0;
            let mut sum_im = 0.0;

            for (i, &sample) in self.samples.iter().enumerate() {
                let arg = theta_k * i as f64;
                sum_re += sample * arg.cos();
                if !inverse {
                    sum_im += sample * arg.sin();
                }
            }

            if inverse {
                out.push(sum_re / n as f64);
            } else {
                out.push((sum_re * sum_re + sum_im * sum_im).sqrt());
            }
        }

        Signal::new(out, self.sample_rate)
    }

    /// Magnitude spectrum of the buffer (forward transform).
    pub fn spectrum(&self) -> Signal {
        self.direct_transform(false)
    }

    /// Real part of the inverse transform, scaled by 1/N.
    pub fn inverse_transform(&self) -> Signal {
        self.direct_transform(true)
    }

    /// Causal, truncated convolution with `kernel`.
    ///
    /// Output sample `i` is the sum of `kernel[k] * self[i - k]` for
    /// `k <= i`, so the result keeps this buffer's length and rate.
    pub fn convolve(&self, kernel: &Signal) -> Signal {
        let mut out = Vec::with_capacity(self.samples.len());

        for i in 0..self.samples.len() {
            let mut sum = 0.0;
            for (k, &h) in kernel.samples.iter().enumerate() {
                if k > i {
                    break;
                }
                sum += h * self.samples[i - k];
            }
            out.push(sum);
        }

        Signal::new(out, self.sample_rate)
    }

    /// Add `other` element-wise into this buffer starting at `offset`.
    ///
    /// The whole operand must fit: if `offset + other.len()` exceeds this
    /// buffer's length nothing is written.
    pub fn add(&mut self, other: &Signal, offset: usize) {
        if other.samples.len() + offset > self.samples.len() {
            return;
        }
        for (i, &v) in other.samples.iter().enumerate() {
            self.samples[offset + i] += v;
        }
    }

    /// Multiply element-wise by `other` starting at `offset`, with the
    /// same fit guard as [`Signal::add`].
    pub fn multiply_elements(&mut self, other: &Signal, offset: usize) {
        if other.samples.len() + offset > self.samples.len() {
            return;
        }
        for (i, &v) in other.samples.iter().enumerate() {
            self.samples[offset + i] *= v;
        }
    }

    pub fn scalar_multiply(&mut self, scalar: f64) {
        for s in &mut self.samples {
            *s *= scalar;
        }
    }

    /// Divide every sample by the largest signed sample, so the peak
    /// becomes exactly 1.0. Note this is the signed maximum, not the
    /// absolute one: an all-negative buffer gets flipped and stretched.
    pub fn normalize(&mut self) {
        let max = self.max();
        if max != 0.0 && max.is_finite() {
            self.scalar_multiply(1.0 / max);
        }
    }

    /// Largest signed sample. Negative infinity for an empty buffer.
    pub fn max(&self) -> f64 {
        let mut max = f64::NEG_INFINITY;
        for &s in &self.samples {
            if s > max {
                max = s;
            }
        }
        max
    }

    fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator). Zero for buffers
    /// shorter than two samples.
    pub fn std_dev(&self) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let mut acc = 0.0;
        for &s in &self.samples {
            acc += (mean - s) * (mean - s);
        }
        (acc / (n as f64 - 1.0)).sqrt()
    }

    /// Grow the buffer to length `n` by appending zeros. Buffers already
    /// that long are left untouched.
    pub fn pad_with_zeros(&mut self, n: usize) {
        if n > self.samples.len() {
            self.samples.resize(n, 0.0);
        }
    }

    /// Deep copy of the first `n` samples (clamped to the buffer length).
    pub fn prefix(&self, n: usize) -> Signal {
        let end = n.min(self.samples.len());
        Signal::new(self.samples[..end].to_vec(), self.sample_rate)
    }

    /// Width in Hz of one transform bucket.
    pub fn bucket_width(&self) -> f64 {
        self.sample_rate as f64 / self.samples.len() as f64
    }

    /// Center frequency of bucket `n`, or NaN when `n` is out of range.
    pub fn bucket_frequency(&self, n: usize) -> f64 {
        if n >= self.samples.len() {
            return f64::NAN;
        }
        self.sample_rate as f64 * n as f64 / self.samples.len() as f64
    }

    /// Index of the bucket holding `hz`. `None` for negative frequencies.
    pub fn closest_bucket(&self, hz: f64) -> Option<usize> {
        if hz < 0.0 {
            return None;
        }
        Some((hz * self.samples.len() as f64 / self.sample_rate as f64) as usize)
    }

    /// Bucket of the frequency mirrored across the spectrum, `rate - hz`.
    pub fn mirror_bucket(&self, hz: f64) -> Option<usize> {
        self.closest_bucket(self.sample_rate as f64 - hz)
    }

    /// Exchange the two halves of the buffer, centering a circularly
    /// computed impulse response (fftshift).
    ///
    /// `[1 2 3 4 5 6]` becomes `[4 5 6 1 2 3]`; `[1 2 3 4 5]` becomes
    /// `[3 4 5 1 2]`. For even lengths applying it twice restores the
    /// original order; odd lengths net a one-step rotation per pair of
    /// calls.
    pub fn shift_halves(&mut self) {
        let half = self.samples.len() / 2;
        let mut begin = 0;

        if self.samples.len() % 2 == 1 {
            let middle = self.samples[half];
            for i in (1..=half).rev() {
                self.samples[i] = self.samples[i - 1];
            }
            self.samples[0] = middle;
            begin = 1;
        }

        for i in begin..half + begin {
            self.samples.swap(i, i + half);
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.samples {
            write!(f, "{s} ")?;
        }
        Ok(())
    }
}

/// Magnitude spectrum paired with each bucket's center frequency.
///
/// This is the analysis record handed across the WASM boundary; the
/// in-crate pipeline works on [`Signal`] directly.
#[derive(Debug, Clone, Serialize)]
pub struct Spectrum {
    pub bucket_hz: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

impl Spectrum {
    /// Run the forward transform and tag each magnitude with its bucket
    /// frequency.
    pub fn from_signal(signal: &Signal) -> Spectrum {
        let mag = signal.spectrum();
        let bucket_hz = (0..mag.len()).map(|k| mag.bucket_frequency(k)).collect();
        Spectrum {
            bucket_hz,
            magnitudes: mag.samples().to_vec(),
        }
    }
}

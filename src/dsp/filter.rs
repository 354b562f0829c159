//! Frequency-sampling FIR filters.
//!
//! A filter is specified as a pass predicate over transform buckets.
//! The gain mask it induces is inverse-transformed and recentered to
//! produce a causal convolution kernel. Masks cover both spectrum
//! halves so the kernel comes out real and symmetric.

use crate::dsp::signal::Signal;
use crate::error::{ConstraintViolation, ValidationError, WaveSmithError};

/// Filter shape and its cutoff frequencies in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterMode {
    Lowpass { cutoff: f64 },
    Highpass { cutoff: f64 },
    Bandpass { low: f64, high: f64 },
}

/// An FIR filter designed by frequency sampling.
///
/// Construction is cheap: the kernel is derived on first use, then kept
/// current by every parameter change.
#[derive(Debug, Clone)]
pub struct FirFilter {
    mode: FilterMode,
    gain: f64,
    length: usize,
    sample_rate: u32,
    /// Mask only the lower spectrum half instead of both. Historical
    /// behavior: below the Nyquist frequency this leaves lowpass and
    /// bandpass masks entirely empty.
    legacy_mask: bool,
    response: Signal,
    kernel: Signal,
}

impl FirFilter {
    pub fn lowpass(
        cutoff: f64,
        length: usize,
        gain: f64,
        sample_rate: u32,
    ) -> Result<Self, WaveSmithError> {
        Self::new(FilterMode::Lowpass { cutoff }, length, gain, sample_rate, false)
    }

    pub fn highpass(
        cutoff: f64,
        length: usize,
        gain: f64,
        sample_rate: u32,
    ) -> Result<Self, WaveSmithError> {
        Self::new(FilterMode::Highpass { cutoff }, length, gain, sample_rate, false)
    }

    pub fn bandpass(
        low: f64,
        high: f64,
        length: usize,
        gain: f64,
        sample_rate: u32,
    ) -> Result<Self, WaveSmithError> {
        Self::new(FilterMode::Bandpass { low, high }, length, gain, sample_rate, false)
    }

    /// Lowpass with the historical single-half mask.
    pub fn lowpass_legacy(
        cutoff: f64,
        length: usize,
        gain: f64,
        sample_rate: u32,
    ) -> Result<Self, WaveSmithError> {
        Self::new(FilterMode::Lowpass { cutoff }, length, gain, sample_rate, true)
    }

    /// Bandpass with the historical single-half mask.
    pub fn bandpass_legacy(
        low: f64,
        high: f64,
        length: usize,
        gain: f64,
        sample_rate: u32,
    ) -> Result<Self, WaveSmithError> {
        Self::new(FilterMode::Bandpass { low, high }, length, gain, sample_rate, true)
    }

    fn new(
        mode: FilterMode,
        length: usize,
        gain: f64,
        sample_rate: u32,
        legacy_mask: bool,
    ) -> Result<Self, WaveSmithError> {
        if length == 0 {
            return Err(ValidationError::ZeroFilterLength.into());
        }
        if sample_rate == 0 {
            return Err(ValidationError::ZeroSampleRate.into());
        }
        if gain < 0.0 {
            return Err(ValidationError::NegativeGain { gain }.into());
        }
        Ok(FirFilter {
            mode,
            gain,
            length,
            sample_rate,
            legacy_mask,
            response: Signal::new(vec![0.0; length], sample_rate),
            kernel: Signal::new(Vec::new(), sample_rate),
        })
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Copy of the current gain mask, one entry per transform bucket.
    /// All zeros until the kernel has been derived once.
    pub fn freq_response(&self) -> Signal {
        self.response.clone()
    }

    /// The convolution kernel. Empty until derived.
    pub fn impulse_response(&self) -> &Signal {
        &self.kernel
    }

    /// Move the cutoff (the lower band edge for bandpass). Negative
    /// values are rejected without touching the filter.
    pub fn set_cutoff(&mut self, hz: f64) -> Result<(), WaveSmithError> {
        if hz < 0.0 {
            return Err(ValidationError::NegativeCutoff { hz }.into());
        }
        match &mut self.mode {
            FilterMode::Lowpass { cutoff } | FilterMode::Highpass { cutoff } => *cutoff = hz,
            FilterMode::Bandpass { low, .. } => *low = hz,
        }
        self.rebuild()
    }

    /// Move the upper band edge. Only meaningful for bandpass filters.
    pub fn set_cutoff_sup(&mut self, hz: f64) -> Result<(), WaveSmithError> {
        match &mut self.mode {
            FilterMode::Bandpass { high, .. } => {
                if hz < 0.0 {
                    return Err(ValidationError::NegativeCutoffSup { hz }.into());
                }
                *high = hz;
            }
            _ => return Err(ValidationError::NotBandpass.into()),
        }
        self.rebuild()
    }

    pub fn set_length(&mut self, length: usize) -> Result<(), WaveSmithError> {
        if length == 0 {
            return Err(ValidationError::ZeroFilterLength.into());
        }
        self.length = length;
        self.rebuild()
    }

    /// Zero is ignored, keeping the current rate.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), WaveSmithError> {
        if sample_rate == 0 {
            return Ok(());
        }
        self.sample_rate = sample_rate;
        self.rebuild()
    }

    /// Negative gains are ignored, keeping the current gain.
    pub fn set_gain(&mut self, gain: f64) -> Result<(), WaveSmithError> {
        if gain >= 0.0 {
            self.gain = gain;
            return self.rebuild();
        }
        Ok(())
    }

    /// Convolve `signal` with the kernel, deriving the kernel first if
    /// it has never been built.
    pub fn filter(&mut self, signal: &Signal) -> Result<Signal, WaveSmithError> {
        match self.mode {
            FilterMode::Lowpass { cutoff } | FilterMode::Highpass { cutoff } => {
                if cutoff < 0.0 {
                    return Err(ValidationError::NegativeCutoff { hz: cutoff }.into());
                }
            }
            FilterMode::Bandpass { low, high } => {
                if low < 0.0 {
                    return Err(ValidationError::NegativeCutoff { hz: low }.into());
                }
                if high < 0.0 {
                    return Err(ValidationError::NegativeCutoffSup { hz: high }.into());
                }
            }
        }
        if self.kernel.is_empty() {
            self.rebuild()?;
        }
        Ok(signal.convolve(&self.kernel))
    }

    /// Add `gain` to every response bucket between `low` and `high` Hz
    /// and to their mirror images, then re-derive the kernel. Bands
    /// accumulate on top of the current mask.
    pub fn add_band(&mut self, low: f64, high: f64, gain: f64) -> Result<(), WaveSmithError> {
        let mut deferred = None;
        if self.kernel.is_empty() {
            if let Err(e) = self.rebuild() {
                deferred = Some(e);
            }
        }

        let width = self.response.bucket_width();
        let mut f = low;
        while f <= high {
            if let Some(k) = self.response.closest_bucket(f) {
                self.response.add_at(k, gain);
            }
            if let Some(k) = self.response.mirror_bucket(f) {
                self.response.add_at(k, gain);
            }
            f += width;
        }
        self.rederive_kernel();

        match deferred {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Clamp cutoffs to the Nyquist limit, rebuild the gain mask and
    /// kernel from the current parameters, then report any clamp. The
    /// filter is fully rebuilt even when this returns an error.
    fn rebuild(&mut self) -> Result<(), WaveSmithError> {
        let limit = self.sample_rate as f64 / 2.0;
        let mut clamped = None;
        match &mut self.mode {
            FilterMode::Lowpass { cutoff } | FilterMode::Highpass { cutoff } => {
                if *cutoff >= limit {
                    clamped = Some(ConstraintViolation::CutoffClamped {
                        requested: *cutoff,
                        limit,
                    });
                    *cutoff = limit;
                }
            }
            FilterMode::Bandpass { low, high } => {
                if *low >= limit {
                    clamped = Some(ConstraintViolation::CutoffClamped {
                        requested: *low,
                        limit,
                    });
                    *low = limit;
                }
                if *high >= limit {
                    if clamped.is_none() {
                        clamped = Some(ConstraintViolation::CutoffClamped {
                            requested: *high,
                            limit,
                        });
                    }
                    *high = limit;
                }
            }
        }

        let mut response = Signal::new(vec![0.0; self.length], self.sample_rate);
        for k in 0..self.length {
            let f = response.bucket_frequency(k);
            if self.passes(f) {
                response.add_at(k, self.gain);
            }
        }
        self.response = response;
        self.rederive_kernel();

        if let Some(violation) = clamped {
            log::warn!("{violation}");
            return Err(violation.into());
        }
        Ok(())
    }

    fn rederive_kernel(&mut self) {
        let mut kernel = self.response.inverse_transform();
        kernel.shift_halves();
        self.kernel = kernel;
    }

    fn passes(&self, f: f64) -> bool {
        let rate = self.sample_rate as f64;
        match self.mode {
            FilterMode::Lowpass { cutoff } => {
                if self.legacy_mask {
                    f <= cutoff && f >= rate - cutoff
                } else {
                    f <= cutoff || f >= rate - cutoff
                }
            }
            FilterMode::Highpass { cutoff } => f >= cutoff && f <= rate - cutoff,
            FilterMode::Bandpass { low, high } => {
                let direct = f >= low && f <= high;
                let mirror = f >= rate - high && f <= rate - low;
                if self.legacy_mask {
                    direct && mirror
                } else {
                    direct || mirror
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::synth::Synth;

    fn impulse(len: usize, rate: u32) -> Signal {
        let mut samples = vec![0.0; len];
        samples[0] = 1.0;
        Signal::new(samples, rate)
    }

    #[test]
    fn construction_validates_shape() {
        assert!(matches!(
            FirFilter::lowpass(400.0, 0, 1.0, 8000),
            Err(WaveSmithError::Validation(ValidationError::ZeroFilterLength))
        ));
        assert!(matches!(
            FirFilter::lowpass(400.0, 32, 1.0, 0),
            Err(WaveSmithError::Validation(ValidationError::ZeroSampleRate))
        ));
        assert!(matches!(
            FirFilter::lowpass(400.0, 32, -0.5, 8000),
            Err(WaveSmithError::Validation(ValidationError::NegativeGain { .. }))
        ));
        assert!(
            FirFilter::lowpass(-5.0, 32, 1.0, 8000).is_ok(),
            "cutoff sign is checked when filtering"
        );
    }

    #[test]
    fn kernel_builds_on_first_use() {
        let mut filter = FirFilter::lowpass(400.0, 32, 1.0, 8000).unwrap();
        assert!(filter.impulse_response().is_empty());
        assert!(filter.freq_response().samples().iter().all(|&g| g == 0.0));

        filter.filter(&impulse(4, 8000)).unwrap();
        assert_eq!(filter.impulse_response().len(), 32);
    }

    #[test]
    fn highpass_mask_passes_inner_buckets() {
        let mut filter = FirFilter::highpass(400.0, 32, 1.0, 8000).unwrap();
        filter.filter(&impulse(4, 8000)).unwrap();
        let response = filter.freq_response();
        for (k, &g) in response.samples().iter().enumerate() {
            let expected = if (2..=30).contains(&k) { 1.0 } else { 0.0 };
            assert_eq!(g, expected, "bucket {k}");
        }
    }

    #[test]
    fn lowpass_mask_keeps_dc_and_mirror_edge() {
        let mut filter = FirFilter::lowpass(400.0, 32, 1.0, 8000).unwrap();
        filter.filter(&impulse(4, 8000)).unwrap();
        let response = filter.freq_response();
        for (k, &g) in response.samples().iter().enumerate() {
            let expected = if k <= 1 || k == 31 { 1.0 } else { 0.0 };
            assert_eq!(g, expected, "bucket {k}");
        }
    }

    #[test]
    fn bandpass_mask_is_mirror_symmetric() {
        let mut filter = FirFilter::bandpass(1000.0, 2000.0, 32, 1.0, 8000).unwrap();
        filter.filter(&impulse(4, 8000)).unwrap();
        let response = filter.freq_response();
        for (k, &g) in response.samples().iter().enumerate() {
            let expected = if (4..=8).contains(&k) || (24..=28).contains(&k) {
                1.0
            } else {
                0.0
            };
            assert_eq!(g, expected, "bucket {k}");
        }
        for k in 1..32 {
            assert_eq!(response.samples()[k], response.samples()[32 - k]);
        }
    }

    #[test]
    fn legacy_masks_are_empty_below_nyquist() {
        let mut low = FirFilter::lowpass_legacy(400.0, 32, 1.0, 8000).unwrap();
        low.filter(&impulse(4, 8000)).unwrap();
        assert!(low.freq_response().samples().iter().all(|&g| g == 0.0));

        let mut band = FirFilter::bandpass_legacy(1000.0, 2000.0, 32, 1.0, 8000).unwrap();
        band.filter(&impulse(4, 8000)).unwrap();
        assert!(band.freq_response().samples().iter().all(|&g| g == 0.0));
    }

    #[test]
    fn filtering_an_impulse_yields_the_kernel() {
        let mut filter = FirFilter::highpass(1000.0, 32, 1.0, 8000).unwrap();
        let out = filter.filter(&impulse(32, 8000)).unwrap();
        assert_eq!(out.samples(), filter.impulse_response().samples());
        assert_eq!(out.sample_rate(), 8000);
    }

    #[test]
    fn separates_pass_band_from_stop_band() {
        let mut filter = FirFilter::lowpass(400.0, 32, 1.0, 8000).unwrap();
        let pass = Synth::sine(8000).generate(0.25, 250.0).unwrap();
        let stop = Synth::sine(8000).generate(0.25, 3000.0).unwrap();

        let passed = filter.filter(&pass).unwrap();
        let stopped = filter.filter(&stop).unwrap();

        // Skip the kernel-length transient before measuring.
        let passed_peak = passed.samples()[100..]
            .iter()
            .fold(0.0_f64, |m, &v| m.max(v.abs()));
        let stopped_peak = stopped.samples()[100..]
            .iter()
            .fold(0.0_f64, |m, &v| m.max(v.abs()));
        assert!(passed_peak > 0.9, "pass-band tone kept, peak {passed_peak}");
        assert!(
            stopped_peak < 0.01,
            "stop-band tone removed, peak {stopped_peak}"
        );
    }

    #[test]
    fn negative_cutoff_rejected_at_filter_time() {
        let mut filter = FirFilter::highpass(-5.0, 32, 1.0, 8000).unwrap();
        assert!(matches!(
            filter.filter(&impulse(8, 8000)),
            Err(WaveSmithError::Validation(ValidationError::NegativeCutoff { .. }))
        ));

        let mut band = FirFilter::bandpass(500.0, -1.0, 32, 1.0, 8000).unwrap();
        assert!(matches!(
            band.filter(&impulse(8, 8000)),
            Err(WaveSmithError::Validation(
                ValidationError::NegativeCutoffSup { .. }
            ))
        ));
    }

    #[test]
    fn nyquist_cutoff_clamps_but_completes() {
        let mut filter = FirFilter::lowpass(5000.0, 32, 1.0, 8000).unwrap();
        match filter.filter(&impulse(8, 8000)) {
            Err(WaveSmithError::Constraint(ConstraintViolation::CutoffClamped {
                requested,
                limit,
            })) => {
                assert_eq!(requested, 5000.0);
                assert_eq!(limit, 4000.0);
            }
            other => panic!("expected a clamp violation, got {other:?}"),
        }

        // The filter came out fully rebuilt with the clamped cutoff.
        assert_eq!(filter.mode(), FilterMode::Lowpass { cutoff: 4000.0 });
        assert!(filter.freq_response().samples().iter().all(|&g| g == 1.0));
        let out = filter.filter(&impulse(8, 8000)).unwrap();
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn setters_rebuild_immediately() {
        let mut filter = FirFilter::highpass(400.0, 32, 1.0, 8000).unwrap();
        filter.set_cutoff(1000.0).unwrap();

        let response = filter.freq_response();
        assert_eq!(response.samples()[3], 0.0, "750 Hz now below cutoff");
        assert_eq!(response.samples()[4], 1.0, "1000 Hz passes");
        assert_eq!(filter.impulse_response().len(), 32);
    }

    #[test]
    fn rejecting_setters_leave_state_untouched() {
        let mut filter = FirFilter::lowpass(600.0, 32, 1.0, 8000).unwrap();
        filter.filter(&impulse(4, 8000)).unwrap();
        let before = filter.freq_response();

        assert!(filter.set_cutoff(-10.0).is_err());
        assert!(filter.set_length(0).is_err());
        assert!(matches!(
            filter.set_cutoff_sup(2000.0),
            Err(WaveSmithError::Validation(ValidationError::NotBandpass))
        ));
        assert_eq!(filter.freq_response().samples(), before.samples());
        assert_eq!(filter.length(), 32);
    }

    #[test]
    fn zero_rate_and_negative_gain_are_ignored() {
        let mut filter = FirFilter::lowpass(600.0, 32, 1.0, 8000).unwrap();
        filter.filter(&impulse(4, 8000)).unwrap();
        let before = filter.freq_response();

        filter.set_sample_rate(0).unwrap();
        filter.set_gain(-3.0).unwrap();
        assert_eq!(filter.sample_rate(), 8000);
        assert_eq!(filter.gain(), 1.0);
        assert_eq!(filter.freq_response().samples(), before.samples());
    }

    #[test]
    fn bandpass_setters_move_band_edges() {
        let mut filter = FirFilter::bandpass(1000.0, 2000.0, 32, 1.0, 8000).unwrap();
        filter.set_cutoff(1500.0).unwrap();
        filter.set_cutoff_sup(2500.0).unwrap();
        assert_eq!(
            filter.mode(),
            FilterMode::Bandpass {
                low: 1500.0,
                high: 2500.0
            }
        );

        let response = filter.freq_response();
        assert_eq!(response.samples()[5], 0.0, "1250 Hz below the band");
        assert_eq!(response.samples()[6], 1.0, "1500 Hz inside the band");
        assert_eq!(response.samples()[10], 1.0, "2500 Hz inside the band");
        assert_eq!(response.samples()[11], 0.0, "2750 Hz above the band");
    }

    #[test]
    fn add_band_accumulates_on_the_mask() {
        let mut filter = FirFilter::lowpass(400.0, 32, 1.0, 8000).unwrap();
        filter.add_band(1000.0, 1500.0, 0.5).unwrap();

        let response = filter.freq_response();
        for k in [0, 1, 31] {
            assert_eq!(response.samples()[k], 1.0, "baseline bucket {k}");
        }
        for k in [4, 5, 6, 26, 27, 28] {
            assert_eq!(response.samples()[k], 0.5, "band bucket {k}");
        }
        assert_eq!(response.samples()[7], 0.0);
        assert_eq!(filter.impulse_response().len(), 32, "kernel re-derived");
    }
}

pub mod dsp;
pub mod error;

use crate::dsp::filter::FirFilter;
use crate::dsp::quantize::SampleDepth;
use crate::dsp::signal::Spectrum;
use crate::dsp::synth::Synth;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the wavesmith-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

fn synth_for(waveform: &str, sample_rate: u32) -> Result<Synth, JsValue> {
    match waveform {
        "sine" => Ok(Synth::sine(sample_rate)),
        "square" => Ok(Synth::square(sample_rate)),
        "sawtooth" => Ok(Synth::sawtooth(sample_rate)),
        other => Err(JsValue::from_str(&format!("unknown waveform: {other}"))),
    }
}

/// WASM-exposed: synthesize a tone and return complete WAV bytes
/// (16-bit signed, mono).
#[wasm_bindgen]
pub fn render_tone_wav(
    waveform: &str,
    frequency: f64,
    duration_secs: f64,
    sample_rate: u32,
) -> Result<Vec<u8>, JsValue> {
    let tone = synth_for(waveform, sample_rate)?
        .generate(duration_secs, frequency)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    dsp::wave::render_wav(&tone, SampleDepth::S16).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: synthesize a tone, run it through a highpass filter,
/// and return complete WAV bytes (16-bit signed, mono).
#[wasm_bindgen]
pub fn render_filtered_tone_wav(
    waveform: &str,
    frequency: f64,
    duration_secs: f64,
    sample_rate: u32,
    cutoff: f64,
    filter_length: usize,
) -> Result<Vec<u8>, JsValue> {
    let tone = synth_for(waveform, sample_rate)?
        .generate(duration_secs, frequency)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let mut filter = FirFilter::highpass(cutoff, filter_length, 1.0, sample_rate)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let filtered = filter
        .filter(&tone)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    dsp::wave::render_wav(&filtered, SampleDepth::S16)
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: magnitude spectrum of a generated tone over an
/// analysis window of `window_len` samples, as `{ bucket_hz, magnitudes }`.
#[wasm_bindgen]
pub fn tone_spectrum(
    waveform: &str,
    frequency: f64,
    sample_rate: u32,
    window_len: usize,
) -> Result<JsValue, JsValue> {
    let duration = window_len as f64 / sample_rate as f64;
    let tone = synth_for(waveform, sample_rate)?
        .generate(duration, frequency)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let spectrum = Spectrum::from_signal(&tone.prefix(window_len));
    serde_wasm_bindgen::to_value(&spectrum).map_err(|e| JsValue::from_str(&format!("{e}")))
}

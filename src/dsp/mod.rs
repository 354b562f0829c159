//! Pure Rust signal processing on `f64` buffers.
//!
//! The same code serves native callers and the WASM build: signals are
//! generated, filtered, quantized, and packed into WAV containers with
//! no platform-specific paths.

pub mod signal;
pub mod filter;
pub mod synth;
pub mod quantize;
pub mod wave;
pub mod math;
pub mod interp;

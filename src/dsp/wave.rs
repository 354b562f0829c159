//! RIFF/WAVE container assembly.
//!
//! Samples are quantized as they arrive and stored little-endian; the
//! header is assembled only after every sample is known, and the whole
//! container goes to disk in a single write, so the emitted bytes can
//! never carry a header inconsistent with the body.

use crate::dsp::quantize::{Quantizer, SampleDepth};
use crate::dsp::signal::Signal;
use crate::error::WaveSmithError;
use std::fs;
use std::path::Path;

/// Incremental PCM container builder.
///
/// The channel count lands in the header, but the push path stays a
/// single stream: callers interleave before pushing if they ever need
/// more than one channel.
#[derive(Debug, Clone)]
pub struct WaveWriter {
    sample_rate: u32,
    num_channels: u16,
    quantizer: Quantizer,
    /// Little-endian sample codes, in push order.
    frames: Vec<u8>,
}

impl WaveWriter {
    pub fn new(sample_rate: u32, depth: SampleDepth, num_channels: u16) -> Self {
        WaveWriter {
            sample_rate,
            num_channels,
            quantizer: Quantizer::new(depth),
            frames: Vec::new(),
        }
    }

    /// Quantize one sample and append its little-endian bytes.
    /// A rejected sample appends nothing.
    pub fn add_sample(&mut self, sample: f64) -> Result<(), WaveSmithError> {
        let code = self.quantizer.sample(sample)?;
        self.frames.extend(code.as_bytes().iter().rev());
        Ok(())
    }

    /// Drop all accumulated samples, keeping the header parameters.
    pub fn clear_samples(&mut self) {
        self.frames.clear();
    }

    pub fn sample_count(&self) -> usize {
        self.frames.len() / self.quantizer.depth().bytes()
    }

    /// Size of the data subchunk in bytes.
    pub fn data_size(&self) -> u32 {
        self.num_channels as u32
            * self.quantizer.depth().bytes() as u32
            * self.sample_count() as u32
    }

    /// RIFF chunk size: 36 header bytes past this field plus the data.
    pub fn chunk_size(&self) -> u32 {
        36 + self.data_size()
    }

    /// Assemble the complete container as a byte buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let bits_per_sample = self.quantizer.depth().bits();
        let byte_rate =
            self.sample_rate * self.num_channels as u32 * (bits_per_sample as u32 / 8);
        let block_align = self.num_channels * (bits_per_sample / 8);
        let data_size = self.data_size();

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&self.chunk_size().to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM format
        buf.extend_from_slice(&self.num_channels.to_le_bytes());
        buf.extend_from_slice(&self.sample_rate.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        buf.extend_from_slice(&self.frames);

        buf
    }

    /// Assemble and write the container in one filesystem call.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), WaveSmithError> {
        let bytes = self.to_bytes();
        log::debug!(
            "writing {} byte WAV ({} samples at {} Hz) to {}",
            bytes.len(),
            self.sample_count(),
            self.sample_rate,
            path.as_ref().display()
        );
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Render a signal to complete WAV bytes (mono).
pub fn render_wav(signal: &Signal, depth: SampleDepth) -> Result<Vec<u8>, WaveSmithError> {
    Ok(writer_for(signal, depth)?.to_bytes())
}

/// Render a signal and write it to a WAV file at `path` (mono).
pub fn write_wav<P: AsRef<Path>>(
    signal: &Signal,
    depth: SampleDepth,
    path: P,
) -> Result<(), WaveSmithError> {
    writer_for(signal, depth)?.write(path)
}

fn writer_for(signal: &Signal, depth: SampleDepth) -> Result<WaveWriter, WaveSmithError> {
    let mut writer = WaveWriter::new(signal.sample_rate(), depth, 1);
    for &s in signal.samples() {
        writer.add_sample(s)?;
    }
    Ok(writer)
}

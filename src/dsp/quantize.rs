//! Fixed-point quantization of [-1, 1] samples.

use crate::error::{ValidationError, WaveSmithError};

/// Supported PCM bit depths. The single-byte depth is unsigned, as the
/// WAV format requires; the wider depths are signed two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    U8,
    S16,
    S24,
    S32,
}

impl SampleDepth {
    pub fn bytes(self) -> usize {
        match self {
            SampleDepth::U8 => 1,
            SampleDepth::S16 => 2,
            SampleDepth::S24 => 3,
            SampleDepth::S32 => 4,
        }
    }

    pub fn bits(self) -> u16 {
        (self.bytes() * 8) as u16
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, SampleDepth::U8)
    }

    /// Largest representable code: `0xFF` for the unsigned byte, else a
    /// `0x7F` octet followed by `0xFF` octets.
    pub fn max_code(self) -> i64 {
        let mut out: i64 = if self.is_signed() { 0x7F } else { 0xFF };
        for _ in 1..self.bytes() {
            out = (out << 8) | 0xFF;
        }
        out
    }
}

/// A quantized sample: up to four bytes, most significant first.
#[derive(Debug, Clone, Copy)]
pub struct SampleCode {
    bytes: [u8; 4],
    len: usize,
}

impl SampleCode {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Maps bounded floating-point samples to fixed-width integer codes.
#[derive(Debug, Clone, Copy)]
pub struct Quantizer {
    depth: SampleDepth,
}

impl Quantizer {
    pub fn new(depth: SampleDepth) -> Self {
        Quantizer { depth }
    }

    pub fn depth(&self) -> SampleDepth {
        self.depth
    }

    /// Quantize one sample into its big-endian code.
    ///
    /// Values outside [-1, 1] (NaN included) are rejected. The code is
    /// clamped to `max_code() - 1`: the top code clips at the positive
    /// rail, so one unit of headroom is always kept.
    pub fn sample(&self, value: f64) -> Result<SampleCode, WaveSmithError> {
        if !(-1.0..=1.0).contains(&value) {
            return Err(ValidationError::SampleOutOfRange { value }.into());
        }

        let value = if self.depth.is_signed() { value } else { value + 1.0 };

        let step = 2.0 / 2f64.powi(8 * self.depth.bytes() as i32);
        // ties round toward positive infinity
        let mut code = (value / step + 0.5).floor() as i64;

        let max = self.depth.max_code() - 1;
        if code > max {
            code = max;
        }

        Ok(self.encode(code))
    }

    fn encode(&self, code: i64) -> SampleCode {
        let n = self.depth.bytes();
        let be = (code as u64).to_be_bytes();
        let mut bytes = [0u8; 4];
        bytes[..n].copy_from_slice(&be[8 - n..]);
        SampleCode { bytes, len: n }
    }
}

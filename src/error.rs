use std::fmt;
use std::io;

#[derive(Debug)]
pub enum WaveSmithError {
    Validation(ValidationError),
    Constraint(ConstraintViolation),
    Io(io::Error),
}

#[derive(Debug)]
pub enum ValidationError {
    SampleOutOfRange { value: f64 },
    NegativeCutoff { hz: f64 },
    NegativeCutoffSup { hz: f64 },
    ZeroFilterLength,
    ZeroSampleRate,
    NegativeGain { gain: f64 },
    NotBandpass,
    ShannonViolation { frequency: f64, sampling_freq: u32 },
    WavetableSize { expected: usize, got: usize },
    DatasetMismatch { abscissas: usize, ordinates: usize },
    NonIncreasingAbscissa { x: f64 },
}

#[derive(Debug)]
pub enum ConstraintViolation {
    CutoffClamped { requested: f64, limit: f64 },
}

impl fmt::Display for WaveSmithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveSmithError::Validation(e) => write!(f, "Validation error: {e}"),
            WaveSmithError::Constraint(e) => write!(f, "Constraint violation: {e}"),
            WaveSmithError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for WaveSmithError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::SampleOutOfRange { value } => {
                write!(f, "Sample {value} is outside [-1, 1]")
            }
            ValidationError::NegativeCutoff { hz } => {
                write!(f, "Cutoff frequency {hz} Hz is negative")
            }
            ValidationError::NegativeCutoffSup { hz } => {
                write!(f, "Upper cutoff frequency {hz} Hz is negative")
            }
            ValidationError::ZeroFilterLength => write!(f, "Filter length must be at least 1"),
            ValidationError::ZeroSampleRate => write!(f, "Sample rate must be at least 1 Hz"),
            ValidationError::NegativeGain { gain } => write!(f, "Gain {gain} is negative"),
            ValidationError::NotBandpass => {
                write!(f, "Upper cutoff only applies to bandpass filters")
            }
            ValidationError::ShannonViolation { frequency, sampling_freq } => {
                write!(
                    f,
                    "Sampling at {sampling_freq} Hz cannot represent {frequency} Hz (needs at least twice the signal frequency)"
                )
            }
            ValidationError::WavetableSize { expected, got } => {
                write!(f, "Wavetable must hold {expected} samples, got {got}")
            }
            ValidationError::DatasetMismatch { abscissas, ordinates } => {
                write!(f, "Dataset has {abscissas} abscissas but {ordinates} ordinates")
            }
            ValidationError::NonIncreasingAbscissa { x } => {
                write!(f, "Abscissa {x} does not extend the strictly increasing dataset")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::CutoffClamped { requested, limit } => {
                write!(
                    f,
                    "Cutoff {requested} Hz is at or above the Nyquist limit, clamped to {limit} Hz"
                )
            }
        }
    }
}

impl std::error::Error for ConstraintViolation {}

impl From<ValidationError> for WaveSmithError {
    fn from(e: ValidationError) -> Self {
        WaveSmithError::Validation(e)
    }
}

impl From<ConstraintViolation> for WaveSmithError {
    fn from(e: ConstraintViolation) -> Self {
        WaveSmithError::Constraint(e)
    }
}

impl From<io::Error> for WaveSmithError {
    fn from(e: io::Error) -> Self {
        WaveSmithError::Io(e)
    }
}

//! Newton-form polynomial interpolation.

use crate::error::{ValidationError, WaveSmithError};

/// Polynomial interpolation over strictly increasing abscissas.
///
/// The polynomial is kept in Newton form, so appending a point only
/// extends the divided-difference table instead of recomputing it.
#[derive(Debug, Clone, Default)]
pub struct NewtonInterpolation {
    xs: Vec<f64>,
    /// Newton coefficients, the leading divided difference of each
    /// table column.
    coefficients: Vec<f64>,
    /// Divided differences ending at the newest point, kept to extend
    /// the table incrementally.
    frontier: Vec<f64>,
}

impl NewtonInterpolation {
    pub fn new() -> Self {
        NewtonInterpolation::default()
    }

    /// Build from paired abscissas and ordinates. `t` must be strictly
    /// increasing and as long as `y`.
    pub fn from_dataset(t: &[f64], y: &[f64]) -> Result<Self, WaveSmithError> {
        if t.len() != y.len() {
            return Err(ValidationError::DatasetMismatch {
                abscissas: t.len(),
                ordinates: y.len(),
            }
            .into());
        }
        let mut interp = NewtonInterpolation::new();
        for (&t, &y) in t.iter().zip(y.iter()) {
            interp.add_point(t, y)?;
        }
        Ok(interp)
    }

    /// Append one point past the current last abscissa.
    pub fn add_point(&mut self, t: f64, y: f64) -> Result<(), WaveSmithError> {
        if let Some(&last) = self.xs.last() {
            if !(t > last) {
                return Err(ValidationError::NonIncreasingAbscissa { x: t }.into());
            }
        }

        let mut diffs = Vec::with_capacity(self.frontier.len() + 1);
        diffs.push(y);
        for (k, &prev) in self.frontier.iter().enumerate() {
            let span = t - self.xs[self.xs.len() - 1 - k];
            let next = (diffs[k] - prev) / span;
            diffs.push(next);
        }
        self.xs.push(t);
        self.coefficients.push(diffs[diffs.len() - 1]);
        self.frontier = diffs;
        Ok(())
    }

    /// Evaluate the interpolating polynomial at `x` by Horner's rule.
    /// An empty dataset evaluates to zero everywhere.
    pub fn evaluate(&self, x: f64) -> f64 {
        let mut acc = 0.0;
        for k in (0..self.coefficients.len()).rev() {
            acc = acc * (x - self.xs[k]) + self.coefficients[k];
        }
        acc
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

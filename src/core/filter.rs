// src/core/filter.rs
//
// The sample-sequence value object every analysis component operates on.
// Construction validates the invariants once; downstream code still checks
// the preconditions it depends on rather than trusting callers.

use serde::Serialize;

use crate::error::FilterError;

/// A FIR filter impulse response with its sample rate
#[derive(Debug, Clone, Serialize)]
pub struct FilterData {
    /// Coefficients as normalized float amplitudes
    pub samples: Vec<f64>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl FilterData {
    /// Build a validated filter: non-empty, fully finite, positive rate
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, FilterError> {
        if sample_rate == 0 {
            return Err(FilterError::Configuration {
                message: "sample rate must be positive".to_string(),
            });
        }
        ensure_finite(&samples, "filter")?;
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }
}

/// Validate a raw sample slice: non-empty and free of NaN/infinite values
pub fn ensure_finite(samples: &[f64], what: &str) -> Result<(), FilterError> {
    if samples.is_empty() {
        return Err(FilterError::InvalidInput {
            message: format!("{} sequence is empty", what),
        });
    }
    if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
        return Err(FilterError::InvalidInput {
            message: format!(
                "{} sequence contains a non-finite value at sample {}",
                what, index
            ),
        });
    }
    Ok(())
}

//! Forward and inverse FFT over real-valued filter sequences

use num_complex::Complex64;
use rustfft::FftPlanner;
use serde::Serialize;

use super::amplitude_to_db;
use crate::error::FilterError;

/// Positive-frequency view of a full complex FFT.
///
/// Bin `i` sits at `i * sample_rate / n` Hz, so two filters of different
/// lengths produce different grids. Consumers that compare spectra must
/// align grids first rather than walking bins by index.
#[derive(Debug, Clone, Serialize)]
pub struct Spectrum {
    pub frequencies_hz: Vec<f64>,
    pub magnitude: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    pub phase_rad: Vec<f64>,
    /// Bin spacing in Hz (sample_rate / sequence length)
    pub resolution_hz: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }

    /// Highest frequency on this grid, 0.0 for a binless spectrum
    pub fn max_frequency_hz(&self) -> f64 {
        self.frequencies_hz.last().copied().unwrap_or(0.0)
    }
}

/// Spectral transform utility. Plans are cached per length, so one analyzer
/// can serve sequences of mixed sizes (the operative lengths 16321, 16055
/// and 65536 are a mix of odd and power-of-two; the planner handles both
/// without padding).
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f64>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Full complex forward FFT of a real sequence
    pub fn forward(&mut self, samples: &[f64]) -> Result<Vec<Complex64>, FilterError> {
        if samples.is_empty() {
            return Err(FilterError::InvalidInput {
                message: "cannot transform an empty sequence".to_string(),
            });
        }

        let fft = self.planner.plan_fft_forward(samples.len());
        let mut buffer: Vec<Complex64> = samples.iter().map(|&s| Complex64::new(s, 0.0)).collect();
        fft.process(&mut buffer);
        Ok(buffer)
    }

    /// Inverse FFT back to a real sequence of the same length. The planner
    /// output is unnormalized, so the result is scaled by 1/n here.
    pub fn inverse(&mut self, spectrum: &[Complex64]) -> Result<Vec<f64>, FilterError> {
        if spectrum.is_empty() {
            return Err(FilterError::InvalidInput {
                message: "cannot invert an empty spectrum".to_string(),
            });
        }

        let ifft = self.planner.plan_fft_inverse(spectrum.len());
        let mut buffer = spectrum.to_vec();
        ifft.process(&mut buffer);

        let scale = 1.0 / spectrum.len() as f64;
        Ok(buffer.iter().map(|c| c.re * scale).collect())
    }

    /// Magnitude/phase spectrum over the positive-frequency bins (n/2 bins,
    /// spacing sample_rate/n)
    pub fn spectrum(&mut self, samples: &[f64], sample_rate: u32) -> Result<Spectrum, FilterError> {
        if sample_rate == 0 {
            return Err(FilterError::Configuration {
                message: "sample rate must be positive".to_string(),
            });
        }

        let full = self.forward(samples)?;
        let n = samples.len();
        let resolution_hz = sample_rate as f64 / n as f64;
        let positive = n / 2;

        let mut frequencies_hz = Vec::with_capacity(positive);
        let mut magnitude = Vec::with_capacity(positive);
        let mut magnitude_db = Vec::with_capacity(positive);
        let mut phase_rad = Vec::with_capacity(positive);

        for (i, bin) in full.iter().take(positive).enumerate() {
            let mag = bin.norm();
            frequencies_hz.push(i as f64 * resolution_hz);
            magnitude.push(mag);
            magnitude_db.push(amplitude_to_db(mag));
            phase_rad.push(bin.arg());
        }

        Ok(Spectrum {
            frequencies_hz,
            magnitude,
            magnitude_db,
            phase_rad,
            resolution_hz,
        })
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

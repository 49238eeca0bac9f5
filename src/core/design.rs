// src/core/design.rs
//
// Turns a measured correction curve (frequency / gain-dB text pairs) into
// a time-domain FIR filter. The curve is resampled onto a uniform grid up
// to Nyquist, converted to a zero-phase magnitude spectrum, brought back
// to the time domain with an inverse real FFT, end-tapered, and scaled to
// the processor's customary peak amplitude.

use std::path::Path;

use log::{debug, info};
use num_complex::Complex;
use realfft::RealFftPlanner;
use serde::Serialize;

use crate::config::DesignConfig;
use crate::core::dsp::interpolation::{interp_onto, linear_grid};
use crate::core::dsp::{self, db_to_amplitude};
use crate::core::filter::FilterData;
use crate::error::FilterError;

/// A measured magnitude response: frequency points with gain values,
/// sorted ascending by frequency
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionCurve {
    pub frequencies_hz: Vec<f64>,
    pub magnitudes_db: Vec<f64>,
}

impl CorrectionCurve {
    pub fn len(&self) -> usize {
        self.frequencies_hz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_hz.is_empty()
    }

    pub fn frequency_range_hz(&self) -> (f64, f64) {
        (
            self.frequencies_hz.first().copied().unwrap_or(0.0),
            self.frequencies_hz.last().copied().unwrap_or(0.0),
        )
    }
}

/// Parse a correction export: one `frequency magnitude_db` pair per line,
/// whitespace separated. Header lines, comments and anything else that
/// does not start with two numbers is skipped, matching how measurement
/// tools pad their exports.
pub fn parse_correction_curve(text: &str) -> Result<CorrectionCurve, FilterError> {
    let mut points: Vec<(f64, f64)> = Vec::new();

    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let (Some(first), Some(second)) = (parts.next(), parts.next()) else {
            continue;
        };
        let (Ok(freq), Ok(mag_db)) = (first.parse::<f64>(), second.parse::<f64>()) else {
            continue;
        };
        if !freq.is_finite() || !mag_db.is_finite() {
            return Err(FilterError::Parse {
                message: format!("non-finite value in correction line {:?}", line.trim()),
            });
        }
        points.push((freq, mag_db));
    }

    if points.len() < 2 {
        return Err(FilterError::Parse {
            message: format!(
                "correction curve needs at least 2 frequency points, found {}",
                points.len()
            ),
        });
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (frequencies_hz, magnitudes_db) = points.into_iter().unzip();
    Ok(CorrectionCurve {
        frequencies_hz,
        magnitudes_db,
    })
}

/// Read and parse a correction file
pub fn load_correction_curve(path: &Path) -> Result<CorrectionCurve, FilterError> {
    let text = std::fs::read_to_string(path)?;
    let curve = parse_correction_curve(&text)?;
    debug!(
        "{}: {} points, {:.1}-{:.1} Hz",
        path.display(),
        curve.len(),
        curve.frequency_range_hz().0,
        curve.frequency_range_hz().1
    );
    Ok(curve)
}

/// A designed filter plus the figures worth reporting about the design
#[derive(Debug, Clone, Serialize)]
pub struct DesignedFilter {
    pub filter: FilterData,
    pub source_points: usize,
    pub min_frequency_hz: f64,
    pub max_frequency_hz: f64,
    /// Samples the impulse response was rotated left by to bring a late
    /// peak to the front (0 when the peak already led)
    pub rotated_by: usize,
    /// Gain applied to hit the target peak (1.0 when normalization is off)
    pub scale_factor: f64,
}

/// Designs FIR filters from correction curves. Holds its FFT planner, so
/// reuse one designer when converting several channels.
pub struct FilterDesigner {
    planner: RealFftPlanner<f64>,
}

impl FilterDesigner {
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }

    pub fn design(
        &mut self,
        curve: &CorrectionCurve,
        taps: usize,
        sample_rate: u32,
        config: &DesignConfig,
    ) -> Result<DesignedFilter, FilterError> {
        if taps == 0 {
            return Err(FilterError::Configuration {
                message: "tap count must be positive".to_string(),
            });
        }
        if sample_rate == 0 {
            return Err(FilterError::Configuration {
                message: "sample rate must be positive".to_string(),
            });
        }
        if curve.len() < 2 {
            return Err(FilterError::InvalidInput {
                message: "correction curve needs at least 2 points".to_string(),
            });
        }

        // Uniform magnitude grid from DC to Nyquist; points outside the
        // measured range clamp to the boundary values
        let bins = taps / 2 + 1;
        let nyquist = sample_rate as f64 / 2.0;
        let grid = linear_grid(0.0, nyquist, bins);
        let gains_db = interp_onto(&curve.frequencies_hz, &curve.magnitudes_db, &grid);

        let mut spectrum: Vec<Complex<f64>> = gains_db
            .iter()
            .map(|&db| Complex::new(db_to_amplitude(db), 0.0))
            .collect();

        let inverse = self.planner.plan_fft_inverse(taps);
        let mut impulse = inverse.make_output_vec();
        inverse
            .process(&mut spectrum, &mut impulse)
            .map_err(|e| FilterError::InvalidInput {
                message: format!("inverse transform failed: {e}"),
            })?;
        let scale = 1.0 / taps as f64;
        for s in &mut impulse {
            *s *= scale;
        }

        // A zero-phase spectrum lands its peak at index 0; if some curve
        // shape pushes it late anyway, rotate it back to keep the filter
        // causal-looking
        let peak_index = index_of_peak(&impulse);
        let rotated_by = if peak_index > taps / 4 { peak_index } else { 0 };
        if rotated_by > 0 {
            impulse.rotate_left(rotated_by);
            info!("impulse peak at {}, rotated to the front", peak_index);
        }

        apply_end_taper(&mut impulse, config.taper_fraction);

        let scale_factor = if config.normalize {
            let peak = dsp::peak_amplitude(&impulse);
            if peak > 0.0 {
                let factor = config.target_peak / peak;
                for s in &mut impulse {
                    *s *= factor;
                }
                factor
            } else {
                1.0
            }
        } else {
            1.0
        };

        let (min_frequency_hz, max_frequency_hz) = curve.frequency_range_hz();
        debug!(
            "designed {} taps from {} points, scale {:.6}",
            taps,
            curve.len(),
            scale_factor
        );

        Ok(DesignedFilter {
            filter: FilterData::new(impulse, sample_rate)?,
            source_points: curve.len(),
            min_frequency_hz,
            max_frequency_hz,
            rotated_by,
            scale_factor,
        })
    }
}

impl Default for FilterDesigner {
    fn default() -> Self {
        Self::new()
    }
}

fn index_of_peak(samples: &[f64]) -> usize {
    samples
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Linear fade from 1 to 0 over the final `fraction` of the filter
fn apply_end_taper(samples: &mut [f64], fraction: f64) {
    let n = samples.len();
    let taper_start = (n as f64 * (1.0 - fraction)) as usize;
    let taper_len = n - taper_start;
    if taper_len < 2 {
        return;
    }

    for (k, s) in samples[taper_start..].iter_mut().enumerate() {
        let t = 1.0 - k as f64 / (taper_len - 1) as f64;
        *s *= t;
    }
}

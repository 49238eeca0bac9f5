// src/core/analysis/spectral.rs
//
// Frequency-domain comparison of a filter before and after length
// adjustment. Both sequences are transformed at their own full resolution,
// aligned onto the finer of the two bin grids, and the magnitude difference
// is summarized overall and per frequency band.

use serde::Serialize;

use crate::config::{standard_bands, FrequencyBand};
use crate::core::dsp::interpolation::interp_onto;
use crate::core::dsp::{self, Spectrum, SpectrumAnalyzer};
use crate::core::filter::FilterData;
use crate::error::FilterError;

/// Magnitude difference summary for one frequency band
#[derive(Debug, Clone, Serialize)]
pub struct BandStats {
    pub band: String,
    pub low_hz: f64,
    pub high_hz: f64,
    /// Comparison bins that fell inside the band; the summary figures are
    /// zero when no bin landed here
    pub bins: usize,
    pub max_abs_db: f64,
    pub mean_abs_db: f64,
    pub rms_db: f64,
}

/// Result of comparing an adjusted filter against its original
#[derive(Debug, Clone, Serialize)]
pub struct SpectralComparison {
    pub original: Spectrum,
    pub adjusted: Spectrum,
    /// Shared comparison grid: the finer of the two bin grids, cut off at
    /// the highest frequency both spectra cover
    pub frequencies_hz: Vec<f64>,
    pub original_db: Vec<f64>,
    pub adjusted_db: Vec<f64>,
    /// Adjusted minus original at every grid point, so a positive value
    /// means the adjusted filter is hotter there
    pub difference_db: Vec<f64>,
    pub band_stats: Vec<BandStats>,
    pub max_difference_db: f64,
    pub mean_difference_db: f64,
    pub rms_difference_db: f64,
}

impl SpectralComparison {
    /// Band with the largest maximum deviation, skipping empty bands
    pub fn worst_band(&self) -> Option<&BandStats> {
        self.band_stats
            .iter()
            .filter(|b| b.bins > 0)
            .max_by(|a, b| a.max_abs_db.total_cmp(&b.max_abs_db))
    }
}

/// Compares filter spectra on an aligned grid. Holds its FFT planner, so
/// reuse one comparator across channels rather than building one per call.
pub struct SpectralComparator {
    bands: Vec<FrequencyBand>,
    analyzer: SpectrumAnalyzer,
}

impl SpectralComparator {
    pub fn new() -> Self {
        Self {
            bands: standard_bands(),
            analyzer: SpectrumAnalyzer::new(),
        }
    }

    pub fn with_bands(bands: Vec<FrequencyBand>) -> Self {
        Self {
            bands,
            analyzer: SpectrumAnalyzer::new(),
        }
    }

    /// Compare two sequences sampled at the same rate. The shorter one is
    /// linearly interpolated onto the longer one's bin grid, because equal
    /// bin indices sit at different frequencies when lengths differ.
    pub fn compare(
        &mut self,
        original: &FilterData,
        adjusted: &FilterData,
    ) -> Result<SpectralComparison, FilterError> {
        if original.sample_rate != adjusted.sample_rate {
            return Err(FilterError::Configuration {
                message: format!(
                    "cannot compare spectra at different sample rates ({} vs {})",
                    original.sample_rate, adjusted.sample_rate
                ),
            });
        }

        let original_spec = self.analyzer.spectrum(&original.samples, original.sample_rate)?;
        let adjusted_spec = self.analyzer.spectrum(&adjusted.samples, adjusted.sample_rate)?;
        if original_spec.is_empty() || adjusted_spec.is_empty() {
            return Err(FilterError::InvalidInput {
                message: "sequence is too short for spectral comparison".to_string(),
            });
        }

        let limit_hz = original_spec
            .max_frequency_hz()
            .min(adjusted_spec.max_frequency_hz());
        let original_finer = original_spec.len() >= adjusted_spec.len();
        let grid_source = if original_finer {
            &original_spec
        } else {
            &adjusted_spec
        };
        let frequencies_hz: Vec<f64> = grid_source
            .frequencies_hz
            .iter()
            .copied()
            .take_while(|&f| f <= limit_hz)
            .collect();

        let native_db = grid_source.magnitude_db[..frequencies_hz.len()].to_vec();
        let (original_db, adjusted_db) = if original_finer {
            let interp = interp_onto(
                &adjusted_spec.frequencies_hz,
                &adjusted_spec.magnitude_db,
                &frequencies_hz,
            );
            (native_db, interp)
        } else {
            let interp = interp_onto(
                &original_spec.frequencies_hz,
                &original_spec.magnitude_db,
                &frequencies_hz,
            );
            (interp, native_db)
        };

        let difference_db: Vec<f64> = adjusted_db
            .iter()
            .zip(&original_db)
            .map(|(a, o)| a - o)
            .collect();

        let band_stats: Vec<BandStats> = self
            .bands
            .iter()
            .map(|band| band_statistics(band, &frequencies_hz, &difference_db))
            .collect();

        let max_difference_db = difference_db.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        let mean_difference_db =
            difference_db.iter().map(|d| d.abs()).sum::<f64>() / difference_db.len() as f64;
        let rms_difference_db = dsp::rms(&difference_db);

        log::debug!(
            "spectral comparison over {} bins: max {:.4} dB, mean {:.4} dB, rms {:.4} dB",
            difference_db.len(),
            max_difference_db,
            mean_difference_db,
            rms_difference_db
        );

        Ok(SpectralComparison {
            original: original_spec,
            adjusted: adjusted_spec,
            frequencies_hz,
            original_db,
            adjusted_db,
            difference_db,
            band_stats,
            max_difference_db,
            mean_difference_db,
            rms_difference_db,
        })
    }
}

impl Default for SpectralComparator {
    fn default() -> Self {
        Self::new()
    }
}

fn band_statistics(
    band: &FrequencyBand,
    frequencies_hz: &[f64],
    difference_db: &[f64],
) -> BandStats {
    let diffs: Vec<f64> = frequencies_hz
        .iter()
        .zip(difference_db)
        .filter(|(f, _)| band.contains(**f))
        .map(|(_, d)| *d)
        .collect();

    if diffs.is_empty() {
        return BandStats {
            band: band.name.clone(),
            low_hz: band.low_hz,
            high_hz: band.high_hz,
            bins: 0,
            max_abs_db: 0.0,
            mean_abs_db: 0.0,
            rms_db: 0.0,
        };
    }

    BandStats {
        band: band.name.clone(),
        low_hz: band.low_hz,
        high_hz: band.high_hz,
        bins: diffs.len(),
        max_abs_db: diffs.iter().fold(0.0_f64, |acc, d| acc.max(d.abs())),
        mean_abs_db: diffs.iter().map(|d| d.abs()).sum::<f64>() / diffs.len() as f64,
        rms_db: dsp::rms(&diffs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn filter(samples: Vec<f64>) -> FilterData {
        FilterData::new(samples, 48000).unwrap()
    }

    #[test]
    fn test_identical_filters_show_no_difference() {
        let samples: Vec<f64> = (0..1024).map(|i| (i as f64 * 0.13).sin() * 0.4).collect();
        let mut comparator = SpectralComparator::new();

        let comparison = comparator
            .compare(&filter(samples.clone()), &filter(samples))
            .unwrap();

        assert!(comparison.max_difference_db < 1e-9);
        assert!(comparison.rms_difference_db < 1e-9);
        for band in &comparison.band_stats {
            assert!(band.max_abs_db < 1e-9);
        }
    }

    #[test]
    fn test_discarded_tail_energy_is_visible() {
        // An impulse with a late sinusoidal burst. Cutting the burst off
        // must show up as a nonzero magnitude difference, never as silence.
        let n = 8192;
        let cut = 4096;
        let mut samples = vec![0.0; n];
        samples[0] = 1.0;
        for (i, s) in samples.iter_mut().enumerate().skip(6000).take(1000) {
            *s += 0.01 * (2.0 * PI * 0.17 * i as f64).sin();
        }

        let truncated: Vec<f64> = samples[..cut].to_vec();
        let mut comparator = SpectralComparator::new();
        let comparison = comparator
            .compare(&filter(samples), &filter(truncated))
            .unwrap();

        assert!(comparison.max_difference_db > 0.0);
        assert!(comparison.rms_difference_db > 0.0);
    }

    #[test]
    fn test_uniform_gain_change_reads_in_decibels() {
        let samples: Vec<f64> = (0..2048).map(|i| (i as f64 * 0.71).sin() * 0.3).collect();
        let halved: Vec<f64> = samples.iter().map(|s| s * 0.5).collect();

        let mut comparator = SpectralComparator::new();
        let comparison = comparator
            .compare(&filter(samples), &filter(halved))
            .unwrap();

        // Halving every coefficient lowers every bin by the same ~6.02 dB
        let expected = 20.0 * 0.5_f64.log10();
        for &d in &comparison.difference_db {
            assert!((d - expected).abs() < 1e-6);
        }
        assert!((comparison.max_difference_db - expected.abs()).abs() < 1e-6);
    }

    #[test]
    fn test_comparison_grid_comes_from_longer_sequence() {
        let long: Vec<f64> = (0..1024).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let short: Vec<f64> = (0..256).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();

        let mut comparator = SpectralComparator::new();
        let comparison = comparator.compare(&filter(long), &filter(short)).unwrap();

        let fine_resolution = 48000.0 / 1024.0;
        assert!((comparison.frequencies_hz[1] - fine_resolution).abs() < 1e-9);
        let coarse_max = comparison.adjusted.max_frequency_hz();
        for &f in &comparison.frequencies_hz {
            assert!(f <= coarse_max);
        }
    }

    #[test]
    fn test_band_report_covers_standard_bands() {
        let samples: Vec<f64> = (0..4096).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let mut comparator = SpectralComparator::new();

        let comparison = comparator
            .compare(&filter(samples.clone()), &filter(samples))
            .unwrap();

        assert_eq!(comparison.band_stats.len(), 7);
        assert_eq!(comparison.band_stats[0].band, "Sub-bass");
        assert_eq!(comparison.band_stats[6].band, "Very high");
        for band in &comparison.band_stats {
            assert!(band.bins > 0, "band {} collected no bins", band.band);
        }
    }

    #[test]
    fn test_band_outside_grid_reports_zeros() {
        let samples: Vec<f64> = (0..512).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
        let ultrasonic = FrequencyBand::new("Ultrasonic", 30_000.0, 40_000.0);
        let mut comparator = SpectralComparator::with_bands(vec![ultrasonic]);

        let comparison = comparator
            .compare(&filter(samples.clone()), &filter(samples))
            .unwrap();

        let band = &comparison.band_stats[0];
        assert_eq!(band.bins, 0);
        assert_eq!(band.max_abs_db, 0.0);
        assert_eq!(band.mean_abs_db, 0.0);
        assert_eq!(band.rms_db, 0.0);
    }

    #[test]
    fn test_rejects_sample_rate_mismatch() {
        let a = FilterData::new(vec![1.0, 0.0, 0.0, 0.0], 48000).unwrap();
        let b = FilterData::new(vec![1.0, 0.0, 0.0, 0.0], 44100).unwrap();

        let mut comparator = SpectralComparator::new();
        let result = comparator.compare(&a, &b);
        assert!(matches!(result, Err(FilterError::Configuration { .. })));
    }
}

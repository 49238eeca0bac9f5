// tests/spectral_comparison_test.rs
//
// Frequency-domain verification at realistic calibration sizes. The key
// regression here is the discarded-tail case: content that only lives past
// the cut point must show up as a nonzero spectral difference.

use std::f64::consts::PI;

use firfit::core::analysis::SpectralComparator;
use firfit::{FilterData, FilterError, SafetyConfig};

/// Impulse plus a Gaussian-windowed 3 kHz burst centered at `burst_at`
fn impulse_with_late_burst(len: usize, burst_at: usize, amplitude: f64) -> Vec<f64> {
    let mut samples = vec![0.0; len];
    samples[0] = 1.0;
    for (i, sample) in samples.iter_mut().enumerate() {
        let t = (i as f64 - burst_at as f64) / 1500.0;
        let window = (-t * t).exp();
        if window > 1e-12 {
            *sample += amplitude * window * (2.0 * PI * 3000.0 * i as f64 / 48000.0).sin();
        }
    }
    samples
}

#[test]
fn discarded_tail_registers_as_nonzero_difference() {
    let samples = impulse_with_late_burst(32768, 20000, 0.01);
    let original = FilterData::new(samples, 48000).unwrap();
    let adjusted = firfit::adjust_length(&original, 16321, true, &SafetyConfig::default()).unwrap();

    let mut comparator = SpectralComparator::new();
    let comparison = comparator.compare(&original, &adjusted).unwrap();

    assert!(
        comparison.max_difference_db > 0.0,
        "a tail-only burst must not compare as spectrally identical"
    );
    assert!(comparison.rms_difference_db > 0.0);

    // The burst sits at 3 kHz, so the largest deviation lands in High-mid
    let worst = comparison.worst_band().unwrap();
    assert_eq!(worst.band, "High-mid");
    assert!(worst.max_abs_db > 1.0);
}

#[test]
fn identical_filters_compare_flat_at_full_size() {
    let samples: Vec<f64> = (0..16321)
        .map(|i| if i == 0 { 1.0 } else { 0.001 * (-(i as f64) / 800.0).exp() })
        .collect();
    let filter = FilterData::new(samples, 48000).unwrap();

    let mut comparator = SpectralComparator::new();
    let comparison = comparator.compare(&filter, &filter).unwrap();

    assert!(comparison.max_difference_db < 1e-9);
    for band in &comparison.band_stats {
        assert!(band.max_abs_db < 1e-9);
    }
}

#[test]
fn safe_truncation_leaves_only_small_differences() {
    let samples: Vec<f64> = (0..32768)
        .map(|i| if i == 0 { 1.0 } else { 0.05 * (-(i as f64) / 300.0).exp() })
        .collect();
    let original = FilterData::new(samples, 48000).unwrap();
    let adjusted = firfit::adjust_length(&original, 16321, false, &SafetyConfig::default()).unwrap();

    let mut comparator = SpectralComparator::new();
    let comparison = comparator.compare(&original, &adjusted).unwrap();

    // The tail past 16321 samples decayed through dozens of time constants,
    // so the response must be essentially unchanged. The bound leaves room
    // for interpolation between the two grid resolutions.
    assert!(comparison.max_difference_db < 0.5);
}

#[test]
fn every_standard_band_is_populated_at_calibration_size() {
    let mut samples = vec![0.0; 16321];
    samples[0] = 1.0;
    let original = FilterData::new(samples.clone(), 48000).unwrap();
    samples[0] = 0.9;
    let adjusted = FilterData::new(samples, 48000).unwrap();

    let mut comparator = SpectralComparator::new();
    let comparison = comparator.compare(&original, &adjusted).unwrap();

    assert_eq!(comparison.band_stats.len(), 7);
    for band in &comparison.band_stats {
        assert!(band.bins > 0, "band {} is empty at 16321 taps", band.band);
    }
}

#[test]
fn mismatched_sample_rates_are_rejected() {
    let a = FilterData::new(vec![1.0, 0.2, 0.1, 0.0], 48000).unwrap();
    let b = FilterData::new(vec![1.0, 0.2, 0.1, 0.0], 44100).unwrap();

    let mut comparator = SpectralComparator::new();
    assert!(matches!(
        comparator.compare(&a, &b),
        Err(FilterError::Configuration { .. })
    ));
}

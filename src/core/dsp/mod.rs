//! Digital signal processing primitives shared by the analysis components

pub mod fft;
pub mod interpolation;
pub mod roots;

pub use fft::{Spectrum, SpectrumAnalyzer};

/// Convert amplitude to dB (relative to 1.0)
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude > 1e-12 {
        20.0 * amplitude.log10()
    } else {
        -240.0
    }
}

/// Convert dB to amplitude
pub fn db_to_amplitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Compute RMS (Root Mean Square)
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Compute peak amplitude
pub fn peak_amplitude(samples: &[f64]) -> f64 {
    samples.iter().map(|s| s.abs()).fold(0.0f64, f64::max)
}

/// Arithmetic mean
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Span of samples whose magnitude clears a peak-relative dB floor.
/// Returns None for a silent sequence.
pub fn active_region(samples: &[f64], relative_db: f64) -> Option<(usize, usize)> {
    let peak = peak_amplitude(samples);
    if peak <= 0.0 {
        return None;
    }

    let threshold = peak * db_to_amplitude(relative_db);
    let start = samples.iter().position(|s| s.abs() >= threshold)?;
    let end = samples.iter().rposition(|s| s.abs() >= threshold)?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms() {
        let samples = vec![1.0, -1.0, 1.0, -1.0];
        assert!((rms(&samples) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_db_round_trip() {
        let amp = 0.25;
        let db = amplitude_to_db(amp);
        assert!((db_to_amplitude(db) - amp).abs() < 1e-12);
    }

    #[test]
    fn test_db_floor_on_silence() {
        assert_eq!(amplitude_to_db(0.0), -240.0);
    }

    #[test]
    fn test_peak_amplitude_uses_magnitude() {
        let samples = vec![0.1, -0.8, 0.3];
        assert!((peak_amplitude(&samples) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_active_region_spans_significant_samples() {
        let mut samples = vec![0.0; 100];
        samples[10] = 1.0;
        samples[60] = 1e-4;
        samples[80] = 1e-9;

        // -100 dB floor keeps the 1e-4 sample, drops the 1e-9 one
        let (start, end) = active_region(&samples, -100.0).unwrap();
        assert_eq!(start, 10);
        assert_eq!(end, 60);
    }

    #[test]
    fn test_active_region_of_silence_is_none() {
        assert!(active_region(&[0.0; 32], -120.0).is_none());
    }
}

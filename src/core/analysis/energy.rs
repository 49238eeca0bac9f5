// src/core/analysis/energy.rs
//
// Cumulative energy distribution over a time-domain sequence. The
// truncation gate reads its loss figure directly off this profile; reports
// use the milestone lookup to show where the energy actually lives.

use crate::core::filter::ensure_finite;
use crate::error::FilterError;

/// Normalized cumulative energy of a sample sequence.
///
/// `cumulative[i]` holds the fraction of total energy contained in samples
/// `0..=i`; the array is non-decreasing and ends at 1.0 whenever the
/// sequence carries any energy at all. A silent sequence sets the
/// degenerate flag instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct EnergyProfile {
    cumulative: Vec<f64>,
    total_energy: f64,
    degenerate: bool,
}

impl EnergyProfile {
    pub fn new(samples: &[f64]) -> Result<Self, FilterError> {
        ensure_finite(samples, "energy profile input")?;

        let mut cumulative = Vec::with_capacity(samples.len());
        let mut running = 0.0f64;
        for &s in samples {
            running += s * s;
            cumulative.push(running);
        }

        let total_energy = running;
        let degenerate = total_energy <= 0.0;
        if degenerate {
            cumulative.iter_mut().for_each(|c| *c = 0.0);
        } else {
            cumulative.iter_mut().for_each(|c| *c /= total_energy);
        }

        Ok(Self {
            cumulative,
            total_energy,
            degenerate,
        })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// True when the sequence carried no energy at all
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Raw (unnormalized) total energy
    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }

    /// Energy fraction contained in samples `0..=index` (clamped to the
    /// final sample)
    pub fn fraction_at(&self, index: usize) -> f64 {
        self.cumulative[index.min(self.cumulative.len() - 1)]
    }

    /// First sample index at which the cumulative fraction reaches
    /// `fraction`. Binary search over the monotonic array; a degenerate
    /// profile resolves every fraction to index 0.
    pub fn sample_at_fraction(&self, fraction: f64) -> usize {
        if self.degenerate {
            return 0;
        }
        let idx = self.cumulative.partition_point(|&c| c < fraction);
        idx.min(self.cumulative.len() - 1)
    }

    /// Milestone sweep used by the statistics report
    pub fn milestones(&self, fractions: &[f64]) -> Vec<(f64, usize)> {
        fractions
            .iter()
            .map(|&f| (f, self.sample_at_fraction(f)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cumulative_is_monotonic_and_ends_at_one() {
        let samples: Vec<f64> = (0..500).map(|i| ((i as f64) * 0.11).sin()).collect();
        let profile = EnergyProfile::new(&samples).unwrap();

        assert!(!profile.is_degenerate());
        let mut prev = 0.0;
        for i in 0..profile.len() {
            let c = profile.fraction_at(i);
            assert!(c >= prev);
            prev = c;
        }
        assert!((profile.fraction_at(profile.len() - 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_impulse_concentrates_at_zero() {
        let mut samples = vec![0.0; 1024];
        samples[0] = 1.0;
        let profile = EnergyProfile::new(&samples).unwrap();

        assert!((profile.fraction_at(0) - 1.0).abs() < 1e-12);
        assert_eq!(profile.sample_at_fraction(0.999), 0);
    }

    #[test]
    fn test_uniform_sequence_fraction_lookup() {
        let profile = EnergyProfile::new(&[1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(profile.sample_at_fraction(0.5), 1);
        assert_eq!(profile.sample_at_fraction(0.51), 2);
        assert_eq!(profile.sample_at_fraction(1.0), 3);
    }

    #[test]
    fn test_silent_sequence_is_degenerate() {
        let profile = EnergyProfile::new(&[0.0; 256]).unwrap();
        assert!(profile.is_degenerate());
        assert_eq!(profile.sample_at_fraction(0.5), 0);
        assert_eq!(profile.fraction_at(200), 0.0);
        assert_eq!(profile.total_energy(), 0.0);
    }

    #[test]
    fn test_milestones_are_non_decreasing() {
        let samples: Vec<f64> = (0..2000).map(|i| (-(i as f64) / 300.0).exp()).collect();
        let profile = EnergyProfile::new(&samples).unwrap();

        let milestones = profile.milestones(&[0.5, 0.9, 0.95, 0.99, 0.999]);
        for pair in milestones.windows(2) {
            assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(EnergyProfile::new(&[]).is_err());
        assert!(EnergyProfile::new(&[0.5, f64::NAN]).is_err());
    }
}

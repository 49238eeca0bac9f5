// src/config/thresholds.rs
//
// Threshold configuration for the safety gate, the minimum-phase tests, and
// the magnitude-to-impulse designer. Everything is an explicit parameter; no
// module-level constants leak into the analysis code.

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Thresholds for the truncation safety evaluator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Energy-loss fraction above which truncation is blocked (0.01 = 1%)
    pub energy_loss_threshold: f64,
    /// Energy-loss fraction above which the risk is catastrophic
    pub catastrophic_threshold: f64,
    /// Level below peak, in dB, separating the active region from the
    /// numerical tail. Tuned against 48 kHz room-correction exports; not
    /// validated for other filter families.
    pub active_region_db: f64,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            energy_loss_threshold: 0.01,
            catastrophic_threshold: 0.10,
            active_region_db: -120.0,
        }
    }
}

impl SafetyConfig {
    pub fn validate(&self) -> Result<(), FilterError> {
        if !(self.energy_loss_threshold > 0.0 && self.energy_loss_threshold <= 1.0) {
            return Err(FilterError::Configuration {
                message: format!(
                    "energy loss threshold must be in (0, 1], got {}",
                    self.energy_loss_threshold
                ),
            });
        }
        if !(self.catastrophic_threshold > self.energy_loss_threshold
            && self.catastrophic_threshold <= 1.0)
        {
            return Err(FilterError::Configuration {
                message: format!(
                    "catastrophic threshold must be in ({}, 1], got {}",
                    self.energy_loss_threshold, self.catastrophic_threshold
                ),
            });
        }
        if !(self.active_region_db < 0.0) {
            return Err(FilterError::Configuration {
                message: format!(
                    "active region threshold must be negative dB relative to peak, got {}",
                    self.active_region_db
                ),
            });
        }
        Ok(())
    }
}

/// Thresholds for the four minimum-phase sub-tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseConfig {
    /// Leading window, in samples, for the energy concentration test
    pub energy_window: usize,
    /// Energy fraction inside the window implying minimum phase
    pub energy_min_phase_fraction: f64,
    /// Energy fraction upgrading the energy test to high confidence
    pub energy_high_confidence: f64,
    /// Mean group delay, as a ratio of the linear-phase expectation (N-1)/2,
    /// below which the response reads as minimum phase
    pub group_delay_ratio: f64,
    /// Ratio below which the group delay test is high confidence
    pub group_delay_high_confidence: f64,
    /// Peak-relative tolerance for the time-domain symmetry test
    pub symmetry_tolerance: f64,
    /// Maximum polynomial degree for the zero-location test. Root finding
    /// beyond a few thousand taps is numerically unreliable, so longer
    /// filters are analyzed on this prefix only.
    pub zero_test_max_taps: usize,
    /// Root magnitude above which a zero counts as outside the unit circle
    pub root_tolerance: f64,
    /// Energy fraction the zero-test prefix must hold for the sub-test to
    /// keep its definitive status on truncated input
    pub prefix_energy_floor: f64,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            energy_window: 1000,
            energy_min_phase_fraction: 0.95,
            energy_high_confidence: 0.99,
            group_delay_ratio: 0.01,
            group_delay_high_confidence: 0.001,
            symmetry_tolerance: 1e-3,
            zero_test_max_taps: 4096,
            root_tolerance: 1.001,
            prefix_energy_floor: 0.999,
        }
    }
}

/// Shaping parameters for the magnitude-to-impulse designer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignConfig {
    /// Fraction of the tail faded to zero with a linear taper
    pub taper_fraction: f64,
    /// Peak amplitude the designed impulse is scaled to
    pub target_peak: f64,
    /// Disable to keep the raw inverse-FFT amplitude
    pub normalize: bool,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            taper_fraction: 0.05,
            target_peak: 0.72,
            normalize: true,
        }
    }
}

// src/core/analysis/stats.rs
//
// Descriptive statistics for a loaded filter, backing the preview and
// analyze reports.

use serde::Serialize;

use crate::core::analysis::energy::EnergyProfile;
use crate::core::dsp::{active_region, mean, peak_amplitude, rms};
use crate::core::filter::FilterData;
use crate::error::FilterError;

/// Energy milestone fractions shown by the analyze report
pub const ENERGY_MILESTONES: [f64; 5] = [0.5, 0.9, 0.95, 0.99, 0.999];

/// Shape summary of one filter
#[derive(Debug, Clone, Serialize)]
pub struct FilterStats {
    pub length: usize,
    pub sample_rate: u32,
    pub duration_ms: f64,
    pub peak: f64,
    pub rms: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Run of exact zeros at the head; an all-zero filter counts every
    /// sample here and none as trailing
    pub leading_zeros: usize,
    pub trailing_zeros: usize,
    /// First and last sample above the peak-relative floor, None for silence
    pub active_start: Option<usize>,
    pub active_end: Option<usize>,
    /// (fraction, first sample index reaching it)
    pub energy_milestones: Vec<(f64, usize)>,
    pub degenerate_energy: bool,
}

impl FilterStats {
    pub fn from_filter(filter: &FilterData, active_region_db: f64) -> Result<Self, FilterError> {
        let samples = &filter.samples;
        let profile = EnergyProfile::new(samples)?;
        let region = active_region(samples, active_region_db);

        let leading_zeros = samples.iter().take_while(|&&s| s == 0.0).count();
        let trailing_zeros = if leading_zeros == samples.len() {
            0
        } else {
            samples.iter().rev().take_while(|&&s| s == 0.0).count()
        };

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            length: samples.len(),
            sample_rate: filter.sample_rate,
            duration_ms: filter.duration_secs() * 1000.0,
            peak: peak_amplitude(samples),
            rms: rms(samples),
            mean: mean(samples),
            min,
            max,
            leading_zeros,
            trailing_zeros,
            active_start: region.map(|(start, _)| start),
            active_end: region.map(|(_, end)| end),
            energy_milestones: profile.milestones(&ENERGY_MILESTONES),
            degenerate_energy: profile.is_degenerate(),
        })
    }
}

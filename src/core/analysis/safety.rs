// src/core/analysis/safety.rs
//
// Truncation safety evaluation and the gated length adjuster. Risk is
// classified energy-first: the active-region heuristic can only soften a
// verdict to MOSTLY_SAFE, never block on its own, because a long decaying
// numerical tail may carry negligible energy.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SafetyConfig;
use crate::core::analysis::energy::EnergyProfile;
use crate::core::dsp::active_region;
use crate::core::filter::{ensure_finite, FilterData};
use crate::error::FilterError;

/// Risk classification for shortening a filter to a target tap count
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Negligible energy loss, active region inside the cut
    Safe,
    /// Negligible energy loss but the active region nominally extends past
    /// the cut point; flagged for visibility, not blocking
    MostlySafe,
    /// Measurable energy loss (above the configured threshold, up to the
    /// catastrophic bound); blocked without an override
    ModerateRisk,
    /// Energy loss above the catastrophic bound; blocked without an override
    Catastrophic,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::MostlySafe => "MOSTLY_SAFE",
            Self::ModerateRisk => "MODERATE_RISK",
            Self::Catastrophic => "CATASTROPHIC",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Safe => "✓",
            Self::MostlySafe => "~",
            Self::ModerateRisk => "!",
            Self::Catastrophic => "✗",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Safe => "truncation discards silence only",
            Self::MostlySafe => "tail past the cut is negligible-energy noise",
            Self::ModerateRisk => "truncation discards audible filter energy",
            Self::Catastrophic => "truncation destroys the correction response",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::ModerateRisk | Self::Catastrophic)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Full safety evaluation record for one proposed truncation
#[derive(Debug, Clone, Serialize)]
pub struct TruncationVerdict {
    pub risk_level: RiskLevel,
    /// Fraction of total energy beyond the retained prefix, in [0, 1]
    pub energy_loss_fraction: f64,
    /// Last sample index whose magnitude clears the peak-relative floor
    pub active_region_end_index: usize,
    /// True when the truncation is refused (risk blocking and no override)
    pub blocked: bool,
    pub original_length: usize,
    pub target_length: usize,
    /// Energy fraction retained by the first `target_length` samples
    pub energy_at_target: f64,
    /// Set for an all-zero sequence, where loss is defined as 0
    pub degenerate_energy: bool,
}

/// Evaluate whether cutting `samples` down to `target_length` taps is
/// acoustically safe.
///
/// The verdict is a pure function of the input, the target and the
/// thresholds. `override_requested` only affects the `blocked` flag, never
/// the risk classification itself.
pub fn evaluate_truncation(
    samples: &[f64],
    target_length: usize,
    override_requested: bool,
    config: &SafetyConfig,
) -> Result<TruncationVerdict, FilterError> {
    config.validate()?;
    ensure_finite(samples, "truncation safety input")?;

    if target_length == 0 {
        return Err(FilterError::Configuration {
            message: "target length must be at least 1 tap".to_string(),
        });
    }
    if target_length > samples.len() {
        return Err(FilterError::Configuration {
            message: format!(
                "target length {} exceeds filter length {}; lengthening is padding, not truncation",
                target_length,
                samples.len()
            ),
        });
    }

    let profile = EnergyProfile::new(samples)?;
    let energy_at_target = profile.fraction_at(target_length - 1);
    let energy_loss_fraction = if profile.is_degenerate() {
        0.0
    } else {
        (1.0 - energy_at_target).max(0.0)
    };

    let active_region_end_index = active_region(samples, config.active_region_db)
        .map(|(_, end)| end)
        .unwrap_or(0);

    let risk_level = if energy_loss_fraction > config.catastrophic_threshold {
        RiskLevel::Catastrophic
    } else if energy_loss_fraction > config.energy_loss_threshold {
        RiskLevel::ModerateRisk
    } else if active_region_end_index > target_length {
        RiskLevel::MostlySafe
    } else {
        RiskLevel::Safe
    };

    let blocked = risk_level.is_blocking() && !override_requested;

    debug!(
        "truncation check: {} -> {} taps, loss {:.6}%, active end {}, {}",
        samples.len(),
        target_length,
        energy_loss_fraction * 100.0,
        active_region_end_index,
        risk_level
    );

    Ok(TruncationVerdict {
        risk_level,
        energy_loss_fraction,
        active_region_end_index,
        blocked,
        original_length: samples.len(),
        target_length,
        energy_at_target,
        degenerate_energy: profile.is_degenerate(),
    })
}

/// Cut or zero-pad a filter to `target_length` taps.
///
/// Truncation runs through the safety evaluator and fails with
/// `UnsafeTruncation` when blocked; `force` is the only way past a blocking
/// verdict. The retained prefix is copied bit-exactly. Padding appends
/// zeros and needs no gate since it discards nothing.
pub fn adjust_length(
    filter: &FilterData,
    target_length: usize,
    force: bool,
    config: &SafetyConfig,
) -> Result<FilterData, FilterError> {
    if target_length == 0 {
        return Err(FilterError::Configuration {
            message: "target length must be at least 1 tap".to_string(),
        });
    }

    let current = filter.len();

    if target_length == current {
        debug!("filter already at {} taps, passing through unchanged", current);
        return Ok(filter.clone());
    }

    if target_length > current {
        info!(
            "padding filter from {} to {} taps with {} zeros",
            current,
            target_length,
            target_length - current
        );
        let mut samples = filter.samples.clone();
        samples.resize(target_length, 0.0);
        return FilterData::new(samples, filter.sample_rate);
    }

    let verdict = evaluate_truncation(&filter.samples, target_length, force, config)?;
    if verdict.blocked {
        return Err(FilterError::UnsafeTruncation { verdict });
    }

    if verdict.risk_level == RiskLevel::MostlySafe {
        warn!(
            "active region ends at sample {} beyond the {}-tap cut; discarded energy {:.6}% is negligible",
            verdict.active_region_end_index,
            target_length,
            verdict.energy_loss_fraction * 100.0
        );
    }
    if force && verdict.risk_level.is_blocking() {
        warn!(
            "override in effect: truncating {} -> {} taps despite {} ({:.2}% energy loss)",
            current,
            target_length,
            verdict.risk_level,
            verdict.energy_loss_fraction * 100.0
        );
    }

    FilterData::new(filter.samples[..target_length].to_vec(), filter.sample_rate)
}

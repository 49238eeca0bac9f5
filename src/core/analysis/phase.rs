// src/core/analysis/phase.rs
//
// Minimum-phase classification through four independent tests: energy
// concentration, group delay, time-domain symmetry and transfer-function
// zero location. The zero test is the only mathematically definitive one;
// the others are cheap corroborating heuristics, so the aggregate verdict
// lets a definitive zero result override everything else.

use num_complex::Complex64;
use serde::Serialize;

use crate::config::PhaseConfig;
use crate::core::analysis::energy::EnergyProfile;
use crate::core::dsp::roots::find_roots;
use crate::core::dsp::{self, SpectrumAnalyzer};
use crate::core::filter::ensure_finite;
use crate::error::FilterError;

/// Bins whose frequency response magnitude falls below this are skipped
/// when averaging group delay, since the quotient there is dominated by
/// rounding noise.
const GROUP_DELAY_SINGULAR_FLOOR: f64 = 1e-12;

/// Energy milestones reported alongside the energy concentration test
const ENERGY_CHECKPOINTS: [usize; 4] = [10, 100, 1000, 10000];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseClassification {
    MinPhase,
    NotMinPhase,
    Inconclusive,
}

impl PhaseClassification {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseClassification::MinPhase => "MIN_PHASE",
            PhaseClassification::NotMinPhase => "NOT_MIN_PHASE",
            PhaseClassification::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl std::fmt::Display for PhaseClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseConfidence {
    Low,
    Medium,
    High,
    Definitive,
}

impl PhaseConfidence {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseConfidence::Low => "LOW",
            PhaseConfidence::Medium => "MEDIUM",
            PhaseConfidence::High => "HIGH",
            PhaseConfidence::Definitive => "DEFINITIVE",
        }
    }
}

impl std::fmt::Display for PhaseConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of one sub-test
#[derive(Debug, Clone, Serialize)]
pub struct PhaseTestResult {
    pub classification: PhaseClassification,
    pub confidence: PhaseConfidence,
    /// The figure the test turned on: energy fraction, delay ratio,
    /// relative half-difference or largest zero magnitude
    pub raw_metric: f64,
    pub detail: String,
}

impl PhaseTestResult {
    fn inconclusive(raw_metric: f64, detail: impl Into<String>) -> Self {
        Self {
            classification: PhaseClassification::Inconclusive,
            confidence: PhaseConfidence::Low,
            raw_metric,
            detail: detail.into(),
        }
    }
}

/// Combined verdict of all four tests
#[derive(Debug, Clone, Serialize)]
pub struct MinimumPhaseVerdict {
    pub classification: PhaseClassification,
    pub energy_test: PhaseTestResult,
    pub group_delay_test: PhaseTestResult,
    pub symmetry_test: PhaseTestResult,
    pub zero_location_test: PhaseTestResult,
}

impl MinimumPhaseVerdict {
    pub fn is_minimum_phase(&self) -> bool {
        self.classification == PhaseClassification::MinPhase
    }

    pub fn tests(&self) -> [(&'static str, &PhaseTestResult); 4] {
        [
            ("Energy concentration", &self.energy_test),
            ("Group delay", &self.group_delay_test),
            ("Symmetry", &self.symmetry_test),
            ("Zero location", &self.zero_location_test),
        ]
    }
}

/// Run all four tests and aggregate them
pub fn classify_minimum_phase(
    samples: &[f64],
    config: &PhaseConfig,
) -> Result<MinimumPhaseVerdict, FilterError> {
    ensure_finite(samples, "filter")?;

    if dsp::peak_amplitude(samples) == 0.0 {
        let blank = || PhaseTestResult::inconclusive(0.0, "sequence carries no energy");
        return Ok(MinimumPhaseVerdict {
            classification: PhaseClassification::Inconclusive,
            energy_test: blank(),
            group_delay_test: blank(),
            symmetry_test: blank(),
            zero_location_test: blank(),
        });
    }

    let profile = EnergyProfile::new(samples)?;
    let energy_test = test_energy_concentration(&profile, samples.len(), config);
    let group_delay_test = test_group_delay(samples, config);
    let symmetry_test = test_symmetry(samples, config);
    let zero_location_test = test_zero_locations(samples, &profile, config);

    let classification = aggregate(
        &energy_test,
        &group_delay_test,
        &symmetry_test,
        &zero_location_test,
    );

    log::debug!(
        "minimum-phase verdict {}: energy {} / gd {} / symmetry {} / zeros {} ({})",
        classification,
        energy_test.classification,
        group_delay_test.classification,
        symmetry_test.classification,
        zero_location_test.classification,
        zero_location_test.confidence,
    );

    Ok(MinimumPhaseVerdict {
        classification,
        energy_test,
        group_delay_test,
        symmetry_test,
        zero_location_test,
    })
}

/// A definitive zero-location verdict overrides everything. Without one,
/// at least three tests must agree, otherwise the verdict is inconclusive.
fn aggregate(
    energy: &PhaseTestResult,
    group_delay: &PhaseTestResult,
    symmetry: &PhaseTestResult,
    zeros: &PhaseTestResult,
) -> PhaseClassification {
    if zeros.confidence == PhaseConfidence::Definitive
        && zeros.classification != PhaseClassification::Inconclusive
    {
        return zeros.classification;
    }

    let results = [energy, group_delay, symmetry, zeros];
    let votes_for = |c: PhaseClassification| {
        results.iter().filter(|t| t.classification == c).count()
    };

    if votes_for(PhaseClassification::MinPhase) >= 3 {
        PhaseClassification::MinPhase
    } else if votes_for(PhaseClassification::NotMinPhase) >= 3 {
        PhaseClassification::NotMinPhase
    } else {
        PhaseClassification::Inconclusive
    }
}

/// Minimum-phase filters concentrate energy at the start of the impulse
/// response. The test is uninformative when the whole sequence fits inside
/// the window, so short inputs come back inconclusive.
fn test_energy_concentration(
    profile: &EnergyProfile,
    length: usize,
    config: &PhaseConfig,
) -> PhaseTestResult {
    if length <= config.energy_window {
        return PhaseTestResult::inconclusive(
            1.0,
            format!(
                "sequence of {} taps fits inside the {}-sample window",
                length, config.energy_window
            ),
        );
    }

    let fraction = profile.fraction_at(config.energy_window - 1);
    let checkpoints: Vec<String> = ENERGY_CHECKPOINTS
        .iter()
        .filter(|&&n| n < length)
        .map(|&n| format!("{:.3}% in first {}", profile.fraction_at(n - 1) * 100.0, n))
        .collect();

    let classification = if fraction > config.energy_min_phase_fraction {
        PhaseClassification::MinPhase
    } else {
        PhaseClassification::NotMinPhase
    };
    let confidence = if fraction > config.energy_high_confidence {
        PhaseConfidence::High
    } else {
        PhaseConfidence::Medium
    };

    PhaseTestResult {
        classification,
        confidence,
        raw_metric: fraction,
        detail: checkpoints.join(", "),
    }
}

/// Mean group delay against the linear-phase expectation of (N-1)/2
/// samples. The delay is evaluated as Re(DFT(n*h) / DFT(h)) over the
/// positive-frequency bins.
fn test_group_delay(samples: &[f64], config: &PhaseConfig) -> PhaseTestResult {
    let n = samples.len();
    if n < 2 {
        return PhaseTestResult::inconclusive(0.0, "sequence too short for group delay");
    }

    let mut analyzer = SpectrumAnalyzer::new();
    let ramped: Vec<f64> = samples.iter().enumerate().map(|(i, &s)| i as f64 * s).collect();
    let (response, ramped_response) = match (analyzer.forward(samples), analyzer.forward(&ramped)) {
        (Ok(a), Ok(b)) => (a, b),
        _ => return PhaseTestResult::inconclusive(0.0, "transform failed"),
    };

    let positive = n / 2;
    let delays: Vec<f64> = response
        .iter()
        .zip(&ramped_response)
        .take(positive)
        .filter(|(h, _)| h.norm() > GROUP_DELAY_SINGULAR_FLOOR)
        .map(|(h, hd): (&Complex64, &Complex64)| (hd / h).re)
        .collect();

    if delays.is_empty() {
        return PhaseTestResult::inconclusive(0.0, "all frequency bins near-singular");
    }

    let mean_delay = dsp::mean(&delays);
    let linear_phase_delay = (n - 1) as f64 / 2.0;
    let ratio = mean_delay.abs() / linear_phase_delay;

    let classification = if ratio < config.group_delay_ratio {
        PhaseClassification::MinPhase
    } else {
        PhaseClassification::NotMinPhase
    };
    let confidence = if ratio < config.group_delay_high_confidence {
        PhaseConfidence::High
    } else {
        PhaseConfidence::Medium
    };

    PhaseTestResult {
        classification,
        confidence,
        raw_metric: ratio,
        detail: format!(
            "mean delay {:.1} samples, linear phase would be {:.1}",
            mean_delay, linear_phase_delay
        ),
    }
}

/// Linear-phase filters are symmetric (or anti-symmetric) around their
/// midpoint; minimum-phase filters are not. The tolerance is relative to
/// the peak so a quiet filter does not read as asymmetric by default.
fn test_symmetry(samples: &[f64], config: &PhaseConfig) -> PhaseTestResult {
    let mid = samples.len() / 2;
    if mid == 0 {
        return PhaseTestResult::inconclusive(0.0, "sequence too short for symmetry");
    }

    let peak = dsp::peak_amplitude(samples);
    let max_diff = samples[..mid]
        .iter()
        .zip(samples[samples.len() - mid..].iter().rev())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    let relative = max_diff / peak;

    let symmetric = relative < config.symmetry_tolerance;
    PhaseTestResult {
        classification: if symmetric {
            PhaseClassification::NotMinPhase
        } else {
            PhaseClassification::MinPhase
        },
        confidence: PhaseConfidence::High,
        raw_metric: relative,
        detail: format!(
            "max half difference {:.2e} against peak {:.2e}",
            max_diff, peak
        ),
    }
}

/// A filter is minimum phase iff every zero of its transfer function lies
/// inside or on the unit circle. Root-finding beyond a few thousand taps
/// is numerically unreliable, so longer filters are tested on a prefix;
/// the result is only definitive when that prefix carries essentially all
/// of the energy.
fn test_zero_locations(
    samples: &[f64],
    profile: &EnergyProfile,
    config: &PhaseConfig,
) -> PhaseTestResult {
    let tested = samples.len().min(config.zero_test_max_taps);
    let prefix_energy = profile.fraction_at(tested - 1);
    let solution = find_roots(&samples[..tested]);

    if !solution.converged {
        return PhaseTestResult::inconclusive(
            solution.max_magnitude(),
            format!("root search did not converge after {} sweeps", solution.iterations),
        );
    }

    let max_magnitude = solution.max_magnitude();
    let outside = solution
        .roots
        .iter()
        .filter(|z| z.norm() > config.root_tolerance)
        .count();
    let on_circle = solution
        .roots
        .iter()
        .filter(|z| {
            let m = z.norm();
            m >= 0.999 && m <= config.root_tolerance
        })
        .count();
    let inside = solution.roots.len() - outside - on_circle;

    let full_coverage = tested == samples.len() || prefix_energy >= config.prefix_energy_floor;
    PhaseTestResult {
        classification: if outside == 0 {
            PhaseClassification::MinPhase
        } else {
            PhaseClassification::NotMinPhase
        },
        confidence: if full_coverage {
            PhaseConfidence::Definitive
        } else {
            PhaseConfidence::Medium
        },
        raw_metric: max_magnitude,
        detail: format!(
            "{} zeros from {} taps: {} inside, {} on, {} outside the unit circle (max |z| {:.6})",
            solution.roots.len(),
            tested,
            inside,
            on_circle,
            outside,
            max_magnitude
        ),
    }
}

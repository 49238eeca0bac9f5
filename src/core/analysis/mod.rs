//! Filter analysis algorithms
//!
//! Covers the verification side of the converter:
//! - Cumulative energy profiling
//! - Truncation safety evaluation and gated length adjustment
//! - Frequency-domain before/after comparison
//! - Minimum-phase classification
//! - Descriptive filter statistics

mod energy;
mod phase;
mod safety;
mod spectral;
mod stats;

pub use energy::EnergyProfile;
pub use phase::{
    classify_minimum_phase, MinimumPhaseVerdict, PhaseClassification, PhaseConfidence,
    PhaseTestResult,
};
pub use safety::{adjust_length, evaluate_truncation, RiskLevel, TruncationVerdict};
pub use spectral::{BandStats, SpectralComparator, SpectralComparison};
pub use stats::{FilterStats, ENERGY_MILESTONES};

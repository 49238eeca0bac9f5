//! FirFit - FIR correction filter conversion with truncation safety
//!
//! Converts measured FIR correction filters between tap counts for a
//! fixed-length calibration format, refusing conversions that would destroy
//! the correction and verifying the survivors in the frequency domain.
//!
//! ## Features
//!
//! - **Truncation safety gate**: energy-loss classification before a single
//!   sample is discarded, with an explicit override for operators who accept
//!   the damage
//! - **Spectral verification**: before/after magnitude comparison on a
//!   shared frequency grid with per-band difference statistics
//! - **Minimum-phase battery**: energy concentration, group delay, symmetry
//!   and zero-location tests aggregated into one classification
//! - **Filter design**: renders measured magnitude correction curves into
//!   FIR impulses via inverse real FFT
//! - **Batch conversion**: JSON channel maps processed on a worker pool with
//!   one report per channel
//!
//! ## Module Structure
//!
//! - `core` - conversion, analysis and DSP algorithms
//! - `cli` - command-line interface
//! - `config` - thresholds, channel classes and the band layout
//! - `report` - JSON/CSV/WAV export
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use firfit::core::loader;
//! use firfit::core::pipeline::{convert_channel, ConvertOptions};
//!
//! let filter = loader::load_filter(path, 48000)?;
//! let result = convert_channel("Front Left", &filter, 16321, &ConvertOptions::default())?;
//!
//! println!(
//!     "{} -> {} taps: {}",
//!     result.report.original_length,
//!     result.report.output_length,
//!     result.report.verdict.risk_level
//! );
//! ```
//!
//! ## Risk Levels
//!
//! | Level         | Meaning                               | Blocking |
//! |---------------|---------------------------------------|----------|
//! | SAFE          | truncation discards silence only      | no       |
//! | MOSTLY_SAFE   | tail past the cut is negligible noise | no       |
//! | MODERATE_RISK | audible filter energy discarded       | yes      |
//! | CATASTROPHIC  | correction response destroyed         | yes      |
//!
//! Blocked conversions surface as [`FilterError::UnsafeTruncation`] carrying
//! the full verdict; the only way past is the explicit force flag.

// Core conversion and analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Thresholds, channel classes and band layout
pub mod config;

// Library error type
pub mod error;

// JSON/CSV/WAV export
pub mod report;

// Re-export commonly used types at crate root for convenience
pub use config::{ChannelClass, DesignConfig, PhaseConfig, SafetyConfig};
pub use crate::core::analysis::{
    adjust_length, classify_minimum_phase, evaluate_truncation, FilterStats,
    MinimumPhaseVerdict, PhaseClassification, RiskLevel, SpectralComparator, TruncationVerdict,
};
pub use crate::core::filter::FilterData;
pub use crate::core::pipeline::{convert_channel, ChannelReport, ConversionResult, ConvertOptions};
pub use error::FilterError;

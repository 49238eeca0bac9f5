// src/error.rs
//
// Library error type. The safety gate surfaces blocked truncations through
// `UnsafeTruncation`, which carries the full verdict so callers can report
// the measured loss and decide whether to retry with an override.

use crate::core::analysis::TruncationVerdict;

#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    #[error(
        "unsafe truncation: {:.2}% of filter energy lies beyond the target length ({} risk); pass an explicit override to force it",
        .verdict.energy_loss_fraction * 100.0,
        .verdict.risk_level
    )]
    UnsafeTruncation { verdict: TruncationVerdict },

    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Configuration records passed explicitly into the analysis components

mod bands;
mod thresholds;

pub use bands::{standard_bands, ChannelClass, FrequencyBand};
pub use thresholds::{DesignConfig, PhaseConfig, SafetyConfig};

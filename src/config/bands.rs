// src/config/bands.rs
//
// The closed target-length table and the fixed frequency band layout used
// for spectral difference reporting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Destination channel class in the calibration-file format.
///
/// The format accepts exactly two tap counts: standard bed channels take
/// 16321 taps and elevation channels take 16055. Any other target length is
/// a configuration error on the caller's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelClass {
    /// Standard bed channel, 16321 taps (tag `S`)
    S,
    /// Elevation channel, 16055 taps (tag `E`)
    E,
}

impl ChannelClass {
    pub fn taps(&self) -> usize {
        match self {
            Self::S => 16321,
            Self::E => 16055,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::S => "S",
            Self::E => "E",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::S => "standard bed channel (16321 taps)",
            Self::E => "elevation channel (16055 taps)",
        }
    }

    pub fn all() -> [Self; 2] {
        [Self::S, Self::E]
    }
}

impl FromStr for ChannelClass {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Self::S),
            "E" => Ok(Self::E),
            other => Err(FilterError::Configuration {
                message: format!("unknown channel class '{}', expected S or E", other),
            }),
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One analysis band, inclusive on both edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub name: String,
    pub low_hz: f64,
    pub high_hz: f64,
}

impl FrequencyBand {
    pub fn new(name: &str, low_hz: f64, high_hz: f64) -> Self {
        Self {
            name: name.to_string(),
            low_hz,
            high_hz,
        }
    }

    pub fn contains(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.low_hz && frequency_hz <= self.high_hz
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}-{:.0} Hz)", self.name, self.low_hz, self.high_hz)
    }
}

/// The band layout the reporting side expects. Covers the audible range in
/// seven slices from sub-bass to the top octave.
pub fn standard_bands() -> Vec<FrequencyBand> {
    vec![
        FrequencyBand::new("Sub-bass", 20.0, 60.0),
        FrequencyBand::new("Bass", 60.0, 250.0),
        FrequencyBand::new("Low-mid", 250.0, 500.0),
        FrequencyBand::new("Mid", 500.0, 2000.0),
        FrequencyBand::new("High-mid", 2000.0, 6000.0),
        FrequencyBand::new("High", 6000.0, 12000.0),
        FrequencyBand::new("Very high", 12000.0, 20000.0),
    ]
}

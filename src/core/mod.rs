//! Core conversion, analysis and DSP modules

pub mod analysis;
pub mod design;
pub mod dsp;
pub mod filter;
pub mod loader;
pub mod pipeline;

pub use filter::FilterData;
pub use pipeline::{convert_batch, convert_channel, ChannelReport, ConversionResult, ConvertOptions};

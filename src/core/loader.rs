// src/core/loader.rs
//
// Reads filter coefficients from their two source containers: WAV files
// (the convolution-filter export format) and plain JSON arrays (the
// processor import format). Integer PCM is normalized to [-1, 1]; floats
// pass through untouched. Multi-channel files contribute their first
// channel only.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::SampleFormat;
use log::{debug, info};

use crate::core::filter::FilterData;
use crate::error::FilterError;

/// Load filter coefficients from a WAV file
pub fn load_wav(path: &Path) -> Result<FilterData, FilterError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    debug!(
        "{}: {} Hz, {} ch, {}-bit {:?}",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let interleaved: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            // Scale by the format's full range: 32768 for 16-bit, 8388608
            // for 24-bit, 2147483648 for 32-bit
            let scale = (1i64 << spec.bits_per_sample.saturating_sub(1)).max(1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / scale))
                .collect::<Result<_, _>>()?
        }
    };

    let samples = extract_first_channel(interleaved, spec.channels);
    if spec.channels > 1 {
        info!(
            "{}: {} channels, keeping the first",
            path.display(),
            spec.channels
        );
    }

    FilterData::new(samples, spec.sample_rate)
}

/// Load filter coefficients from a JSON array of numbers. The array
/// carries no rate of its own, so the caller supplies one.
pub fn load_json(path: &Path, sample_rate: u32) -> Result<FilterData, FilterError> {
    let file = File::open(path)?;
    let samples: Vec<f64> = serde_json::from_reader(BufReader::new(file))?;
    debug!("{}: {} coefficients", path.display(), samples.len());
    FilterData::new(samples, sample_rate)
}

/// Dispatch on file extension: `.json` goes to the JSON reader,
/// everything else is treated as WAV
pub fn load_filter(path: &Path, json_sample_rate: u32) -> Result<FilterData, FilterError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path, json_sample_rate),
        _ => load_wav(path),
    }
}

fn extract_first_channel(interleaved: Vec<f64>, channels: u16) -> Vec<f64> {
    if channels <= 1 {
        return interleaved;
    }
    interleaved
        .into_iter()
        .step_by(channels as usize)
        .collect()
}

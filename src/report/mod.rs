//! File exports for conversion reports and spectral datasets
//!
//! JSON carries the structured records, CSV carries the per-bin datasets
//! for external plotting, and WAV carries adjusted or designed coefficients
//! back into the convolution toolchain. Terminal rendering lives in the CLI
//! layer; this module only touches the filesystem.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::core::analysis::SpectralComparison;
use crate::core::dsp::Spectrum;
use crate::core::filter::FilterData;
use crate::error::FilterError;

/// Write any report record as pretty-printed JSON
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), FilterError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Write filter coefficients as 32-bit float mono WAV
pub fn save_filter_wav(filter: &FilterData, path: &Path) -> Result<(), FilterError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: filter.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for sample in &filter.samples {
        writer.write_sample(*sample as f32)?;
    }
    writer.finalize()?;
    info!("wrote {} ({} taps)", path.display(), filter.len());
    Ok(())
}

/// Dump one spectrum as CSV, one positive-frequency bin per row
pub fn write_spectrum_csv(spectrum: &Spectrum, path: &Path) -> Result<(), FilterError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "frequency_hz,magnitude,magnitude_db,phase_rad")?;
    for i in 0..spectrum.len() {
        writeln!(
            writer,
            "{},{},{},{}",
            spectrum.frequencies_hz[i],
            spectrum.magnitude[i],
            spectrum.magnitude_db[i],
            spectrum.phase_rad[i]
        )?;
    }
    writer.flush()?;
    info!("wrote {} ({} bins)", path.display(), spectrum.len());
    Ok(())
}

/// Dump a before/after comparison as CSV on the shared frequency grid
pub fn write_comparison_csv(
    comparison: &SpectralComparison,
    path: &Path,
) -> Result<(), FilterError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "frequency_hz,original_db,adjusted_db,difference_db")?;
    for i in 0..comparison.frequencies_hz.len() {
        writeln!(
            writer,
            "{},{},{},{}",
            comparison.frequencies_hz[i],
            comparison.original_db[i],
            comparison.adjusted_db[i],
            comparison.difference_db[i]
        )?;
    }
    writer.flush()?;
    info!(
        "wrote {} ({} bins)",
        path.display(),
        comparison.frequencies_hz.len()
    );
    Ok(())
}

/// Dump raw coefficients as text, one per line. Display formatting keeps
/// the shortest representation that round-trips, so nothing is lost.
pub fn write_coefficients(filter: &FilterData, path: &Path) -> Result<(), FilterError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for sample in &filter.samples {
        writeln!(writer, "{}", sample)?;
    }
    writer.flush()?;
    Ok(())
}

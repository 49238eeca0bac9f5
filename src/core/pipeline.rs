// src/core/pipeline.rs
//
// Per-channel conversion orchestration: safety gate, length adjustment and
// spectral verification rolled into one serializable report, plus the batch
// runner the multi-channel workflow drives from a channel map file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ChannelClass, SafetyConfig};
use crate::core::analysis::{
    adjust_length, evaluate_truncation, BandStats, SpectralComparator, SpectralComparison,
    TruncationVerdict,
};
use crate::core::filter::FilterData;
use crate::core::loader;
use crate::error::FilterError;

/// Knobs for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Proceed past a blocking truncation verdict
    pub force: bool,
    /// Run the before/after spectral comparison when the length changed
    pub verify_spectrum: bool,
    pub safety: SafetyConfig,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            force: false,
            verify_spectrum: true,
            safety: SafetyConfig::default(),
        }
    }
}

/// Compact frequency-domain summary carried inside a channel report. The
/// full per-bin dataset stays out of the report; exports that need it run
/// the comparator directly.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSummary {
    pub original_bins: usize,
    pub adjusted_bins: usize,
    pub original_resolution_hz: f64,
    pub adjusted_resolution_hz: f64,
    pub max_difference_db: f64,
    pub mean_difference_db: f64,
    pub rms_difference_db: f64,
    pub band_stats: Vec<BandStats>,
}

impl From<&SpectralComparison> for ComparisonSummary {
    fn from(comparison: &SpectralComparison) -> Self {
        Self {
            original_bins: comparison.original.len(),
            adjusted_bins: comparison.adjusted.len(),
            original_resolution_hz: comparison.original.resolution_hz,
            adjusted_resolution_hz: comparison.adjusted.resolution_hz,
            max_difference_db: comparison.max_difference_db,
            mean_difference_db: comparison.mean_difference_db,
            rms_difference_db: comparison.rms_difference_db,
            band_stats: comparison.band_stats.clone(),
        }
    }
}

/// End-to-end record of one channel's conversion
#[derive(Debug, Clone, Serialize)]
pub struct ChannelReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    pub original_length: usize,
    pub target_length: usize,
    pub output_length: usize,
    pub sample_rate: u32,
    pub forced: bool,
    pub verdict: TruncationVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonSummary>,
    pub timestamp: DateTime<Utc>,
}

/// Adjusted filter plus its report
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub filter: FilterData,
    pub report: ChannelReport,
}

/// Convert one channel to `target_length` taps.
///
/// The length adjuster is the gate: a blocking verdict surfaces as
/// `UnsafeTruncation` unless `force` is set. The report's verdict is
/// evaluated at the truncation point (or trivially at the full length when
/// padding, which discards nothing).
pub fn convert_channel(
    name: &str,
    filter: &FilterData,
    target_length: usize,
    options: &ConvertOptions,
) -> Result<ConversionResult, FilterError> {
    let adjusted = adjust_length(filter, target_length, options.force, &options.safety)?;

    let mut verdict = evaluate_truncation(
        &filter.samples,
        target_length.min(filter.len()),
        options.force,
        &options.safety,
    )?;
    verdict.target_length = target_length;

    let comparison = if options.verify_spectrum && adjusted.len() != filter.len() {
        let mut comparator = SpectralComparator::new();
        let full = comparator.compare(filter, &adjusted)?;
        Some(ComparisonSummary::from(&full))
    } else {
        None
    };

    debug!(
        "{}: {} -> {} taps, {}, max spectral difference {:?} dB",
        name,
        filter.len(),
        adjusted.len(),
        verdict.risk_level,
        comparison.as_ref().map(|c| c.max_difference_db)
    );

    let report = ChannelReport {
        name: name.to_string(),
        source_path: None,
        original_length: filter.len(),
        target_length,
        output_length: adjusted.len(),
        sample_rate: filter.sample_rate,
        forced: options.force,
        verdict,
        comparison,
        timestamp: Utc::now(),
    };

    Ok(ConversionResult {
        filter: adjusted,
        report,
    })
}

/// One entry of a batch channel map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub path: PathBuf,
    pub class: ChannelClass,
}

/// Load a channel map: a JSON array of `{name, path, class}` entries
pub fn load_channel_map(path: &Path) -> Result<Vec<ChannelSpec>, FilterError> {
    let file = std::fs::File::open(path)?;
    let specs: Vec<ChannelSpec> = serde_json::from_reader(std::io::BufReader::new(file))?;
    if specs.is_empty() {
        return Err(FilterError::Configuration {
            message: format!("channel map {} lists no channels", path.display()),
        });
    }
    info!("channel map {}: {} channels", path.display(), specs.len());
    Ok(specs)
}

/// Outcome of one batch entry; failures are carried, not fatal to the run
#[derive(Debug)]
pub struct BatchItem {
    pub spec: ChannelSpec,
    pub result: Result<ConversionResult, FilterError>,
}

/// Convert every channel in the map. Channels are independent, so they run
/// on the thread pool; results come back in map order.
pub fn convert_batch(
    specs: &[ChannelSpec],
    json_sample_rate: u32,
    options: &ConvertOptions,
    show_progress: bool,
) -> Vec<BatchItem> {
    let bar = if show_progress {
        let bar = ProgressBar::new(specs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    specs
        .par_iter()
        .progress_with(bar)
        .map(|spec| {
            let result = loader::load_filter(&spec.path, json_sample_rate).and_then(|filter| {
                convert_channel(&spec.name, &filter, spec.class.taps(), options).map(
                    |mut conversion| {
                        conversion.report.source_path = Some(spec.path.clone());
                        conversion
                    },
                )
            });
            BatchItem {
                spec: spec.clone(),
                result,
            }
        })
        .collect()
}

//! Output formatting for CLI results

use crate::core::analysis::{
    FilterStats, MinimumPhaseVerdict, PhaseClassification, RiskLevel, TruncationVerdict,
};
use crate::core::filter::FilterData;
use crate::core::pipeline::{ChannelReport, ComparisonSummary};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

fn risk_color(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "\x1b[32m",         // green
        RiskLevel::MostlySafe => "\x1b[36m",   // cyan
        RiskLevel::ModerateRisk => "\x1b[33m", // yellow
        RiskLevel::Catastrophic => "\x1b[31m", // red
    }
}

fn phase_color(classification: PhaseClassification) -> &'static str {
    match classification {
        PhaseClassification::MinPhase => "\x1b[32m",     // green
        PhaseClassification::NotMinPhase => "\x1b[31m",  // red
        PhaseClassification::Inconclusive => "\x1b[33m", // yellow
    }
}

/// Format the preview block: shape statistics plus head/tail taps
pub fn format_preview(path: &str, filter: &FilterData, stats: &FilterStats) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}{}{}\n", BOLD, path, RESET));
    output.push_str(&format!(
        "  {} taps @ {} Hz ({:.1} ms)\n",
        stats.length, stats.sample_rate, stats.duration_ms
    ));
    output.push_str(&format!(
        "  peak {:.6} | rms {:.6} | mean {:+.3e} | range [{:+.6}, {:+.6}]\n",
        stats.peak, stats.rms, stats.mean, stats.min, stats.max
    ));
    output.push_str(&format!(
        "  leading zeros {} | trailing zeros {}\n",
        stats.leading_zeros, stats.trailing_zeros
    ));
    match (stats.active_start, stats.active_end) {
        (Some(start), Some(end)) => {
            output.push_str(&format!("  active region [{}, {}]\n", start, end));
        }
        _ => {
            output.push_str(&format!("  {}silent filter, no active region{}\n", DIM, RESET));
        }
    }

    output.push_str("  energy milestones:\n");
    for (fraction, index) in &stats.energy_milestones {
        output.push_str(&format!(
            "    {:>5.1}% within {} taps\n",
            fraction * 100.0,
            index + 1
        ));
    }

    let head: Vec<String> = filter
        .samples
        .iter()
        .take(6)
        .map(|s| format!("{:+.6}", s))
        .collect();
    let tail_start = filter.len().saturating_sub(6);
    let tail: Vec<String> = filter.samples[tail_start..]
        .iter()
        .map(|s| format!("{:+.6}", s))
        .collect();
    output.push_str(&format!("  head: {}\n", head.join("  ")));
    output.push_str(&format!("  tail: {}\n", tail.join("  ")));

    output
}

/// Format a truncation verdict block
pub fn format_verdict(verdict: &TruncationVerdict) -> String {
    let mut output = String::new();
    let color = risk_color(verdict.risk_level);

    output.push_str(&format!(
        "  {}{} {}{}{} {}({} -> {} taps){}\n",
        color,
        verdict.risk_level.symbol(),
        BOLD,
        verdict.risk_level.label(),
        RESET,
        DIM,
        verdict.original_length,
        verdict.target_length,
        RESET
    ));
    output.push_str(&format!("    {}\n", verdict.risk_level.description()));
    output.push_str(&format!(
        "    energy loss {:.4}% | retained {:.4}% | active region ends at {}\n",
        verdict.energy_loss_fraction * 100.0,
        verdict.energy_at_target * 100.0,
        verdict.active_region_end_index
    ));
    if verdict.degenerate_energy {
        output.push_str(&format!(
            "    {}all-zero sequence, loss defined as 0{}\n",
            DIM, RESET
        ));
    }
    if verdict.blocked {
        output.push_str(&format!(
            "    \x1b[31mblocked{} rerun with --force to override\n",
            RESET
        ));
    }

    output
}

/// Format a compact band-by-band spectral difference table
pub fn format_comparison_summary(summary: &ComparisonSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  spectral difference: max {:.3} dB | mean {:.3} dB | rms {:.3} dB\n",
        summary.max_difference_db, summary.mean_difference_db, summary.rms_difference_db
    ));
    output.push_str(&format!(
        "  {}grids: {} vs {} bins ({:.2} vs {:.2} Hz resolution){}\n",
        DIM,
        summary.original_bins,
        summary.adjusted_bins,
        summary.original_resolution_hz,
        summary.adjusted_resolution_hz,
        RESET
    ));
    for band in &summary.band_stats {
        if band.bins == 0 {
            output.push_str(&format!(
                "    {}{:<12} {:>6.0} to {:>6.0} Hz   no bins{}\n",
                DIM, band.band, band.low_hz, band.high_hz, RESET
            ));
        } else {
            output.push_str(&format!(
                "    {:<12} {:>6.0} to {:>6.0} Hz   max {:>7.3} dB  mean {:>7.3} dB  rms {:>7.3} dB  ({} bins)\n",
                band.band, band.low_hz, band.high_hz, band.max_abs_db, band.mean_abs_db,
                band.rms_db, band.bins
            ));
        }
    }

    output
}

/// Format one channel's conversion report
pub fn format_report(report: &ChannelReport) -> String {
    let mut output = String::new();
    let color = risk_color(report.verdict.risk_level);

    output.push_str(&format!(
        "{}{} {}{}{}{}\n",
        color,
        report.verdict.risk_level.symbol(),
        BOLD,
        report.name,
        RESET,
        if report.forced {
            " \x1b[33m[forced]\x1b[0m"
        } else {
            ""
        }
    ));
    output.push_str(&format!(
        "  {} -> {} taps @ {} Hz\n",
        report.original_length, report.output_length, report.sample_rate
    ));
    output.push_str(&format_verdict(&report.verdict));
    if let Some(summary) = &report.comparison {
        output.push_str(&format_comparison_summary(summary));
    }

    output
}

/// Format the minimum-phase battery: overall call plus the four sub-tests
pub fn format_phase_verdict(verdict: &MinimumPhaseVerdict, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "  {}{}{}{}\n",
        phase_color(verdict.classification),
        BOLD,
        verdict.classification.label(),
        RESET
    ));
    for (name, result) in verdict.tests() {
        output.push_str(&format!(
            "    {:<20} {}{:<13}{} {}({}){}\n",
            name,
            phase_color(result.classification),
            result.classification.label(),
            RESET,
            DIM,
            result.confidence.label(),
            RESET
        ));
        if verbose {
            output.push_str(&format!(
                "      {}metric {:.6}: {}{}\n",
                DIM, result.raw_metric, result.detail, RESET
            ));
        }
    }

    output
}

/// Format a summary for multiple analyzed files
pub fn format_analyze_summary(levels: &[RiskLevel], failures: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}Summary:{}\n", BOLD, RESET));
    output.push_str(&format!("  {} file(s) analyzed\n", levels.len() + failures));

    for level in [
        RiskLevel::Safe,
        RiskLevel::MostlySafe,
        RiskLevel::ModerateRisk,
        RiskLevel::Catastrophic,
    ] {
        let count = levels.iter().filter(|&&l| l == level).count();
        if count > 0 {
            output.push_str(&format!(
                "  {}{} {} {}{}\n",
                risk_color(level),
                level.symbol(),
                count,
                level.label(),
                RESET
            ));
        }
    }
    if failures > 0 {
        output.push_str(&format!("  \x1b[31m✗ {} failed to load{}\n", failures, RESET));
    }

    output
}

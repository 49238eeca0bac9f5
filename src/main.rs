// src/main.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use colorful::Colorful;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use firfit::cli::{output, Cli, Command};
use firfit::config::{ChannelClass, DesignConfig, PhaseConfig, SafetyConfig};
use firfit::core::analysis::{
    adjust_length, classify_minimum_phase, evaluate_truncation, FilterStats, SpectralComparator,
    TruncationVerdict,
};
use firfit::core::design::{load_correction_curve, FilterDesigner};
use firfit::core::loader;
use firfit::core::pipeline::{convert_channel, ComparisonSummary, ConvertOptions};
use firfit::report;
use firfit::FilterError;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Preview { file } => run_preview(&file, cli.sample_rate),
        Command::Convert {
            file,
            class,
            taps,
            force,
            wav_out,
            output,
        } => run_convert(
            &file,
            class,
            taps,
            force,
            wav_out.as_deref(),
            output.as_deref(),
            cli.sample_rate,
        ),
        Command::Analyze { paths, taps } => run_analyze(&paths, taps, cli.sample_rate),
        Command::Compare {
            file,
            taps,
            out_dir,
            force,
        } => run_compare(&file, taps, &out_dir, force, cli.sample_rate),
        Command::VerifyPhase { file, max_roots } => {
            run_verify_phase(&file, max_roots, cli.sample_rate, cli.verbose)
        }
        Command::Design { curve, taps, output } => {
            run_design(&curve, taps, cli.sample_rate, output)
        }
    }
}

fn run_preview(file: &Path, sample_rate: u32) -> Result<()> {
    let filter = load_filter(file, sample_rate)?;
    let stats = FilterStats::from_filter(&filter, SafetyConfig::default().active_region_db)?;
    print!(
        "{}",
        output::format_preview(&file.display().to_string(), &filter, &stats)
    );
    Ok(())
}

fn run_convert(
    file: &Path,
    class: Option<ChannelClass>,
    taps: Option<usize>,
    force: bool,
    wav_out: Option<&Path>,
    output_path: Option<&Path>,
    sample_rate: u32,
) -> Result<()> {
    let target = resolve_target(class, taps)?;

    println!("Converting: {}", file.display().to_string().cyan());
    let filter = load_filter(file, sample_rate)?;

    let options = ConvertOptions {
        force,
        ..ConvertOptions::default()
    };
    let mut result = match convert_channel(&channel_name(file), &filter, target, &options) {
        Ok(result) => result,
        Err(FilterError::UnsafeTruncation { verdict }) => {
            print!("{}", output::format_verdict(&verdict));
            bail!(
                "conversion to {} taps blocked, rerun with --force to override",
                target
            );
        }
        Err(err) => {
            return Err(err).with_context(|| format!("conversion of {} failed", file.display()))
        }
    };
    result.report.source_path = Some(file.to_path_buf());

    print!("{}", output::format_report(&result.report));

    if let Some(path) = wav_out {
        report::save_filter_wav(&result.filter, path)?;
        println!("  Coefficients saved to: {}", path.display());
    }
    if let Some(path) = output_path {
        report::save_json(&result.report, path)?;
        println!("  Report saved to: {}", path.display());
    }

    Ok(())
}

fn run_analyze(paths: &[PathBuf], taps: usize, sample_rate: u32) -> Result<()> {
    let files = collect_filter_files(paths)?;

    if files.is_empty() {
        println!("{}", "No coefficient files found!".red());
        return Ok(());
    }

    println!("Found {} coefficient file(s)\n", files.len());

    let config = SafetyConfig::default();
    let mut levels = Vec::new();
    let mut failures = 0usize;

    for file in &files {
        println!("Analyzing: {}", file.display().to_string().cyan());
        match analyze_file(file, taps, sample_rate, &config) {
            Ok(verdict) => {
                print!("{}", output::format_verdict(&verdict));
                levels.push(verdict.risk_level);
            }
            Err(err) => {
                println!("  {} {:#}", "failed:".red(), err);
                failures += 1;
            }
        }
        println!();
    }

    print!("{}", output::format_analyze_summary(&levels, failures));
    Ok(())
}

fn run_compare(
    file: &Path,
    taps: usize,
    out_dir: &Path,
    force: bool,
    sample_rate: u32,
) -> Result<()> {
    println!("Comparing: {}", file.display().to_string().cyan());
    let filter = load_filter(file, sample_rate)?;

    let adjusted = match adjust_length(&filter, taps, force, &SafetyConfig::default()) {
        Ok(adjusted) => adjusted,
        Err(FilterError::UnsafeTruncation { verdict }) => {
            print!("{}", output::format_verdict(&verdict));
            bail!(
                "comparison at {} taps blocked, rerun with --force to override",
                taps
            );
        }
        Err(err) => {
            return Err(err).with_context(|| format!("adjustment of {} failed", file.display()))
        }
    };

    let mut comparator = SpectralComparator::new();
    let comparison = comparator.compare(&filter, &adjusted)?;
    let summary = ComparisonSummary::from(&comparison);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let stem = channel_name(file);
    report::write_spectrum_csv(
        &comparison.original,
        &out_dir.join(format!("{}_original_spectrum.csv", stem)),
    )?;
    report::write_spectrum_csv(
        &comparison.adjusted,
        &out_dir.join(format!("{}_adjusted_spectrum.csv", stem)),
    )?;
    report::write_comparison_csv(&comparison, &out_dir.join(format!("{}_comparison.csv", stem)))?;
    report::save_json(&summary, &out_dir.join(format!("{}_summary.json", stem)))?;

    print!("{}", output::format_comparison_summary(&summary));
    println!(
        "  Datasets saved to: {}",
        out_dir.display().to_string().green()
    );
    Ok(())
}

fn run_verify_phase(
    file: &Path,
    max_roots: Option<usize>,
    sample_rate: u32,
    verbose: bool,
) -> Result<()> {
    println!("Classifying: {}", file.display().to_string().cyan());
    let filter = load_filter(file, sample_rate)?;

    let mut config = PhaseConfig::default();
    if let Some(max_roots) = max_roots {
        config.zero_test_max_taps = max_roots;
    }

    let verdict = classify_minimum_phase(&filter.samples, &config)
        .with_context(|| format!("classification of {} failed", file.display()))?;
    print!("{}", output::format_phase_verdict(&verdict, verbose));
    Ok(())
}

fn run_design(
    curve_path: &Path,
    taps: usize,
    sample_rate: u32,
    output_path: Option<PathBuf>,
) -> Result<()> {
    println!("Designing: {}", curve_path.display().to_string().cyan());
    let curve = load_correction_curve(curve_path)
        .with_context(|| format!("failed to parse {}", curve_path.display()))?;
    let (low_hz, high_hz) = curve.frequency_range_hz();
    println!(
        "  {} correction points covering {:.1} Hz to {:.1} Hz",
        curve.len(),
        low_hz,
        high_hz
    );

    let mut designer = FilterDesigner::new();
    let designed = designer
        .design(&curve, taps, sample_rate, &DesignConfig::default())
        .with_context(|| format!("design from {} failed", curve_path.display()))?;

    println!(
        "  {} taps @ {} Hz, peak scaled by {:.4}",
        taps, sample_rate, designed.scale_factor
    );
    if designed.rotated_by > 0 {
        println!("  peak rotated forward from index {}", designed.rotated_by);
    }

    let destination = output_path.unwrap_or_else(|| curve_path.with_extension("wav"));
    report::save_filter_wav(&designed.filter, &destination)?;
    println!(
        "  Filter saved to: {}",
        destination.display().to_string().green()
    );
    Ok(())
}

fn load_filter(file: &Path, sample_rate: u32) -> Result<firfit::FilterData> {
    loader::load_filter(file, sample_rate)
        .with_context(|| format!("failed to load {}", file.display()))
}

fn resolve_target(class: Option<ChannelClass>, taps: Option<usize>) -> Result<usize> {
    match (class, taps) {
        (Some(class), None) => Ok(class.taps()),
        (None, Some(taps)) => Ok(taps),
        (Some(_), Some(_)) => bail!("pass either --class or --taps, not both"),
        (None, None) => bail!("one of --class or --taps is required"),
    }
}

fn channel_name(file: &Path) -> String {
    file.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn collect_filter_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if let Some(ext) = entry_path.extension() {
                    if ext.to_str().unwrap_or("").eq_ignore_ascii_case("wav") {
                        files.push(entry_path.to_path_buf());
                    }
                }
            }
        } else {
            bail!("{} does not exist", path.display());
        }
    }

    files.sort();
    Ok(files)
}

fn analyze_file(
    file: &Path,
    taps: usize,
    sample_rate: u32,
    config: &SafetyConfig,
) -> Result<TruncationVerdict> {
    let filter = load_filter(file, sample_rate)?;
    let target = taps.min(filter.len());
    let mut verdict = evaluate_truncation(&filter.samples, target, false, config)?;
    verdict.target_length = taps;
    Ok(verdict)
}

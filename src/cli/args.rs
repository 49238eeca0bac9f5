//! Command-line surface: clap derive definitions for the firfit binary

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ChannelClass;

#[derive(Parser, Debug)]
#[command(name = "firfit")]
#[command(about = "Convert FIR correction filters with truncation-safety and spectral verification")]
#[command(version)]
pub struct Cli {
    /// Sample rate assumed for inputs that carry none (JSON coefficient
    /// arrays, correction curves)
    #[arg(
        long,
        global = true,
        env = "FIRFIT_SAMPLE_RATE",
        default_value_t = 48000
    )]
    pub sample_rate: u32,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect a filter: shape statistics, energy milestones, head/tail taps
    Preview {
        /// Coefficient file (.wav or .json)
        file: PathBuf,
    },

    /// Convert a filter to a target tap count behind the safety gate
    Convert {
        /// Coefficient file (.wav or .json)
        file: PathBuf,

        /// Channel class selecting the calibration tap count (S or E)
        #[arg(short, long)]
        class: Option<ChannelClass>,

        /// Explicit target tap count, instead of --class
        #[arg(short, long)]
        taps: Option<usize>,

        /// Proceed past a blocking truncation verdict
        #[arg(short, long)]
        force: bool,

        /// Destination for the adjusted coefficients (32-bit float WAV)
        #[arg(short, long)]
        wav_out: Option<PathBuf>,

        /// Destination for the conversion report (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Truncation-safety report for one or many files; directories are
    /// walked for .wav coefficient files
    Analyze {
        /// Files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Target tap count the safety verdicts are evaluated against
        #[arg(short, long, default_value_t = 16321)]
        taps: usize,
    },

    /// Full before/after spectral comparison with CSV/JSON dataset export
    Compare {
        /// Coefficient file (.wav or .json)
        file: PathBuf,

        /// Target tap count
        #[arg(short, long)]
        taps: usize,

        /// Directory receiving the exported datasets
        #[arg(short, long, default_value = "firfit_comparison")]
        out_dir: PathBuf,

        /// Proceed past a blocking truncation verdict
        #[arg(short, long)]
        force: bool,
    },

    /// Classify a filter as minimum phase via the four-test battery
    VerifyPhase {
        /// Coefficient file (.wav or .json)
        file: PathBuf,

        /// Cap on the tap count handed to the root finder
        #[arg(short, long)]
        max_roots: Option<usize>,
    },

    /// Render a measured correction curve into an FIR impulse
    Design {
        /// Correction curve: frequency/dB text pairs
        curve: PathBuf,

        /// Tap count of the designed filter
        #[arg(short, long)]
        taps: usize,

        /// Destination WAV (defaults to the curve path with a .wav extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

use std::path::{Path, PathBuf};
use std::process::Command;

pub fn get_binary_path() -> PathBuf {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // Prefer release binary
    let release = root.join("target/release/firfit");
    if release.exists() {
        return release;
    }
    // Fallback to debug
    let debug = root.join("target/debug/firfit");
    if debug.exists() {
        return debug;
    }
    // Default to release path even if missing (will fail later with clear error)
    release
}

pub fn firfit_cmd() -> Command {
    Command::new(get_binary_path())
}

/// Fresh scratch directory for one test
pub fn test_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("firfit_cli_tests").join(name);
    std::fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

pub fn write_filter_wav(path: &Path, samples: &[f64], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("Failed to create wav");
    for &s in samples {
        writer.write_sample(s as f32).expect("Failed to write sample");
    }
    writer.finalize().expect("Failed to finalize wav");
}

/// Unit impulse: full correction energy in the first tap
pub fn impulse(len: usize) -> Vec<f64> {
    let mut samples = vec![0.0; len];
    samples[0] = 1.0;
    samples
}

/// Impulse plus a strong late cluster, unsafe to cut in front of the cluster
pub fn heavy_tail(len: usize, tail_at: usize) -> Vec<f64> {
    let mut samples = vec![0.0; len];
    samples[0] = 1.0;
    samples[tail_at] = 1.0;
    samples
}

// tests/cli_test.rs
//
// End-to-end tests driving the firfit binary the way a user would. Each
// test writes its fixtures into its own temp directory, runs the binary
// and asserts on exit status plus the visible output.

mod test_utils;

use test_utils::{firfit_cmd, heavy_tail, impulse, test_dir, write_filter_wav};

#[test]
fn blocked_conversion_exits_nonzero() {
    let dir = test_dir("blocked_conversion");
    let input = dir.join("risky.wav");
    // Half the energy sits at tap 30000, far past the target
    write_filter_wav(&input, &heavy_tail(40000, 30000), 48000);

    let output = firfit_cmd()
        .args(["convert"])
        .arg(&input)
        .args(["--taps", "16321"])
        .output()
        .expect("Failed to execute firfit");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("CATASTROPHIC"), "stdout: {}", stdout);
    assert!(stderr.contains("blocked"), "stderr: {}", stderr);
}

#[test]
fn forced_conversion_writes_report_and_coefficients() {
    let dir = test_dir("forced_conversion");
    let input = dir.join("risky.wav");
    let report_path = dir.join("report.json");
    let wav_path = dir.join("converted.wav");
    write_filter_wav(&input, &heavy_tail(40000, 30000), 48000);

    let output = firfit_cmd()
        .args(["convert"])
        .arg(&input)
        .args(["--taps", "16321", "--force"])
        .arg("--output")
        .arg(&report_path)
        .arg("--wav-out")
        .arg(&wav_path)
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Report saved to"), "stdout: {}", stdout);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["verdict"]["risk_level"], "CATASTROPHIC");
    assert_eq!(report["forced"], true);
    assert_eq!(report["output_length"], 16321);
    assert!(report["comparison"].is_object());

    let reader = hound::WavReader::open(&wav_path).unwrap();
    assert_eq!(reader.spec().sample_rate, 48000);
    assert_eq!(reader.len(), 16321);
}

#[test]
fn padding_conversion_reports_safe() {
    let dir = test_dir("padding_conversion");
    let input = dir.join("short.wav");
    write_filter_wav(&input, &impulse(4096), 48000);

    let output = firfit_cmd()
        .args(["convert"])
        .arg(&input)
        .args(["--class", "S"])
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SAFE"), "stdout: {}", stdout);
    assert!(stdout.contains("16321"), "stdout: {}", stdout);
}

#[test]
fn convert_requires_exactly_one_target() {
    let dir = test_dir("convert_target");
    let input = dir.join("flat.wav");
    write_filter_wav(&input, &impulse(64), 48000);

    let neither = firfit_cmd()
        .args(["convert"])
        .arg(&input)
        .output()
        .expect("Failed to execute firfit");
    assert!(!neither.status.success());
    assert!(String::from_utf8_lossy(&neither.stderr).contains("--class or --taps"));

    let both = firfit_cmd()
        .args(["convert"])
        .arg(&input)
        .args(["--class", "E", "--taps", "100"])
        .output()
        .expect("Failed to execute firfit");
    assert!(!both.status.success());
    assert!(String::from_utf8_lossy(&both.stderr).contains("not both"));
}

#[test]
fn preview_shows_shape_and_milestones() {
    let dir = test_dir("preview");
    let input = dir.join("probe.wav");
    write_filter_wav(&input, &impulse(2048), 48000);

    let output = firfit_cmd()
        .args(["preview"])
        .arg(&input)
        .output()
        .expect("Failed to execute firfit");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2048 taps @ 48000 Hz"), "stdout: {}", stdout);
    assert!(stdout.contains("energy milestones"), "stdout: {}", stdout);
}

#[test]
fn analyze_walks_a_directory_and_summarizes() {
    let dir = test_dir("analyze_dir");
    write_filter_wav(&dir.join("clean.wav"), &impulse(2048), 48000);
    write_filter_wav(&dir.join("risky.wav"), &heavy_tail(40000, 30000), 48000);

    let output = firfit_cmd()
        .args(["analyze"])
        .arg(&dir)
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 2 coefficient file(s)"), "stdout: {}", stdout);
    assert!(stdout.contains("Summary"), "stdout: {}", stdout);
    assert!(stdout.contains("CATASTROPHIC"), "stdout: {}", stdout);
    assert!(stdout.contains("1 SAFE"), "stdout: {}", stdout);
}

#[test]
fn compare_exports_the_dataset_files() {
    let dir = test_dir("compare_export");
    let input = dir.join("probe.wav");
    let out_dir = dir.join("datasets");
    write_filter_wav(&input, &impulse(32768), 48000);

    let output = firfit_cmd()
        .args(["compare"])
        .arg(&input)
        .args(["--taps", "16321"])
        .arg("--out-dir")
        .arg(&out_dir)
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Datasets saved to"));
    for name in [
        "probe_original_spectrum.csv",
        "probe_adjusted_spectrum.csv",
        "probe_comparison.csv",
        "probe_summary.json",
    ] {
        assert!(out_dir.join(name).exists(), "missing {}", name);
    }
}

#[test]
fn verify_phase_labels_a_decay_minimum_phase() {
    let dir = test_dir("verify_phase");
    let input = dir.join("decay.wav");
    let samples: Vec<f64> = (0..2048).map(|n| 0.9_f64.powi(n)).collect();
    write_filter_wav(&input, &samples, 48000);

    let output = firfit_cmd()
        .args(["verify-phase"])
        .arg(&input)
        .args(["--max-roots", "64"])
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MIN_PHASE"), "stdout: {}", stdout);
    assert!(!stdout.contains("NOT_MIN_PHASE"), "stdout: {}", stdout);
    assert!(stdout.contains("Zero location"), "stdout: {}", stdout);
}

#[test]
fn design_renders_a_flat_curve() {
    let dir = test_dir("design_flat");
    let curve_path = dir.join("flat.txt");
    let out_path = dir.join("designed.wav");
    std::fs::write(&curve_path, "20 0.0\n20000 0.0\n").unwrap();

    let output = firfit_cmd()
        .args(["design"])
        .arg(&curve_path)
        .args(["--taps", "64"])
        .arg("--output")
        .arg(&out_path)
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("Filter saved to"));

    let mut reader = hound::WavReader::open(&out_path).unwrap();
    assert_eq!(reader.spec().sample_rate, 48000);
    let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 64);
    // A flat 0 dB curve collapses to an impulse scaled to the target peak
    let peak = samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
    assert!((peak - 0.72).abs() < 1e-4, "peak {}", peak);
}

#[test]
fn design_honors_the_global_sample_rate() {
    let dir = test_dir("design_rate");
    let curve_path = dir.join("flat.txt");
    let out_path = dir.join("designed.wav");
    std::fs::write(&curve_path, "20 0.0\n20000 0.0\n").unwrap();

    let output = firfit_cmd()
        .args(["design"])
        .arg(&curve_path)
        .args(["--taps", "128", "--sample-rate", "44100"])
        .arg("--output")
        .arg(&out_path)
        .output()
        .expect("Failed to execute firfit");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let reader = hound::WavReader::open(&out_path).unwrap();
    assert_eq!(reader.spec().sample_rate, 44100);
}

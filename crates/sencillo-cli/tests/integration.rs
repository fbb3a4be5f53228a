//! Integration tests for sencillo-cli.
//!
//! Drive the built `sencillo` binary end to end: engine listings, the fold
//! diagnostic, and WAV processing with command-line and file parameters.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn sencillo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sencillo"))
}

fn run(args: &[&str]) -> Output {
    sencillo_bin()
        .args(args)
        .output()
        .expect("failed to run sencillo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Write a float WAV from planar channels.
fn write_input(path: &Path, channels: &[Vec<f32>], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for frame in 0..channels[0].len() {
        for channel in channels {
            writer.write_sample(channel[frame]).unwrap();
        }
    }
    writer.finalize().unwrap();
}

/// Read a float WAV back as planar channels.
fn read_output(path: &Path) -> Vec<Vec<f32>> {
    let reader = hound::WavReader::open(path).unwrap();
    let count = reader.spec().channels as usize;
    let samples: Vec<f32> = reader.into_samples::<f32>().map(Result::unwrap).collect();
    (0..count)
        .map(|c| samples.iter().skip(c).step_by(count).copied().collect())
        .collect()
}

fn sine(len: usize, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| (i as f32 * 0.05).sin() * amplitude)
        .collect()
}

// ---------------------------------------------------------------------------
// `sencillo engines`
// ---------------------------------------------------------------------------

#[test]
fn cli_engines_lists_all_engines() {
    let output = run(&["engines"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Available Engines"));
    for id in [
        "wave-folder",
        "filter",
        "delay-reverb",
        "stereo-flipper",
        "gain-meter",
    ] {
        assert!(text.contains(id), "listing should contain '{id}'");
    }
}

#[test]
fn cli_engines_detail_shows_parameters() {
    let output = run(&["engines", "delay-reverb"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Parameters"));
    assert!(text.contains("Delay Time"));
    assert!(text.contains("dr_feedback"));
}

#[test]
fn cli_engines_detail_marks_log_scale() {
    let output = run(&["engines", "filter"]);
    assert!(output.status.success());
    let text = stdout(&output);
    let cutoff = text
        .lines()
        .find(|l| l.contains("flt_cutoff"))
        .expect("cutoff row");
    assert!(cutoff.ends_with("(log)"), "row: {cutoff}");
    let resonance = text
        .lines()
        .find(|l| l.contains("flt_resonance"))
        .expect("resonance row");
    assert!(!resonance.contains("(log)"));
}

#[test]
fn cli_engines_unknown_fails() {
    let output = run(&["engines", "chorus"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown engine"));
}

#[test]
fn cli_help_works() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("process"));
    assert!(text.contains("engines"));
    assert!(text.contains("fold"));
}

// ---------------------------------------------------------------------------
// `sencillo fold`
// ---------------------------------------------------------------------------

#[test]
fn cli_fold_prints_folded_value() {
    let output = run(&["fold", "1.2", "1.0"]);
    assert!(output.status.success());
    let value: f32 = stdout(&output).trim().parse().unwrap();
    assert!((value - 0.8).abs() < 1e-5);

    let output = run(&["fold", "-1.5", "1"]);
    assert!(output.status.success());
    let value: f32 = stdout(&output).trim().parse().unwrap();
    assert!((value + 0.5).abs() < 1e-5);
}

#[test]
fn cli_fold_rejects_zero_threshold() {
    let output = run(&["fold", "0.5", "0"]);
    assert!(!output.status.success());
}

// ---------------------------------------------------------------------------
// `sencillo process`
// ---------------------------------------------------------------------------

#[test]
fn cli_process_wave_folder_with_param() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_input(&input, &[sine(1000, 0.9)], 48000);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--engine",
        "wave-folder",
        "--param",
        "threshold=0.5",
        "--block-size",
        "64",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let channels = read_output(&output_path);
    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].len(), 1000);
    assert!(channels[0].iter().all(|s| s.abs() <= 0.5 + 1e-6));
}

#[test]
fn cli_process_flipper_swaps_stereo() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_input(&input, &[vec![1.0; 400], vec![-1.0; 400]], 1000);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--engine",
        "stereo-flipper",
        "--param",
        "flip period=0.1",
        "--block-size",
        "37",
    ]);
    assert!(output.status.success());

    let channels = read_output(&output_path);
    for (n, (&l, &r)) in channels[0].iter().zip(&channels[1]).enumerate() {
        let flipped = n % 201 < 100;
        assert_eq!(l, if flipped { -1.0 } else { 1.0 }, "frame {n}");
        assert_eq!(r, -l);
    }
}

#[test]
fn cli_process_params_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    let params = dir.path().join("params.toml");
    let mut impulse = vec![0.0; 2000];
    impulse[0] = 1.0;
    write_input(&input, &[impulse.clone(), impulse], 1000);
    std::fs::write(
        &params,
        r#"
engine = "delay-reverb"

[params]
wet = 0.0
dry = 0.5
"delay time" = 0.01
feedback = 0.5
"#,
    )
    .unwrap();

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--params",
        params.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let channels = read_output(&output_path);
    assert!((channels[0][10] - 0.5).abs() < 1e-6);
    assert!((channels[1][20] - 0.25).abs() < 1e-6);
}

#[test]
fn cli_process_gain_meter_reports_peaks() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_input(&input, &[sine(500, 0.5), sine(500, 0.5)], 48000);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "--engine",
        "gain-meter",
        "--param",
        "main gain=0",
    ]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Meter:"));
    let channels = read_output(&output_path);
    assert!(channels.iter().flatten().all(|&s| s == 0.0));
}

#[test]
fn cli_process_rejects_mono_for_stereo_engine() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_input(&input, &[sine(100, 0.5)], 48000);

    let output = run(&[
        "process",
        input.to_str().unwrap(),
        dir.path().join("out.wav").to_str().unwrap(),
        "--engine",
        "stereo-flipper",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("at least 2 channels"));
}

#[test]
fn cli_process_rejects_bad_params() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let out = dir.path().join("out.wav");
    write_input(&input, &[sine(100, 0.5)], 48000);
    let (input, out) = (input.to_str().unwrap(), out.to_str().unwrap());

    let unknown = run(&["process", input, out, "--engine", "filter", "--param", "drive=3"]);
    assert!(!unknown.status.success());
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("no parameter 'drive'"));

    let range = run(&["process", input, out, "--engine", "filter", "--param", "resonance=50"]);
    assert!(!range.status.success());
    assert!(String::from_utf8_lossy(&range.stderr).contains("outside"));

    let engine = run(&["process", input, out, "--engine", "chorus"]);
    assert!(!engine.status.success());

    let missing = run(&["process", input, out]);
    assert!(!missing.status.success());
}

#[test]
fn cli_process_nonexistent_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(&[
        "process",
        "/nonexistent/input.wav",
        dir.path().join("out.wav").to_str().unwrap(),
        "--engine",
        "filter",
    ]);
    assert!(!output.status.success());
}

//! CLI end-to-end tests
//!
//! Tests for the probekit command-line interface, run against scripted
//! stand-ins for ffprobe and ffmpeg.

mod common;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serial_test::serial;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the probekit binary
#[allow(deprecated)]
fn probekit_cmd() -> Command {
    let mut cmd = Command::cargo_bin("probekit").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
#[serial]
fn test_cli_no_args_shows_help() {
    let mut cmd = probekit_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
#[serial]
fn test_cli_help_flag() {
    let mut cmd = probekit_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("probekit"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
#[serial]
fn test_cli_version_flag() {
    let mut cmd = probekit_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("probekit"));
}

#[test]
#[serial]
fn test_cli_version_command() {
    let mut cmd = probekit_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
#[serial]
fn test_cli_subcommand_help() {
    probekit_cmd()
        .args(["probe", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Probe a media file"));

    probekit_cmd()
        .args(["frames", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract frames"));

    probekit_cmd()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Convert a media file to MP4"));
}

#[test]
#[serial]
fn test_cli_check_tools_reports_missing() {
    let temp = tempdir().unwrap();
    let config = common::write_config(
        temp.path(),
        &temp.path().join("missing-ffprobe"),
        &temp.path().join("missing-ffmpeg"),
        "",
    );

    probekit_cmd()
        .args(["--config", config.to_str().unwrap(), "check-tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("missing-ffprobe"))
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("Some tools are missing"));
}

#[test]
#[serial]
fn test_cli_validate_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("probekit.toml");
    fs::write(
        &config,
        "[tools]\ntimeout_secs = 45\n\n[frames]\nframe_rate = \"0.5\"\nwidth = 640\nheight = 320\n",
    )
    .unwrap();

    probekit_cmd()
        .args(["validate", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Timeout: 45s"))
        .stdout(predicate::str::contains("Frame size: 640x320"));
}

#[test]
#[serial]
fn test_cli_validate_rejects_bad_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("probekit.toml");
    fs::write(&config, "[tools]\ntimeout_secs = 0\n").unwrap();

    probekit_cmd()
        .args(["validate", config.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"));
}

#[test]
#[serial]
fn test_cli_rejects_zero_timeout() {
    probekit_cmd()
        .args(["--timeout", "0", "probe", "sample.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
#[serial]
fn test_cli_probe_missing_binary() {
    let temp = tempdir().unwrap();
    let config = common::write_config(
        temp.path(),
        &temp.path().join("missing-ffprobe"),
        &temp.path().join("missing-ffmpeg"),
        "",
    );

    probekit_cmd()
        .args(["--config", config.to_str().unwrap(), "probe", "movie.mkv"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("binary not found"));
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;

    #[test]
    #[serial]
    fn test_cli_probe_text_output() {
        let temp = tempdir().unwrap();
        let ffprobe = common::fake_ffprobe(temp.path());
        let config = common::write_config(temp.path(), &ffprobe, &temp.path().join("ffmpeg"), "");

        probekit_cmd()
            .args(["--config", config.to_str().unwrap(), "probe", "sample.mp4"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Container: mov,mp4,m4a,3gp,3g2,mj2"))
            .stdout(predicate::str::contains("Duration: 00:01:02"))
            .stdout(predicate::str::contains("640x360"))
            .stdout(predicate::str::contains("(eng)"))
            .stdout(predicate::str::contains("48000 Hz"));
    }

    #[test]
    #[serial]
    fn test_cli_probe_json_output() {
        let temp = tempdir().unwrap();
        let ffprobe = common::fake_ffprobe(temp.path());
        let config = common::write_config(temp.path(), &ffprobe, &temp.path().join("ffmpeg"), "");

        let output = probekit_cmd()
            .args(["--config", config.to_str().unwrap(), "probe", "--json", "sample.mp4"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["format"]["filename"], "sample.mp4");
        assert_eq!(json["streams"][0]["codec_type"], "video");
        assert_eq!(json["streams"][1]["sample_rate"], "48000");
    }

    #[test]
    #[serial]
    fn test_cli_probe_with_huge_timeout() {
        let temp = tempdir().unwrap();
        let ffprobe = common::fake_ffprobe(temp.path());
        let config = common::write_config(temp.path(), &ffprobe, &temp.path().join("ffmpeg"), "");

        probekit_cmd()
            .args([
                "--config",
                config.to_str().unwrap(),
                "--timeout",
                "18446744073709551615",
                "probe",
                "sample.mp4",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Container: mov,mp4,m4a,3gp,3g2,mj2"));
    }

    #[test]
    #[serial]
    fn test_cli_probe_timeout() {
        let temp = tempdir().unwrap();
        let ffprobe = common::fake_tool(temp.path(), "ffprobe", "exec sleep 30");
        let config = common::write_config(temp.path(), &ffprobe, &temp.path().join("ffmpeg"), "");

        assert_cmd::Command::from_std(probekit_cmd())
            .args([
                "--config",
                config.to_str().unwrap(),
                "--timeout",
                "1",
                "probe",
                "sample.mp4",
            ])
            .timeout(std::time::Duration::from_secs(20))
            .assert()
            .failure()
            .stderr(predicate::str::contains("timeout exceeded"));
    }

    #[test]
    #[serial]
    fn test_cli_frames_passes_options() {
        let temp = tempdir().unwrap();
        let args_file = temp.path().join("args.txt");
        let ffmpeg = common::fake_tool(
            temp.path(),
            "ffmpeg",
            &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
        );
        let out_dir = temp.path().join("frames");
        let config = common::write_config(
            temp.path(),
            &temp.path().join("ffprobe"),
            &ffmpeg,
            "\n[frames]\nframe_rate = \"0.5\"\n",
        );

        probekit_cmd()
            .args([
                "--config",
                config.to_str().unwrap(),
                "frames",
                "intro.mp4",
                "--width",
                "640",
                "--height",
                "320",
                "--output-dir",
                out_dir.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("intro-%03d.jpeg"));

        assert!(out_dir.is_dir());
        let args = fs::read_to_string(&args_file).unwrap();
        let args: Vec<&str> = args.lines().collect();
        let pattern = out_dir.join("intro-%03d.jpeg");
        assert_eq!(
            args,
            [
                "-i",
                "intro.mp4",
                "-r",
                "0.5",
                "-s",
                "640x320",
                "-f",
                "image2",
                pattern.to_str().unwrap()
            ]
        );
    }

    #[test]
    #[serial]
    fn test_cli_convert_failure_exits_non_zero() {
        let temp = tempdir().unwrap();
        let ffmpeg = common::fake_tool(temp.path(), "ffmpeg", "echo 'muxer error' >&2\nexit 1");
        let config = common::write_config(temp.path(), &temp.path().join("ffprobe"), &ffmpeg, "");

        probekit_cmd()
            .args(["--config", config.to_str().unwrap(), "convert", "target.mov"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to convert"))
            .stderr(predicate::str::contains("execution failed"));
    }

    #[test]
    #[serial]
    fn test_cli_convert_no_overwrite() {
        let temp = tempdir().unwrap();
        let args_file = temp.path().join("args.txt");
        let ffmpeg = common::fake_tool(
            temp.path(),
            "ffmpeg",
            &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
        );
        let config = common::write_config(temp.path(), &temp.path().join("ffprobe"), &ffmpeg, "");

        probekit_cmd()
            .args([
                "--config",
                config.to_str().unwrap(),
                "convert",
                "--no-overwrite",
                "target.mov",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Converted to target.mp4"));

        let args = fs::read_to_string(&args_file).unwrap();
        assert_eq!(args.lines().collect::<Vec<_>>(), ["-i", "target.mov", "target.mp4"]);
    }
}

//! Shared helpers for integration tests.
//!
//! Fake ffprobe/ffmpeg executables are shell scripts written into a temp
//! directory, plus a config file pointing the CLI at them.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// ffprobe JSON for a short two-stream MP4.
pub const PROBE_JSON: &str = r#"{
  "streams": [
    {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 640,
     "height": 360, "r_frame_rate": "30/1", "disposition": {"default": 1},
     "tags": {"language": "eng"}},
    {"index": 1, "codec_name": "aac", "codec_type": "audio", "channels": 2,
     "sample_rate": "48000", "disposition": {"default": 1}}
  ],
  "format": {"filename": "sample.mp4", "nb_streams": 2,
             "format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "62.500000",
             "size": "1048576", "bit_rate": "134217", "probe_score": 100}
}"#;

/// Write an executable shell script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A fake ffprobe that prints [`PROBE_JSON`].
#[cfg(unix)]
pub fn fake_ffprobe(dir: &Path) -> PathBuf {
    fake_tool(dir, "ffprobe", &format!("cat <<'JSON'\n{PROBE_JSON}\nJSON"))
}

/// Write a config file selecting the given tool paths.
pub fn write_config(dir: &Path, ffprobe: &Path, ffmpeg: &Path, extra: &str) -> PathBuf {
    let path = dir.join("probekit.toml");
    fs::write(
        &path,
        format!(
            "[tools]\nffprobe_path = {:?}\nffmpeg_path = {:?}\n{extra}\n",
            ffprobe.display().to_string(),
            ffmpeg.display().to_string()
        ),
    )
    .unwrap();
    path
}

use probekit_av::{ExtractFramesOptions, MediaTools, Mp4ConvertOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub frames: FramesConfig,

    #[serde(default)]
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    /// Path to the ffprobe executable (searched in PATH when unset)
    #[serde(default)]
    pub ffprobe_path: Option<PathBuf>,

    /// Path to the ffmpeg executable (searched in PATH when unset)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Seconds a tool may run before it is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: None,
            ffmpeg_path: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ToolsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the tool client, applying any configured paths.
    pub fn media_tools(&self) -> MediaTools {
        let mut tools = MediaTools::new();
        if let Some(ref path) = self.ffprobe_path {
            tools = tools.with_ffprobe(path);
        }
        if let Some(ref path) = self.ffmpeg_path {
            tools = tools.with_ffmpeg(path);
        }
        tools
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FramesConfig {
    /// Frame rate passed to ffmpeg's `-r`
    #[serde(default = "default_frame_rate")]
    pub frame_rate: String,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for FramesConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
            width: None,
            height: None,
            output_dir: None,
        }
    }
}

impl FramesConfig {
    pub fn options_for(&self, source: &Path) -> ExtractFramesOptions {
        ExtractFramesOptions {
            frame_rate: self.frame_rate.clone(),
            output_width: self.width,
            output_height: self.height,
            source: source.to_path_buf(),
            output_dir: self.output_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Replace an existing output file
    #[serde(default = "default_true")]
    pub overwrite: bool,

    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            output_dir: None,
        }
    }
}

impl ConvertConfig {
    pub fn options_for(&self, source: &Path) -> Mp4ConvertOptions {
        Mp4ConvertOptions {
            overwrite: self.overwrite,
            source: source.to_path_buf(),
            output_dir: self.output_dir.clone(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_frame_rate() -> String {
    ExtractFramesOptions::DEFAULT_FRAME_RATE.to_string()
}

fn default_true() -> bool {
    true
}

//! External tool paths and detection.
//!
//! [`MediaTools`] is the client every operation hangs off. It carries the
//! paths of the ffprobe and ffmpeg executables, so callers override them by
//! constructing a different client rather than mutating shared state.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default ffprobe executable name, resolved through `PATH`.
pub const FFPROBE: &str = "ffprobe";

/// Default ffmpeg executable name, resolved through `PATH`.
pub const FFMPEG: &str = "ffmpeg";

/// Handle to the ffprobe and ffmpeg executables.
///
/// # Example
///
/// ```no_run
/// use probekit_av::MediaTools;
/// use std::time::Duration;
///
/// # async fn example() -> probekit_av::Result<()> {
/// let tools = MediaTools::new().with_ffprobe("/opt/ffmpeg/bin/ffprobe");
/// let data = tools.probe("/path/to/video.mkv", Duration::from_secs(30)).await?;
/// println!("{} streams", data.streams.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTools {
    ffprobe: PathBuf,
    ffmpeg: PathBuf,
}

impl Default for MediaTools {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from(FFPROBE),
            ffmpeg: PathBuf::from(FFMPEG),
        }
    }
}

impl MediaTools {
    /// Tools resolved by bare name through `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific ffprobe executable.
    pub fn with_ffprobe(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe = path.into();
        self
    }

    /// Use a specific ffmpeg executable.
    pub fn with_ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = path.into();
        self
    }

    /// Path or name used to invoke ffprobe.
    pub fn ffprobe_path(&self) -> &Path {
        &self.ffprobe
    }

    /// Path or name used to invoke ffmpeg.
    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg
    }

    /// Check both tools and return availability information.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        vec![check_tool(&self.ffprobe), check_tool(&self.ffmpeg)]
    }
}

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// ffmpeg and ffprobe take `-version`; the first line of its output is
/// reported as the version.
pub fn check_tool(program: &Path) -> ToolInfo {
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string());

    let path = resolve(program);
    let version = path.as_deref().and_then(detect_version);

    ToolInfo {
        name,
        available: version.is_some(),
        version,
        path,
    }
}

/// Require that a tool is available, returning its resolved path.
///
/// # Errors
///
/// Returns [`Error::BinaryNotFound`] if the tool cannot be located.
pub fn require_tool(program: &Path) -> Result<PathBuf> {
    resolve(program).ok_or_else(|| Error::binary_not_found(program.to_string_lossy()))
}

fn resolve(program: &Path) -> Option<PathBuf> {
    // Anything with a directory component is used as-is, like the OS does.
    if program.components().count() > 1 {
        return program.is_file().then(|| program.to_path_buf());
    }
    which::which(program).ok()
}

fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}

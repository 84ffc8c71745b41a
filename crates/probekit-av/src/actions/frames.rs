//! Frame extraction into numbered image files.

use crate::command::ToolCommand;
use crate::context::ExecContext;
use crate::tools::MediaTools;
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Suffix ffmpeg expands into a zero-padded frame number plus extension.
const FRAME_SUFFIX: &str = "-%03d.jpeg";

/// Options for [`MediaTools::extract_frames`].
///
/// `Default` produces an unconfigured value; use
/// [`ExtractFramesOptions::for_source`] for the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractFramesOptions {
    /// Output frame rate, passed verbatim to ffmpeg's `-r` (e.g. "1", "0.5", "1/5").
    pub frame_rate: String,
    /// Output width. Resizing only applies when the height is also set.
    pub output_width: Option<u32>,
    /// Output height. Resizing only applies when the width is also set.
    pub output_height: Option<u32>,
    /// Media file to extract from.
    pub source: PathBuf,
    /// Directory for the images; the working directory when `None`.
    pub output_dir: Option<PathBuf>,
}

impl ExtractFramesOptions {
    /// Frame rate used by [`ExtractFramesOptions::for_source`].
    pub const DEFAULT_FRAME_RATE: &'static str = "1";

    /// One frame per second from `source`, at the source size.
    pub fn for_source(source: impl Into<PathBuf>) -> Self {
        Self {
            frame_rate: Self::DEFAULT_FRAME_RATE.to_string(),
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_frame_rate(mut self, frame_rate: impl Into<String>) -> Self {
        self.frame_rate = frame_rate.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.output_width = Some(width);
        self.output_height = Some(height);
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The `WxH` size argument, only when both dimensions are set.
    pub fn size_arg(&self) -> Option<String> {
        match (self.output_width, self.output_height) {
            (Some(w), Some(h)) => Some(format!("{w}x{h}")),
            _ => None,
        }
    }

    /// The image file pattern ffmpeg writes to, including `output_dir`.
    pub fn output_pattern(&self) -> PathBuf {
        let pattern = frame_output_pattern(&self.source);
        match &self.output_dir {
            Some(dir) => dir.join(pattern),
            None => pattern,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::NotConfigured {
                what: "frame extraction source",
            });
        }
        if self.frame_rate.is_empty() {
            return Err(Error::NotConfigured {
                what: "frame extraction rate",
            });
        }
        Ok(())
    }

    /// ffmpeg arguments: `-i <input> -r <rate> [-s WxH] -f image2 <pattern>`.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            self.source.clone().into(),
            "-r".into(),
            self.frame_rate.clone().into(),
        ];
        if let Some(size) = self.size_arg() {
            args.push("-s".into());
            args.push(size.into());
        }
        args.push("-f".into());
        args.push("image2".into());
        args.push(self.output_pattern().into());
        args
    }
}

/// Image pattern for frames of `path`: its base name without extension
/// followed by `-%03d.jpeg`, e.g. `videos/intro.mp4` becomes `intro-%03d.jpeg`.
pub fn frame_output_pattern(path: &Path) -> PathBuf {
    let mut name = super::base_name_without_ext(path);
    name.push(FRAME_SUFFIX);
    PathBuf::from(name)
}

impl MediaTools {
    /// Extract frames, killing ffmpeg if it runs longer than `timeout`.
    ///
    /// Returns the image file pattern. The individual files are not listed.
    pub async fn extract_frames(
        &self,
        options: &ExtractFramesOptions,
        timeout: Duration,
    ) -> Result<PathBuf> {
        let ctx = ExecContext::with_timeout(timeout);
        self.extract_frames_with_context(options, &ctx).await
    }

    /// Extract frames, killing ffmpeg if `ctx` fires first.
    pub async fn extract_frames_with_context(
        &self,
        options: &ExtractFramesOptions,
        ctx: &ExecContext,
    ) -> Result<PathBuf> {
        options.validate()?;

        let pattern = options.output_pattern();
        tracing::info!(
            "Extracting frames from {:?} at rate {} into {:?}",
            options.source,
            options.frame_rate,
            pattern
        );

        let mut cmd = ToolCommand::new(self.ffmpeg_path());
        cmd.args(options.to_args());
        cmd.execute(ctx).await?;

        Ok(pattern)
    }
}

//! Conversion of arbitrary media files to MP4.

use crate::command::ToolCommand;
use crate::context::ExecContext;
use crate::tools::MediaTools;
use crate::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Options for [`MediaTools::convert_to_mp4`].
///
/// `Default` produces an unconfigured value; use
/// [`Mp4ConvertOptions::for_source`] for the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mp4ConvertOptions {
    /// Pass `-y` so ffmpeg replaces an existing output file. When unset, an
    /// existing output is left to ffmpeg's own handling.
    pub overwrite: bool,
    /// Media file to convert.
    pub source: PathBuf,
    /// Directory for the output; the working directory when `None`.
    pub output_dir: Option<PathBuf>,
}

impl Mp4ConvertOptions {
    /// Convert `source`, overwriting any previous output.
    pub fn for_source(source: impl Into<PathBuf>) -> Self {
        Self {
            overwrite: true,
            source: source.into(),
            output_dir: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// The file ffmpeg writes to, including `output_dir`.
    pub fn output_path(&self) -> PathBuf {
        let file = mp4_output_path(&self.source);
        match &self.output_dir {
            Some(dir) => dir.join(file),
            None => file,
        }
    }

    /// ffmpeg arguments: `-i <input> <output> [-y]`.
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            self.source.clone().into(),
            self.output_path().into(),
        ];
        if self.overwrite {
            args.push("-y".into());
        }
        args
    }
}

/// Output file for converting `path`: its base name with the extension
/// replaced by `.mp4`, e.g. `videos/clip.mov` becomes `clip.mp4`.
pub fn mp4_output_path(path: &Path) -> PathBuf {
    let mut name = super::base_name_without_ext(path);
    name.push(".mp4");
    PathBuf::from(name)
}

impl MediaTools {
    /// Convert to MP4, killing ffmpeg if it runs longer than `timeout`.
    ///
    /// Returns the path of the written file.
    pub async fn convert_to_mp4(
        &self,
        options: &Mp4ConvertOptions,
        timeout: Duration,
    ) -> Result<PathBuf> {
        let ctx = ExecContext::with_timeout(timeout);
        self.convert_to_mp4_with_context(options, &ctx).await
    }

    /// Convert to MP4, killing ffmpeg if `ctx` fires first.
    pub async fn convert_to_mp4_with_context(
        &self,
        options: &Mp4ConvertOptions,
        ctx: &ExecContext,
    ) -> Result<PathBuf> {
        if options.source.as_os_str().is_empty() {
            return Err(Error::NotConfigured {
                what: "mp4 conversion source",
            });
        }

        let output = options.output_path();
        tracing::info!("Converting {:?} to {:?}", options.source, output);

        let mut cmd = ToolCommand::new(self.ffmpeg_path());
        cmd.args(options.to_args());
        cmd.execute(ctx).await?;

        Ok(output)
    }
}

//! FFprobe-based media probing.

use super::types::ProbeData;
use crate::command::{Capture, ToolCommand};
use crate::context::ExecContext;
use crate::tools::MediaTools;
use crate::{Error, Result};
use serde_json::Value;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// Quiet logging, JSON format and stream sections.
const QUIET_ARGS: &[&str] = &[
    "-v",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

/// Like [`QUIET_ARGS`] but keeps fatal errors on stderr so they can be reported.
const FATAL_ARGS: &[&str] = &[
    "-loglevel",
    "fatal",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

impl MediaTools {
    /// Probe a media file, killing ffprobe if it runs longer than `timeout`.
    pub async fn probe(&self, path: impl AsRef<Path>, timeout: Duration) -> Result<ProbeData> {
        let ctx = ExecContext::with_timeout(timeout);
        self.probe_with_context(path, &ctx).await
    }

    /// Probe a media file, killing ffprobe if `ctx` fires first.
    pub async fn probe_with_context(
        &self,
        path: impl AsRef<Path>,
        ctx: &ExecContext,
    ) -> Result<ProbeData> {
        let cmd = self.probe_command(path.as_ref());
        run_probe(&cmd, ctx).await
    }

    /// Probe a media file with extra ffprobe arguments placed before the path.
    ///
    /// Unlike [`MediaTools::probe_with_context`], fatal ffprobe errors are
    /// captured: any stderr output fails the call even on a zero exit.
    pub async fn probe_with_args<I, S>(
        &self,
        path: impl AsRef<Path>,
        extra_args: I,
        ctx: &ExecContext,
    ) -> Result<ProbeData>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let cmd = self.probe_command_with_args(path.as_ref(), extra_args);
        run_probe(&cmd, ctx).await
    }

    fn probe_command(&self, path: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.ffprobe_path());
        cmd.args(QUIET_ARGS).arg(path);
        cmd
    }

    fn probe_command_with_args<I, S>(&self, path: &Path, extra_args: I) -> ToolCommand
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = ToolCommand::new(self.ffprobe_path());
        cmd.args(FATAL_ARGS)
            .args(extra_args)
            .arg(path)
            .capture(Capture::StdoutAndStderr);
        cmd
    }
}

async fn run_probe(cmd: &ToolCommand, ctx: &ExecContext) -> Result<ProbeData> {
    let output = cmd.execute(ctx).await?;
    let data = decode_probe_output(&cmd.tool_name(), &output.stdout)?;

    tracing::debug!(
        streams = data.streams.len(),
        format = data.format.as_ref().map(|f| f.format_name.as_str()),
        "probe complete"
    );

    Ok(data)
}

/// Decode ffprobe JSON output.
///
/// On failure the error carries whatever part of the payload still decoded:
/// nothing if it was not JSON, otherwise the `format` section and each
/// stream that individually matched the expected shape.
pub fn decode_probe_output(tool: &str, bytes: &[u8]) -> Result<ProbeData> {
    serde_json::from_slice(bytes).map_err(|source| {
        tracing::warn!(tool, error = %source, "malformed probe output");
        Error::DecodeFailure {
            tool: tool.to_string(),
            source,
            partial: Box::new(salvage(bytes)),
        }
    })
}

fn salvage(bytes: &[u8]) -> ProbeData {
    let Ok(Value::Object(mut root)) = serde_json::from_slice::<Value>(bytes) else {
        return ProbeData::default();
    };

    let format = root
        .remove("format")
        .and_then(|v| serde_json::from_value(v).ok());

    let streams = match root.remove("streams") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect(),
        _ => Vec::new(),
    };

    ProbeData { format, streams }
}

//! Builder for executing external tool commands under an [`ExecContext`].
//!
//! [`ToolCommand::execute`] is the single place where a subprocess is
//! supervised: the process is started, its pipes are drained while it runs,
//! and its exit is raced against the context. If the context fires first the
//! process is killed and reaped before the call returns.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};

use crate::context::ExecContext;
use crate::{Error, Result};

/// Which output streams are captured from the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Capture {
    /// Capture stdout; stderr is discarded.
    #[default]
    Stdout,
    /// Capture both streams. Any stderr output fails the invocation, even on
    /// a zero exit status.
    StdoutAndStderr,
}

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output, byte for byte.
    pub stdout: Vec<u8>,
    /// Captured standard error. Always empty in [`Capture::Stdout`] mode.
    pub stderr: Vec<u8>,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use probekit_av::{ExecContext, ToolCommand};
/// use std::time::Duration;
///
/// # async fn example() -> probekit_av::Result<()> {
/// let ctx = ExecContext::with_timeout(Duration::from_secs(10));
/// let output = ToolCommand::new("ffprobe")
///     .args(["-v", "quiet", "-print_format", "json", "-show_format"])
///     .arg("/path/to/video.mkv")
///     .execute(&ctx)
///     .await?;
/// println!("{}", String::from_utf8_lossy(&output.stdout));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    capture: Capture,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture: Capture::default(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(s.as_ref().to_os_string());
        self
    }

    /// Append multiple arguments.
    pub fn args<I, S>(&mut self, iter: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(iter.into_iter().map(|s| s.as_ref().to_os_string()));
        self
    }

    /// Set which streams are captured.
    pub fn capture(&mut self, capture: Capture) -> &mut Self {
        self.capture = capture;
        self
    }

    /// The program that will be executed.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments collected so far.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Short tool name used in errors and logs.
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, racing its completion against `ctx`.
    ///
    /// # Errors
    ///
    /// - [`Error::BinaryNotFound`] if the executable does not exist.
    /// - [`Error::StartFailure`] if spawning fails for any other reason.
    /// - [`Error::Timeout`] if `ctx` fired first and the process was killed.
    /// - [`Error::KillFailure`] if `ctx` fired first and the kill failed.
    /// - [`Error::ExecutionFailure`] if the process exited non-zero, waiting
    ///   on it failed, or (with [`Capture::StdoutAndStderr`]) it wrote to stderr.
    pub async fn execute(&self, ctx: &ExecContext) -> Result<ToolOutput> {
        let tool = self.tool_name();

        tracing::debug!(
            tool = %tool,
            program = %self.program.display(),
            args = ?self.args,
            "spawning tool"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);

        match self.capture {
            Capture::Stdout => cmd.stderr(Stdio::null()),
            Capture::StdoutAndStderr => cmd.stderr(Stdio::piped()),
        };

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::binary_not_found(tool.clone())
            } else {
                Error::StartFailure {
                    tool: tool.clone(),
                    source: e,
                }
            }
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Completion wins ties so a process that finished right at the
        // deadline is not reported as a timeout.
        let completed = tokio::select! {
            biased;
            result = wait_with_pipes(&mut child, stdout, stderr) => Some(result),
            _ = ctx.done() => None,
        };

        let Some(result) = completed else {
            return match child.kill().await {
                Ok(()) => {
                    tracing::warn!(tool = %tool, "context fired, process killed");
                    Err(Error::Timeout { tool })
                }
                Err(source) => {
                    tracing::error!(tool = %tool, error = %source, "failed to kill process");
                    Err(Error::KillFailure { tool, source })
                }
            };
        };

        let (status, stdout, stderr) = result.map_err(|e| {
            Error::execution_failed(tool.clone(), format!("I/O error waiting for process: {e}"))
        })?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let message = if stderr.trim().is_empty() {
                format!("exited with {status}")
            } else {
                format!("exited with {status}: {}", stderr.trim())
            };
            tracing::debug!(tool = %tool, %status, "tool failed");
            return Err(Error::execution_failed(tool, message));
        }

        if self.capture == Capture::StdoutAndStderr && !stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(Error::execution_failed(
                tool,
                format!("error output: {}", stderr.trim()),
            ));
        }

        tracing::debug!(tool = %tool, bytes = stdout.len(), "tool finished");

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
        })
    }
}

async fn wait_with_pipes(
    child: &mut Child,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
) -> io::Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
    tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

//! Error types for probekit-av.

use crate::probe::ProbeData;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while supervising an external media tool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The executable could not be located.
    #[error("{tool} binary not found")]
    BinaryNotFound { tool: String },

    /// The process could not be launched for a reason other than a missing binary.
    #[error("failed to start {tool}: {source}")]
    StartFailure {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The context fired before the process finished and the process was killed.
    #[error("{tool} process timeout exceeded")]
    Timeout { tool: String },

    /// The context fired but killing the process failed; its state is unknown.
    #[error("failed to kill {tool} after timeout: {source}")]
    KillFailure {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully or reported errors on stderr.
    #[error("{tool} execution failed: {message}")]
    ExecutionFailure { tool: String, message: String },

    /// Output was captured but did not decode as the expected JSON shape.
    ///
    /// `partial` holds whatever could be recovered from the payload, which is
    /// empty when the payload was not JSON at all.
    #[error("failed to decode {tool} output: {source}")]
    DecodeFailure {
        tool: String,
        #[source]
        source: serde_json::Error,
        partial: Box<ProbeData>,
    },

    /// An operation was invoked with options that were never configured.
    #[error("{what} not configured")]
    NotConfigured { what: &'static str },
}

/// Classification of an [`Error`], for callers deciding whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BinaryNotFound,
    StartFailure,
    Timeout,
    KillFailure,
    ExecutionFailure,
    DecodeFailure,
    NotConfigured,
}

impl Error {
    /// Create a binary not found error.
    pub fn binary_not_found(tool: impl Into<String>) -> Self {
        Self::BinaryNotFound { tool: tool.into() }
    }

    /// Create an execution failure error.
    pub fn execution_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExecutionFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::BinaryNotFound { .. } => ErrorKind::BinaryNotFound,
            Error::StartFailure { .. } => ErrorKind::StartFailure,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::KillFailure { .. } => ErrorKind::KillFailure,
            Error::ExecutionFailure { .. } => ErrorKind::ExecutionFailure,
            Error::DecodeFailure { .. } => ErrorKind::DecodeFailure,
            Error::NotConfigured { .. } => ErrorKind::NotConfigured,
        }
    }

    /// Whether the process was killed because its context fired.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// The partially decoded probe result carried by a decode failure.
    pub fn partial_probe_data(&self) -> Option<&ProbeData> {
        match self {
            Error::DecodeFailure { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_display() {
        let err = Error::binary_not_found("ffprobe");
        assert_eq!(err.kind(), ErrorKind::BinaryNotFound);
        assert_eq!(err.to_string(), "ffprobe binary not found");

        let err = Error::Timeout {
            tool: "ffmpeg".to_string(),
        };
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "ffmpeg process timeout exceeded");

        let err = Error::NotConfigured {
            what: "frame extraction",
        };
        assert_eq!(err.kind(), ErrorKind::NotConfigured);
        assert!(err.partial_probe_data().is_none());
    }
}

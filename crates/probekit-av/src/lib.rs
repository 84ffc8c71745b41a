//! # probekit-av
//!
//! Supervised execution of ffprobe and ffmpeg.
//!
//! This crate provides functionality for:
//! - Probing media files into structured [`ProbeData`]
//! - Extracting frames into numbered image files
//! - Converting media files to MP4
//!
//! Every operation starts exactly one subprocess and races it against an
//! [`ExecContext`]. When the context fires first the process is killed and
//! the call fails with [`Error::Timeout`].
//!
//! ## Example
//!
//! ```no_run
//! use probekit_av::{ExtractFramesOptions, MediaTools};
//! use std::time::Duration;
//!
//! # async fn example() -> probekit_av::Result<()> {
//! let tools = MediaTools::new();
//!
//! let data = tools.probe("/path/to/intro.mp4", Duration::from_secs(30)).await?;
//! if let Some(video) = data.first_video_stream() {
//!     println!("{:?} {:?}x{:?}", video.codec_name, video.width, video.height);
//! }
//!
//! let options = ExtractFramesOptions::for_source("/path/to/intro.mp4").with_size(640, 320);
//! let pattern = tools.extract_frames(&options, Duration::from_secs(120)).await?;
//! println!("frames written to {}", pattern.display());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod actions;
pub mod command;
pub mod context;
pub mod probe;
pub mod tools;

// Re-exports
pub use actions::{frame_output_pattern, mp4_output_path, ExtractFramesOptions, Mp4ConvertOptions};
pub use command::{Capture, ToolCommand, ToolOutput};
pub use context::ExecContext;
pub use error::{Error, ErrorKind, Result};
pub use probe::{Disposition, Format, ProbeData, Stream, StreamType};
pub use tools::{check_tool, require_tool, MediaTools, ToolInfo};
pub use tokio_util::sync::CancellationToken;

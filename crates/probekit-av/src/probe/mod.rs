//! Media file probing.
//!
//! Runs ffprobe under an [`ExecContext`](crate::ExecContext) and decodes its
//! JSON report into [`ProbeData`].

mod ffprobe;
mod types;

pub use ffprobe::decode_probe_output;
pub use types::*;

//! Media processing actions run through ffmpeg.
//!
//! - Frame extraction into numbered JPEG images
//! - Conversion to a single MP4 file

mod convert;
mod frames;

use std::ffi::{OsStr, OsString};
use std::path::Path;

pub use convert::{mp4_output_path, Mp4ConvertOptions};
pub use frames::{frame_output_pattern, ExtractFramesOptions};

/// Last path element with everything from its final `.` removed.
///
/// A leading dot counts as an extension separator too, so `.hidden` yields an
/// empty name and `..` yields `.`. An empty path is treated as `.`.
pub(crate) fn base_name_without_ext(path: &Path) -> OsString {
    let base = path
        .components()
        .next_back()
        .map_or(OsStr::new("."), |c| c.as_os_str());
    match base.to_str() {
        Some(name) => OsString::from(name.rfind('.').map_or(name, |dot| &name[..dot])),
        None => Path::new(base).file_stem().unwrap_or(base).to_os_string(),
    }
}

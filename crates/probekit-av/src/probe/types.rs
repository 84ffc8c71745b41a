//! ffprobe result types.
//!
//! These mirror the JSON emitted by `ffprobe -print_format json -show_format
//! -show_streams`. Unknown fields are ignored and missing fields default.
//! Values ffprobe prints as JSON strings (durations, sizes, rates) are kept
//! verbatim; the accessor methods parse them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Result of probing a media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeData {
    /// Container-level metadata.
    pub format: Option<Format>,
    /// Stream descriptors, in file order.
    pub streams: Vec<Stream>,
}

/// Container-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Format {
    pub filename: String,
    pub nb_streams: u32,
    pub nb_programs: u32,
    /// Comma separated demuxer names (e.g. "mov,mp4,m4a,3gp,3g2,mj2").
    pub format_name: String,
    pub format_long_name: String,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub size: Option<String>,
    pub bit_rate: Option<String>,
    pub probe_score: i32,
    pub tags: BTreeMap<String, String>,
}

/// Kind of a stream, from ffprobe's `codec_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A single stream descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stream {
    pub index: u32,
    pub codec_name: Option<String>,
    pub codec_long_name: Option<String>,
    pub profile: Option<String>,
    pub codec_type: StreamType,
    pub codec_tag_string: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub coded_width: Option<u32>,
    pub coded_height: Option<u32>,
    pub pix_fmt: Option<String>,
    pub level: Option<i32>,
    pub sample_fmt: Option<String>,
    pub sample_rate: Option<String>,
    pub channels: Option<u32>,
    pub channel_layout: Option<String>,
    pub r_frame_rate: Option<String>,
    pub avg_frame_rate: Option<String>,
    pub time_base: Option<String>,
    pub start_time: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
    pub nb_frames: Option<String>,
    pub disposition: Disposition,
    pub tags: BTreeMap<String, String>,
}

/// Stream disposition flags. ffprobe reports each as 0 or 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Disposition {
    pub default: u8,
    pub dub: u8,
    pub original: u8,
    pub comment: u8,
    pub lyrics: u8,
    pub karaoke: u8,
    pub forced: u8,
    pub hearing_impaired: u8,
    pub visual_impaired: u8,
    pub clean_effects: u8,
    pub attached_pic: u8,
}

impl ProbeData {
    /// Streams of the given kind, in file order.
    pub fn streams_of(&self, kind: StreamType) -> impl Iterator<Item = &Stream> {
        self.streams.iter().filter(move |s| s.codec_type == kind)
    }

    /// First video stream, if any.
    pub fn first_video_stream(&self) -> Option<&Stream> {
        self.streams_of(StreamType::Video).next()
    }

    /// First audio stream, if any.
    pub fn first_audio_stream(&self) -> Option<&Stream> {
        self.streams_of(StreamType::Audio).next()
    }

    /// First subtitle stream, if any.
    pub fn first_subtitle_stream(&self) -> Option<&Stream> {
        self.streams_of(StreamType::Subtitle).next()
    }

    /// Whether nothing at all was decoded.
    pub fn is_empty(&self) -> bool {
        self.format.is_none() && self.streams.is_empty()
    }
}

impl Format {
    /// Container duration.
    pub fn duration(&self) -> Option<Duration> {
        parse_seconds(self.duration.as_deref()?)
    }

    /// Start time of the container.
    pub fn start_time(&self) -> Option<Duration> {
        parse_seconds(self.start_time.as_deref()?)
    }

    /// File size in bytes.
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref()?.parse().ok()
    }

    /// Overall bit rate in bits per second.
    pub fn bit_rate_bps(&self) -> Option<u64> {
        self.bit_rate.as_deref()?.parse().ok()
    }

    /// Look up a tag, ignoring key case.
    pub fn tag(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name)
    }
}

impl Stream {
    /// Real base frame rate in frames per second.
    pub fn frame_rate(&self) -> Option<f64> {
        parse_frame_rate(self.r_frame_rate.as_deref()?)
    }

    /// Average frame rate in frames per second.
    pub fn avg_frame_rate(&self) -> Option<f64> {
        parse_frame_rate(self.avg_frame_rate.as_deref()?)
    }

    /// Stream duration.
    pub fn duration(&self) -> Option<Duration> {
        parse_seconds(self.duration.as_deref()?)
    }

    /// Stream bit rate in bits per second.
    pub fn bit_rate_bps(&self) -> Option<u64> {
        self.bit_rate.as_deref()?.parse().ok()
    }

    /// Audio sample rate in Hz.
    pub fn sample_rate_hz(&self) -> Option<u32> {
        self.sample_rate.as_deref()?.parse().ok()
    }

    /// Look up a tag, ignoring key case.
    pub fn tag(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name)
    }

    /// Language tag, if present.
    pub fn language(&self) -> Option<&str> {
        self.tag("language")
    }

    pub fn is_default(&self) -> bool {
        self.disposition.default == 1
    }

    pub fn is_forced(&self) -> bool {
        self.disposition.forced == 1
    }
}

fn find_tag<'a>(tags: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    tags.get(name)
        .or_else(|| {
            tags.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
        .map(String::as_str)
}

fn parse_seconds(s: &str) -> Option<Duration> {
    let secs: f64 = s.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Parse an ffprobe rate such as "24000/1001" or "25".
pub(crate) fn parse_frame_rate(rate_str: &str) -> Option<f64> {
    if let Some((num, den)) = rate_str.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        return (den != 0.0).then(|| num / den);
    }
    rate_str.parse().ok()
}

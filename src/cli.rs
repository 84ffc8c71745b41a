use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "probekit")]
#[command(author, version, about = "Probe, extract frames from and convert media files")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Kill the tool after this many seconds (overrides the config file)
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Probe a media file and display format and stream information
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Extra ffprobe arguments, placed before the file (after `--`)
        #[arg(last = true)]
        extra: Vec<String>,
    },

    /// Extract frames into numbered JPEG images
    Frames {
        /// Input media file
        #[arg(required = true)]
        file: PathBuf,

        /// Frames per second to extract (e.g. 1, 0.5, 1/5)
        #[arg(short, long)]
        rate: Option<String>,

        /// Output width in pixels (needs --height)
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels (needs --width)
        #[arg(long)]
        height: Option<u32>,

        /// Directory to write images to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Convert a media file to MP4
    Convert {
        /// Input media file
        #[arg(required = true)]
        file: PathBuf,

        /// Leave an existing output file to ffmpeg instead of passing -y
        #[arg(long)]
        no_overwrite: bool,

        /// Directory to write the MP4 to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Check that ffprobe and ffmpeg are available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        #[arg(value_name = "CONFIG")]
        file: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

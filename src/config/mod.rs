mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default config file locations, searched in order
const DEFAULT_PATHS: &[&str] = &[
    "./probekit.toml",
    "~/.config/probekit/config.toml",
    "/etc/probekit/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config = parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    expand_paths(&mut config);

    Ok(config)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    for path_str in DEFAULT_PATHS {
        let path = expand(Path::new(path_str));
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(&path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.tools.timeout_secs == 0 {
        anyhow::bail!("tools.timeout_secs must be greater than 0");
    }

    if config.frames.frame_rate.trim().is_empty() {
        anyhow::bail!("frames.frame_rate cannot be empty");
    }

    if config.frames.width == Some(0) || config.frames.height == Some(0) {
        anyhow::bail!("frames.width and frames.height must be greater than 0");
    }

    // Resizing needs both dimensions; a lone one is accepted but has no effect.
    if config.frames.width.is_some() != config.frames.height.is_some() {
        tracing::warn!("Only one of frames.width/frames.height is set; frames will not be resized");
    }

    for path in [&config.tools.ffprobe_path, &config.tools.ffmpeg_path]
        .into_iter()
        .flatten()
    {
        if path.as_os_str().is_empty() {
            anyhow::bail!("Tool paths cannot be empty");
        }
    }

    Ok(())
}

fn expand_paths(config: &mut Config) {
    for path in [
        &mut config.tools.ffprobe_path,
        &mut config.tools.ffmpeg_path,
        &mut config.frames.output_dir,
        &mut config.convert.output_dir,
    ]
    .into_iter()
    .flatten()
    {
        *path = expand(path);
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

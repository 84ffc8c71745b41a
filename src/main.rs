mod cli;

use probekit::config::{self, Config};
use probekit_av::{ExecContext, MediaTools, ProbeData, StreamType};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "probekit=trace,probekit_av=debug".to_string()
        } else {
            "probekit=info,probekit_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Probe { file, json, extra } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let timeout = timeout_for(&config, cli.timeout);
            run_async(|shutdown| probe_file(&config, &file, json, &extra, timeout, shutdown))
        }
        Commands::Frames {
            file,
            rate,
            width,
            height,
            output_dir,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if let Some(rate) = rate {
                config.frames.frame_rate = rate;
            }
            if width.is_some() {
                config.frames.width = width;
            }
            if height.is_some() {
                config.frames.height = height;
            }
            if output_dir.is_some() {
                config.frames.output_dir = output_dir;
            }
            let timeout = timeout_for(&config, cli.timeout);
            run_async(|shutdown| extract_frames(&config, &file, timeout, shutdown))
        }
        Commands::Convert {
            file,
            no_overwrite,
            output_dir,
        } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            if no_overwrite {
                config.convert.overwrite = false;
            }
            if output_dir.is_some() {
                config.convert.output_dir = output_dir;
            }
            let timeout = timeout_for(&config, cli.timeout);
            run_async(|shutdown| convert_file(&config, &file, timeout, shutdown))
        }
        Commands::CheckTools => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            check_tools(&config.tools.media_tools())
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("probekit {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn timeout_for(config: &Config, cli_timeout: Option<u64>) -> Duration {
    cli_timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.tools.timeout())
}

/// Run a command on a fresh runtime with Ctrl-C wired to cancellation.
fn run_async<F>(command: impl FnOnce(ExecContext) -> F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>>,
{
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let shutdown = ExecContext::new();
        let on_signal = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping tool");
                on_signal.cancel();
            }
        });
        command(shutdown).await
    })
}

async fn probe_file(
    config: &Config,
    file: &Path,
    json: bool,
    extra: &[String],
    timeout: Duration,
    shutdown: ExecContext,
) -> Result<()> {
    let tools = config.tools.media_tools();
    let ctx = shutdown.child_with_timeout(timeout);

    tracing::debug!("Probing {:?} with {:?}", file, tools.ffprobe_path());
    let data = if extra.is_empty() {
        tools.probe_with_context(file, &ctx).await
    } else {
        tools.probe_with_args(file, extra, &ctx).await
    }
    .with_context(|| format!("Failed to probe {:?}", file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        print_probe(&data);
    }
    Ok(())
}

fn print_probe(data: &ProbeData) {
    if let Some(ref format) = data.format {
        println!("File: {}", format.filename);
        println!("Container: {}", format.format_name);
        if let Some(size) = format.size_bytes() {
            println!("Size: {} bytes", size);
        }
        if let Some(duration) = format.duration() {
            let secs = duration.as_secs();
            let mins = secs / 60;
            let hours = mins / 60;
            println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
        }
        if let Some(bit_rate) = format.bit_rate_bps() {
            println!("Bit rate: {} kb/s", bit_rate / 1000);
        }
    }

    println!("\nStreams: {}", data.streams.len());
    for stream in &data.streams {
        let codec = stream.codec_name.as_deref().unwrap_or("unknown");
        print!("  [{}] {:?} {}", stream.index, stream.codec_type, codec);
        match stream.codec_type {
            StreamType::Video => {
                if let (Some(w), Some(h)) = (stream.width, stream.height) {
                    print!(" {}x{}", w, h);
                }
                if let Some(fps) = stream.frame_rate() {
                    print!(" {:.3} fps", fps);
                }
            }
            StreamType::Audio => {
                if let Some(channels) = stream.channels {
                    print!(" {}ch", channels);
                }
                if let Some(rate) = stream.sample_rate_hz() {
                    print!(" {} Hz", rate);
                }
            }
            _ => {}
        }
        if let Some(lang) = stream.language() {
            print!(" ({})", lang);
        }
        if stream.is_default() {
            print!(" [default]");
        }
        if stream.is_forced() {
            print!(" [forced]");
        }
        println!();
    }
}

async fn extract_frames(
    config: &Config,
    file: &Path,
    timeout: Duration,
    shutdown: ExecContext,
) -> Result<()> {
    let tools = config.tools.media_tools();
    let options = config.frames.options_for(file);

    if let Some(ref dir) = options.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    let ctx = shutdown.child_with_timeout(timeout);
    let pattern = tools
        .extract_frames_with_context(&options, &ctx)
        .await
        .with_context(|| format!("Failed to extract frames from {:?}", file))?;

    println!("Frames written to {}", pattern.display());
    Ok(())
}

async fn convert_file(
    config: &Config,
    file: &Path,
    timeout: Duration,
    shutdown: ExecContext,
) -> Result<()> {
    let tools = config.tools.media_tools();
    let options = config.convert.options_for(file);

    if let Some(ref dir) = options.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;
    }

    let ctx = shutdown.child_with_timeout(timeout);
    let output = tools
        .convert_to_mp4_with_context(&options, &ctx)
        .await
        .with_context(|| format!("Failed to convert {:?}", file))?;

    println!("Converted to {}", output.display());
    Ok(())
}

fn check_tools(tools: &MediaTools) -> Result<()> {
    println!("Checking external tools...\n");

    let mut all_ok = true;

    for tool in tools.check_all() {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            print_config(&Config::default());
        }
    }

    Ok(())
}

fn print_config(config: &Config) {
    let tools = config.tools.media_tools();
    println!("  ffprobe: {}", tools.ffprobe_path().display());
    println!("  ffmpeg: {}", tools.ffmpeg_path().display());
    println!("  Timeout: {}s", config.tools.timeout_secs);
    println!("  Frame rate: {}", config.frames.frame_rate);
    if let (Some(w), Some(h)) = (config.frames.width, config.frames.height) {
        println!("  Frame size: {}x{}", w, h);
    }
    println!("  Overwrite: {}", config.convert.overwrite);
}

//! quakemap - The live earthquake feed as an interactive web map.
//!
//! Fetches a GeoJSON earthquake feed, colors each event by depth, sizes it by
//! magnitude, and renders a Leaflet map with a depth legend and switchable
//! base layers.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

mod cli;
mod client;
mod depth;
mod errors;
mod legend;
mod map;
mod models;
mod output;
mod pipeline;
mod server;
mod style;

use cli::{Cli, Command};
use client::FeedSource;
use depth::DepthScale;
use output::Format;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Render(args) => cmd_render(&args),
        Command::Serve(args) => cmd_serve(args),
        Command::Legend(args) => cmd_legend(&args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the `render` command - one fetch, one map.
fn cmd_render(args: &cli::RenderArgs) -> Result<()> {
    render(&args.source.source(), args.output.as_deref(), args.format)
}

/// Fetch `source` and write the map to `out_path`, or stdout when `None`.
///
/// The output file is only created once the fetch has succeeded, so a failed
/// fetch leaves nothing behind.
fn render(source: &FeedSource, out_path: Option<&Path>, format: Format) -> Result<()> {
    info!("rendering earthquakes from {}", source);

    let features = pipeline::fetch_features(source).context("failed to fetch earthquake feed")?;

    let map = pipeline::compose(&features, &DepthScale::USGS);
    if let Some(base) = map.active_base_layer() {
        info!("{} markers over the {} layer", map.overlay.len(), base.name);
    }

    match out_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            output::write_map(&mut writer, &map, format)?;
            writer.flush()?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            output::write_map(&mut handle, &map, format)?;
        }
    }

    Ok(())
}

/// Execute the `serve` command - start web server.
fn cmd_serve(args: cli::ServeArgs) -> Result<()> {
    let config = server::ServerConfig {
        port: args.port,
        host: args.host.clone(),
        source: args.source.source(),
    };

    // Print startup message
    let url = format!("http://{}:{}", args.host, args.port);
    println!("\x1b[1m🌍 quakemap\x1b[0m");
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("  Local:   \x1b[96m{url}\x1b[0m");
    println!("  Feed:    {}", config.source);
    println!("\x1b[2m───────────────────────────────────────\x1b[0m");
    println!("\x1b[2mPress Ctrl+C to stop\x1b[0m\n");

    // Open browser if requested (using xdg-open/open command)
    if args.open {
        #[cfg(target_os = "linux")]
        let _ = std::process::Command::new("xdg-open").arg(&url).spawn();
        #[cfg(target_os = "macos")]
        let _ = std::process::Command::new("open").arg(&url).spawn();
        #[cfg(target_os = "windows")]
        let _ = std::process::Command::new("cmd").args(["/c", "start", &url]).spawn();
    }

    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(server::run_server(config))
}

/// Execute the `legend` command - print the depth key.
fn cmd_legend(args: &cli::LegendArgs) -> Result<()> {
    let legend = legend::build_legend(&DepthScale::USGS);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_legend(&mut handle, &legend, args.format)?;

    Ok(())
}

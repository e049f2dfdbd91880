//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::client::{FeedSource, FeedType};
use crate::output::Format;

/// Render the live earthquake feed as an interactive web map.
#[derive(Parser, Debug)]
#[command(name = "quakemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the feed once and write the map
    Render(RenderArgs),

    /// Serve the map over HTTP, fetching on every page load
    Serve(ServeArgs),

    /// Print the depth legend
    Legend(LegendArgs),
}

/// Where to fetch features from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// USGS summary feed to fetch
    #[arg(
        long,
        default_value_t = FeedType::ALL_WEEK,
        value_parser = parse_feed_type,
        conflicts_with = "url"
    )]
    pub feed: FeedType,

    /// Fetch a GeoJSON feature collection from this URL instead
    #[arg(long)]
    pub url: Option<String>,
}

impl SourceArgs {
    /// Resolve to the source passed into the fetch stage.
    #[must_use]
    pub fn source(&self) -> FeedSource {
        match &self.url {
            Some(url) => FeedSource::Url(url.clone()),
            None => FeedSource::Summary(self.feed),
        }
    }
}

/// Arguments for the `render` command.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// File to write (stdout if omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "html", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8080")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

/// Arguments for the `legend` command.
#[derive(Parser, Debug)]
pub struct LegendArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse a feed type from string.
fn parse_feed_type(s: &str) -> Result<FeedType, String> {
    s.parse()
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}

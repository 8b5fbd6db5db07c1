//! CLI module - Command-line interface for Marquee
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Args, Parser, Subcommand};

use crate::models::MediaType;

/// Marquee - movie search aggregation gateway
/// Fans one query out to OMDb and TMDB and merges the answers
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API until Ctrl+C (default)
    #[command(alias = "daemon")]
    Serve,

    /// Run one aggregated search and print the page
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Show which providers are configured
    Health,

    /// Create default config file
    Init,
}

impl Commands {
    /// `health` and `init` must work even when the loaded config is invalid.
    #[must_use]
    pub const fn needs_valid_config(&self) -> bool {
        matches!(self, Self::Serve | Self::Search(_))
    }
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Title to search for
    #[arg(long, short)]
    pub title: Option<String>,

    /// Comma separated actor names
    #[arg(long, short, value_delimiter = ',')]
    pub actors: Vec<String>,

    /// movie, series or episode
    #[arg(long = "type")]
    pub media_type: Option<MediaType>,

    #[arg(long, short)]
    pub genre: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Results per page (defaults to the configured page size)
    #[arg(long, short)]
    pub limit: Option<u32>,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

pub use commands::*;

//! CLI argument definitions using clap derive macros.
//!
//! Every flag is optional: with no arguments the full default scrape runs.

use std::path::PathBuf;

use clap::Parser;

/// Build a JSON catalog of downloadable homebrew from an archive.org collection.
///
/// Lists every item in the collection, fetches each item's metadata, and keeps
/// the items that ship a .zip, .rar, .7z or .pbp file.
#[derive(Parser, Debug)]
#[command(name = "homebrew-catalog")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output JSON file [default: psp_homebrew_library.json]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Archive collection to catalog [default: psp-homebrew-library]
    #[arg(long)]
    pub collection: Option<String>,

    /// Archive root URL [default: https://archive.org]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Pause after each item request in milliseconds (0 to disable, max 60000) [default: 500]
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub delay_ms: Option<u64>,

    /// Per-request timeout in seconds (1-3600) [default: 30]
    #[arg(short = 't', long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout_secs: Option<u64>,

    /// Rows requested per search page (1-10000) [default: 10000]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10000))]
    pub rows: Option<u32>,

    /// Maximum search pages to request (1-1000) [default: 10]
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub max_pages: Option<u32>,

    /// Read settings from this file instead of the default config path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Default tracing filter from the verbosity flags.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

//! Command-line interface for streambrowse
//!
//! Flags overlay the config file; the TUI is the only mode, apart from
//! `--list-providers` which prints and exits.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Terminal browser for streaming-media listings
#[derive(Parser, Debug)]
#[command(name = "streambrowse", version, about)]
pub struct Cli {
    /// Provider to open at startup
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Maximum rows a provider materializes per query
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Directory the files provider scans for media
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Destination directory for downloads
    #[arg(long)]
    pub download_dir: Option<PathBuf>,

    /// List registered providers and exit
    #[arg(long)]
    pub list_providers: bool,

    /// Append logs to this file (level via RUST_LOG, default info)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay CLI flags onto the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(limit) = self.limit {
            config.listing_limit = Some(limit);
        }
        if let Some(dir) = &self.media_dir {
            config.media_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = Some(dir.clone());
        }
    }
}

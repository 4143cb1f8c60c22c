//! Command-line interface definitions.
//!
//! Global options pick the config file and the target store; subcommands
//! either run the watcher or manage the tracked targets. Flags given here
//! override the values loaded from the config file.

use crate::config::{Config, SentimentSource};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Watch web pages for keywords and alert on new matching articles.
///
/// # Examples
///
/// ```sh
/// perseus_watch add --url https://example.com --keyword launch
/// perseus_watch --config perseus.yaml run --interval 600
/// perseus_watch once
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "PERSEUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target store file (overrides `store_path` from the config)
    #[arg(short, long, env = "PERSEUS_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check all targets on a fixed interval until interrupted
    Run {
        /// Seconds between checks
        #[arg(long)]
        interval: Option<u64>,

        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Check all targets once, print a summary and exit
    Once {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Start tracking a page for a keyword
    Add {
        #[arg(long)]
        url: String,
        #[arg(long)]
        keyword: String,
    },
    /// List tracked targets
    List,
    /// Change a target's page and keyword (resets its alert history)
    Update {
        id: u64,
        #[arg(long)]
        url: String,
        #[arg(long)]
        keyword: String,
    },
    /// Stop tracking a target
    Remove { id: u64 },
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Maximum number of pages checked at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Text scored for sentiment
    #[arg(long, value_enum)]
    pub sentiment_source: Option<SentimentSource>,
}

impl Cli {
    /// Apply command-line overrides on top of file configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(store) = &self.store {
            config.store_path = store.clone();
        }
        let scan = match &self.command {
            Command::Run { interval, scan } => {
                if let Some(secs) = interval {
                    config.interval_secs = *secs;
                }
                scan
            }
            Command::Once { scan } => scan,
            _ => return,
        };
        if let Some(n) = scan.concurrency {
            config.concurrency = n;
        }
        if let Some(source) = scan.sentiment_source {
            config.sentiment_source = source;
        }
    }
}

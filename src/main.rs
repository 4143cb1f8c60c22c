//! # Perseus Watch
//!
//! Watches a set of web pages for keywords and sends an alert the first
//! time a new matching article shows up on a page, never twice for the same
//! article.
//!
//! ## Usage
//!
//! ```sh
//! perseus_watch add --url https://example.com/news --keyword launch
//! perseus_watch run
//! ```
//!
//! ## Architecture
//!
//! Every tick the scheduler runs one pipeline per tracked target:
//! 1. **Fetch**: download the page (bounded timeout, no retry within a tick)
//! 2. **Match**: first `h1`/`h2`/`a` whose text contains the keyword
//! 3. **Classify**: lexicon sentiment of the matched text
//! 4. **Gate**: compare the normalized link with the last alerted article
//! 5. **Notify + persist**: send the alert, then record the article

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod notify;
mod scan;
mod scheduler;
mod store;
mod utils;

use cli::{Cli, Command};
use config::Config;
use notify::AlertChannel;
use notify::retry::RetryNotifier;
use scan::fetch::HttpFetcher;
use scan::matcher::KeywordMatcher;
use scheduler::Scheduler;
use store::TargetStore;
use store::json::JsonFileStore;
use utils::ensure_parent_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        error!(error = %e, "Refusing to start with invalid configuration");
        return Err(e.into());
    }

    ensure_parent_dir(&config.store_path).await?;
    let store = JsonFileStore::open(&config.store_path).await?;

    match args.command {
        Command::Add { url, keyword } => {
            let target = store.add_target(&url, &keyword).await?;
            info!(id = target.id, url = %target.url, keyword = %target.keyword, "Target added");
            println!("{}\t{}\t{}", target.id, target.url, target.keyword);
        }
        Command::List => {
            for target in store.list_targets().await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    target.id,
                    target.url,
                    target.keyword,
                    target.last_notified_article.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Update { id, url, keyword } => {
            let target = store.edit_target(id, &url, &keyword).await?;
            info!(id = target.id, url = %target.url, keyword = %target.keyword, "Target updated");
        }
        Command::Remove { id } => {
            store.remove_target(id).await?;
            info!(id, "Target removed");
        }
        Command::Once { .. } => {
            let scheduler = build_scheduler(&config, store)?;
            let report = scheduler.run_tick().await;
            println!("{report}");
        }
        Command::Run { .. } => {
            let scheduler = build_scheduler(&config, store)?;
            scheduler
                .run(Duration::from_secs(config.interval_secs), shutdown_signal())
                .await;
        }
    }

    Ok(())
}

type Watcher = Scheduler<JsonFileStore, HttpFetcher, RetryNotifier<AlertChannel>>;

/// Wire the scheduler's collaborators from configuration.
fn build_scheduler(config: &Config, store: JsonFileStore) -> Result<Watcher, Box<dyn Error>> {
    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    let fetcher = HttpFetcher::new(timeout, &config.user_agent)?;
    let channel = AlertChannel::from_config(&config.notifier, timeout)?;
    let notifier = RetryNotifier::new(channel, config.notify_retries, Duration::from_secs(1));
    let matcher = KeywordMatcher::new(config.sentiment_source)?;
    info!(
        store = %store.path().display(),
        notifier = ?config.notifier,
        sentiment_source = ?config.sentiment_source,
        "Scheduler configured"
    );
    Ok(Scheduler::new(store, fetcher, notifier, matcher, config.concurrency))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Could not listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}

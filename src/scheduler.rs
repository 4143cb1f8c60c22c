//! Periodic scan of every tracked target.
//!
//! A tick lists the targets, then runs the per-target pipeline
//! (fetch → match → classify → gate → notify → persist) for all of them,
//! at most `concurrency` at a time. Failures are logged and counted per
//! target; none of them stops the tick or the scheduler.
//!
//! Ticks never overlap: [`Scheduler::run`] awaits each tick to completion
//! before waiting for the next one, and ticks whose time passed while the
//! previous one was still running are skipped. Together with listing each
//! target once per tick, this means no two pipelines ever read-modify-write
//! the same target's notification state concurrently.

use crate::error::ScanError;
use crate::models::{ScanOutcome, Target};
use crate::notify::{Alert, Notifier};
use crate::scan::fetch::Fetcher;
use crate::scan::matcher::KeywordMatcher;
use crate::scan::{gate, sentiment};
use crate::store::TargetStore;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

/// How one target fared in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResult {
    NoMatch,
    AlreadyNotified,
    Notified,
    FetchFailed,
    ParseFailed,
    NotifyFailed,
    /// The alert went out but its state could not be recorded.
    StoreFailed,
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scanned: usize,
    pub no_match: usize,
    pub already_notified: usize,
    pub notified: usize,
    pub fetch_failed: usize,
    pub parse_failed: usize,
    pub notify_failed: usize,
    pub store_failed: usize,
}

impl TickReport {
    fn record(&mut self, result: TargetResult) {
        self.scanned += 1;
        match result {
            TargetResult::NoMatch => self.no_match += 1,
            TargetResult::AlreadyNotified => self.already_notified += 1,
            TargetResult::Notified => self.notified += 1,
            TargetResult::FetchFailed => self.fetch_failed += 1,
            TargetResult::ParseFailed => self.parse_failed += 1,
            TargetResult::NotifyFailed => self.notify_failed += 1,
            TargetResult::StoreFailed => self.store_failed += 1,
        }
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scanned={} notified={} already_notified={} no_match={} fetch_failed={} parse_failed={} notify_failed={} store_failed={}",
            self.scanned,
            self.notified,
            self.already_notified,
            self.no_match,
            self.fetch_failed,
            self.parse_failed,
            self.notify_failed,
            self.store_failed
        )
    }
}

/// Runs the scan pipeline over all targets of a store.
pub struct Scheduler<S, F, N> {
    store: S,
    fetcher: F,
    notifier: N,
    matcher: KeywordMatcher,
    concurrency: usize,
}

impl<S, F, N> Scheduler<S, F, N>
where
    S: TargetStore,
    F: Fetcher,
    N: Notifier,
{
    pub fn new(
        store: S,
        fetcher: F,
        notifier: N,
        matcher: KeywordMatcher,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            fetcher,
            notifier,
            matcher,
            concurrency: concurrency.max(1),
        }
    }

    /// Run ticks every `every` until `shutdown` resolves.
    ///
    /// The first tick starts immediately. A tick in progress when
    /// `shutdown` resolves is finished before returning.
    pub async fn run(&self, every: Duration, shutdown: impl Future<Output = ()>) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(interval_secs = every.as_secs(), concurrency = self.concurrency, "Scheduler started");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested; scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_tick().await;
                }
            }
        }
    }

    /// Scan every target once.
    #[instrument(level = "info", skip_all)]
    pub async fn run_tick(&self) -> TickReport {
        let t0 = Instant::now();
        let targets = match self.store.list_targets().await {
            Ok(targets) => targets,
            Err(e) => {
                error!(error = %e, "Could not list targets; skipping this tick");
                return TickReport::default();
            }
        };
        let targets: Vec<Target> = targets.into_iter().unique_by(|t| t.id).collect();
        info!(targets = targets.len(), "Tick started");

        let results: Vec<TargetResult> = stream::iter(targets)
            .map(|target| self.process(target))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = TickReport::default();
        for result in results {
            report.record(result);
        }

        info!(
            elapsed_ms = t0.elapsed().as_millis(),
            scanned = report.scanned,
            notified = report.notified,
            already_notified = report.already_notified,
            no_match = report.no_match,
            fetch_failed = report.fetch_failed,
            parse_failed = report.parse_failed,
            notify_failed = report.notify_failed,
            store_failed = report.store_failed,
            "Tick complete"
        );
        report
    }

    /// Fetch, match, classify and gate one target. No side effects besides
    /// the fetch.
    pub async fn scan(&self, target: &Target) -> Result<ScanOutcome, ScanError> {
        let content = self.fetcher.fetch(&target.url).await?;
        let Some(found) = self
            .matcher
            .find_first(&content, &target.url, &target.keyword)?
        else {
            return Ok(ScanOutcome::NoMatch);
        };
        let sentiment = sentiment::classify(&found.source_text);
        Ok(gate::evaluate(target, found, sentiment))
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(target_id = target.id, url = %target.url, keyword = %target.keyword)
    )]
    async fn process(&self, target: Target) -> TargetResult {
        let outcome = match self.scan(&target).await {
            Ok(outcome) => outcome,
            Err(ScanError::Fetch(e)) => {
                warn!(error = %e, "Fetch failed; will retry next tick");
                return TargetResult::FetchFailed;
            }
            Err(ScanError::Parse(e)) => {
                warn!(error = %e, "Could not scan page; treating as no match");
                return TargetResult::ParseFailed;
            }
        };

        let (found, sentiment) = match outcome {
            ScanOutcome::NoMatch => {
                debug!("Keyword not found");
                return TargetResult::NoMatch;
            }
            ScanOutcome::AlreadyNotified => {
                debug!(article = ?target.last_notified_article, "Article already notified");
                return TargetResult::AlreadyNotified;
            }
            ScanOutcome::NewMatch { found, sentiment } => (found, sentiment),
        };

        let alert = Alert::new(&target, &found, sentiment);
        if let Err(e) = self.notifier.send(&alert).await {
            error!(error = %e, link = %found.link, "Alert delivery failed; state not advanced");
            return TargetResult::NotifyFailed;
        }
        info!(
            heading = %found.heading,
            link = %found.link,
            sentiment = %sentiment.label,
            score = sentiment.score,
            "Alert sent"
        );

        match self
            .store
            .update_notification_state(target.id, &found.link, Utc::now())
            .await
        {
            Ok(()) => TargetResult::Notified,
            Err(e) => {
                error!(
                    error = %e,
                    link = %found.link,
                    "Alert sent but not recorded; it may repeat next tick"
                );
                TargetResult::StoreFailed
            }
        }
    }
}

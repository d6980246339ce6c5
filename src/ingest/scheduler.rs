//! Cron-driven ingestion scheduler.
//!
//! The scheduler owns a background task that sleeps until the next cron
//! occurrence (UTC) and then spawns a cycle. At most one cycle runs at a
//! time; a tick that lands while a cycle is in progress is skipped.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cron::Schedule;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::fetcher::HttpFeedSource;
use super::job::IngestJob;
use super::types::CycleReport;
use crate::config::IngestConfig;
use crate::post::PostRepository;
use crate::{Database, GazetteError, Result};

/// Parse a cron expression.
///
/// Five-field expressions (minute hour day month weekday) get a leading
/// seconds field of `0`; six- and seven-field expressions are used as given.
///
/// # Examples
///
/// ```
/// use gazette::ingest::parse_schedule;
///
/// assert!(parse_schedule("0 * * * *").is_ok());
/// assert!(parse_schedule("every hour").is_err());
/// ```
pub fn parse_schedule(expr: &str) -> Result<Schedule> {
    let expr = expr.trim();
    let normalized = match expr.split_whitespace().count() {
        5 => format!("0 {expr}"),
        6 | 7 => expr.to_string(),
        n => {
            return Err(GazetteError::Config(format!(
                "invalid cron expression '{expr}': expected 5 fields, got {n}"
            )))
        }
    };

    Schedule::from_str(&normalized)
        .map_err(|e| GazetteError::Config(format!("invalid cron expression '{expr}': {e}")))
}

/// Periodic driver for [`IngestJob`].
pub struct IngestScheduler {
    job: IngestJob,
    db: Database,
    schedule: Schedule,
    in_flight: Mutex<()>,
}

impl IngestScheduler {
    /// Create a scheduler for the given job, store and schedule.
    pub fn new(job: IngestJob, db: Database, schedule: Schedule) -> Self {
        Self {
            job,
            db,
            schedule,
            in_flight: Mutex::new(()),
        }
    }

    /// Build the production scheduler: HTTP feed source and configured schedule.
    pub fn from_config(config: &IngestConfig, db: Database) -> Result<Self> {
        let source = HttpFeedSource::from_config(config)?;
        let schedule = parse_schedule(&config.schedule)?;
        Ok(Self::new(IngestJob::new(Arc::new(source)), db, schedule))
    }

    /// Next occurrence strictly after `after`.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Run one cycle now unless another is in progress.
    ///
    /// Returns `None` when the cycle was skipped or the fetch failed.
    pub async fn run_once(&self) -> Option<CycleReport> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("Previous ingestion cycle still running, skipping this tick");
            return None;
        };

        let store = PostRepository::new(self.db.pool());
        self.job.run_cycle(&store).await.ok()
    }

    /// Start ticking in the background.
    pub fn spawn(self) -> IngestHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let scheduler = Arc::new(self);

        let task = tokio::spawn(async move {
            info!("Ingestion scheduler started");
            let mut cursor = Utc::now();

            loop {
                let Some(next) = scheduler.next_fire(cursor) else {
                    warn!("Schedule has no upcoming occurrences, scheduler stopping");
                    break;
                };
                let wait = (next - Utc::now()).to_std().unwrap_or_default();
                debug!(next = %next, "Next ingestion cycle scheduled");

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        let tick = scheduler.clone();
                        tokio::spawn(async move {
                            tick.run_once().await;
                        });
                        cursor = next.max(Utc::now());
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }

            info!("Ingestion scheduler stopped");
        });

        IngestHandle { shutdown_tx, task }
    }
}

/// Handle to a running scheduler.
pub struct IngestHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl IngestHandle {
    /// Stop ticking and wait for the scheduler task to exit.
    ///
    /// A cycle already in progress is left to finish on its own.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!(error = %e, "Ingestion scheduler task ended abnormally");
        }
    }

    /// Check whether the scheduler task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

//! Worker loop
//!
//! Drains the queue one item at a time. The shutdown signal is only checked
//! between items; an item in progress always runs to completion.

use super::orchestrator::Orchestrator;
use crate::config::PipelineConfig;
use crate::domain::{OutcomeStatus, PipelineError, ProcessingOutcome, Result};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Loop settings
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Republish scenes that are already published
    pub overwrite: bool,

    /// Clear staging after each item
    pub cleanup: bool,

    /// Keep polling an empty queue instead of exiting
    pub follow: bool,

    /// Sleep between polls of an empty queue
    pub poll_interval: Duration,

    /// Give up after this many fatal errors in a row
    pub max_consecutive_failures: usize,
}

impl WorkerSettings {
    /// Settings from a loaded configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            overwrite: config.processing.overwrite,
            cleanup: config.processing.cleanup,
            follow: config.worker.follow,
            poll_interval: Duration::from_secs(config.worker.poll_interval_secs),
            max_consecutive_failures: config.worker.max_consecutive_failures,
        }
    }
}

/// Totals for one worker run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items taken from the queue
    pub processed: usize,

    /// Items published
    pub published: usize,

    /// Items skipped as already published
    pub skipped: usize,

    /// Items that failed softly
    pub failed: usize,

    /// Attempts aborted by a fatal error
    pub errors: usize,

    /// Whether the run ended because of a shutdown signal
    pub interrupted: bool,

    /// Wall-clock duration
    pub duration: Duration,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProcessingOutcome) {
        match outcome.status {
            OutcomeStatus::NoWork => return,
            OutcomeStatus::Published => self.published += 1,
            OutcomeStatus::Skipped => self.skipped += 1,
            OutcomeStatus::Failed => self.failed += 1,
        }
        self.processed += 1;
    }
}

/// Runs the orchestrator until the queue is drained or shutdown is requested
pub struct Worker {
    orchestrator: Orchestrator,
    settings: WorkerSettings,
    shutdown: watch::Receiver<bool>,
}

impl Worker {
    /// Create a worker
    pub fn new(
        orchestrator: Orchestrator,
        settings: WorkerSettings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            orchestrator,
            settings,
            shutdown,
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run the loop
    ///
    /// # Errors
    ///
    /// Fails if the queue depth can't be read, or after
    /// `max_consecutive_failures` fatal item errors in a row.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::default();
        let mut consecutive_failures = 0usize;

        tracing::info!(
            follow = self.settings.follow,
            overwrite = self.settings.overwrite,
            cleanup = self.settings.cleanup,
            "Worker started"
        );

        loop {
            if self.shutdown_requested() {
                tracing::info!("Shutdown requested, stopping worker");
                summary.interrupted = true;
                break;
            }

            let depth = self.orchestrator.queue().depth().await?;
            tracing::info!(messages = depth, "Messages on the queue");

            if depth == 0 {
                if self.settings.follow {
                    self.idle().await;
                    continue;
                }
                break;
            }

            match self
                .orchestrator
                .process_one(self.settings.overwrite, self.settings.cleanup, None)
                .await
            {
                Ok(outcome) => {
                    consecutive_failures = 0;
                    if outcome.is_no_work() {
                        // Depth is approximate; the remaining messages may all be in flight
                        if self.settings.follow {
                            self.idle().await;
                            continue;
                        }
                        break;
                    }
                    summary.record(&outcome);
                }
                Err(e) => {
                    summary.errors += 1;
                    consecutive_failures += 1;
                    tracing::error!(
                        error = %e,
                        consecutive_failures,
                        max = self.settings.max_consecutive_failures,
                        "Item failed"
                    );
                    if consecutive_failures >= self.settings.max_consecutive_failures {
                        summary.duration = start.elapsed();
                        log_summary(&summary);
                        return Err(PipelineError::Other(format!(
                            "Giving up after {consecutive_failures} consecutive failures, last error: {e}"
                        )));
                    }
                }
            }
        }

        summary.duration = start.elapsed();
        log_summary(&summary);
        Ok(summary)
    }

    /// Sleep one poll interval, waking early on shutdown
    async fn idle(&mut self) {
        tracing::debug!(
            seconds = self.settings.poll_interval.as_secs(),
            "Queue empty, waiting"
        );
        tokio::select! {
            _ = tokio::time::sleep(self.settings.poll_interval) => {}
            Ok(()) = self.shutdown.changed() => {}
        }
    }
}

fn log_summary(summary: &RunSummary) {
    tracing::info!(
        processed = summary.processed,
        published = summary.published,
        skipped = summary.skipped,
        failed = summary.failed,
        errors = summary.errors,
        interrupted = summary.interrupted,
        duration_secs = summary.duration.as_secs(),
        "Worker finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SoftFailure, WorkItem};

    #[test]
    fn test_summary_record() {
        let item = WorkItem::new("a/scene.tar.gz").unwrap();
        let mut summary = RunSummary::default();
        summary.record(&ProcessingOutcome::published(item.clone(), 7));
        summary.record(&ProcessingOutcome::skipped(item.clone()));
        summary.record(&ProcessingOutcome::failed(
            item,
            SoftFailure::Unpack("bad".to_string()),
        ));
        summary.record(&ProcessingOutcome::no_work());

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.published, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = PipelineConfig::default();
        config.processing.overwrite = false;
        config.worker.follow = true;
        config.worker.poll_interval_secs = 3;

        let settings = WorkerSettings::from_config(&config);
        assert!(!settings.overwrite);
        assert!(settings.cleanup);
        assert!(settings.follow);
        assert_eq!(settings.poll_interval, Duration::from_secs(3));
    }
}

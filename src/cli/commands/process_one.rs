//! Process-one command implementation
//!
//! Processes a single item: the next queued message, or an explicit key.

use super::build_orchestrator;
use crate::adapters::factory::connect;
use crate::config::load_config_or_env;
use crate::domain::{OutcomeStatus, WorkItem};
use clap::Args;

/// Arguments for the process-one command
#[derive(Args, Debug)]
pub struct ProcessOneArgs {
    /// Process this source key instead of leasing from the queue
    ///
    /// The queue is not touched and nothing is acknowledged.
    #[arg(long, value_name = "KEY")]
    pub item: Option<String>,

    /// Do not republish a scene that is already published
    #[arg(long)]
    pub no_overwrite: bool,

    /// Keep staging directories afterwards
    #[arg(long)]
    pub no_cleanup: bool,
}

impl ProcessOneArgs {
    /// Execute the process-one command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let test_item = match self.item.as_deref().map(WorkItem::new).transpose() {
            Ok(item) => item,
            Err(e) => {
                eprintln!("Invalid --item: {e}");
                return Ok(2);
            }
        };

        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let overwrite = config.processing.overwrite && !self.no_overwrite;
        let cleanup = config.processing.cleanup && !self.no_cleanup;

        let connections = match connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect");
                eprintln!("Failed to connect: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let orchestrator = build_orchestrator(&config, connections);
        let outcome = match orchestrator.process_one(overwrite, cleanup, test_item).await {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Processing failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        match outcome.status {
            OutcomeStatus::NoWork => println!("📭 No messages on the queue"),
            OutcomeStatus::Skipped => println!("⏭️  Already published, skipped"),
            OutcomeStatus::Published => {
                println!("✅ Published {} outputs", outcome.output_count)
            }
            OutcomeStatus::Failed => {
                if let Some(reason) = &outcome.failure_reason {
                    println!("❌ Failed: {reason}");
                }
            }
        }

        Ok(if outcome.succeeded() { 0 } else { 1 })
    }
}

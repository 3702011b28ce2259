//! Run command implementation
//!
//! This module implements the `run` command, which drains the work queue.

use super::build_orchestrator;
use crate::adapters::factory::connect;
use crate::config::load_config_or_env;
use crate::core::process::{Worker, WorkerSettings};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Keep polling when the queue is empty instead of exiting
    #[arg(short, long)]
    pub follow: bool,

    /// Do not republish scenes that are already published
    #[arg(long)]
    pub no_overwrite: bool,

    /// Keep staging directories after each item
    #[arg(long)]
    pub no_cleanup: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        if self.follow {
            tracing::info!("Enabling follow mode from CLI");
            config.worker.follow = true;
        }
        if self.no_overwrite {
            tracing::info!("Disabling overwrite from CLI");
            config.processing.overwrite = false;
        }
        if self.no_cleanup {
            tracing::info!("Disabling cleanup from CLI");
            config.processing.cleanup = false;
        }

        tracing::info!(
            source = %format!("{}/{}", config.source.bucket, config.source.prefix),
            destination = %format!("{}/{}", config.destination.bucket, config.destination.prefix),
            "Reading from source and writing to destination"
        );

        let connections = match connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect");
                eprintln!("Failed to connect: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let orchestrator = build_orchestrator(&config, connections);
        let mut worker = Worker::new(
            orchestrator,
            WorkerSettings::from_config(&config),
            shutdown_signal,
        );

        println!("🚀 Processing queue '{}'...", config.queue.name);
        println!();

        let summary = match worker.run().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Worker failed");
                eprintln!("Worker failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!();
        println!("📊 Run Summary:");
        println!("  Processed: {}", summary.processed);
        println!("  Published: {}", summary.published);
        println!("  Skipped: {}", summary.skipped);
        println!("  Failed: {}", summary.failed);
        println!("  Errors: {}", summary.errors);
        println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
        println!();

        let exit_code = if summary.interrupted {
            println!("⚠️  Run interrupted gracefully. Remaining messages stay on the queue.");
            130 // SIGINT exit code (standard Unix convention)
        } else if summary.failed > 0 || summary.errors > 0 {
            println!("⚠️  Run completed with failures");
            1 // Partial success
        } else {
            println!("✅ Run completed successfully!");
            0
        };

        Ok(exit_code)
    }
}

//! Enqueue command implementation
//!
//! Seeds the work queue with archive keys listed from the source bucket.

use crate::adapters::factory::connect;
use crate::config::load_config_or_env;
use crate::core::refill::enqueue_matching;
use clap::Args;

/// Arguments for the enqueue command
#[derive(Args, Debug)]
pub struct EnqueueArgs {
    /// Key prefix to list (defaults to the configured source prefix)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Only enqueue keys containing this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Maximum number of items to enqueue
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl EnqueueArgs {
    /// Execute the enqueue command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let prefix = self
            .prefix
            .clone()
            .unwrap_or_else(|| config.source.prefix.clone());

        let connections = match connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to connect: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        match enqueue_matching(
            connections.source.as_ref(),
            connections.queue.as_ref(),
            &prefix,
            self.filter.as_deref(),
            self.limit,
        )
        .await
        {
            Ok(count) => {
                println!(
                    "✅ Enqueued {count} item(s) from s3://{}/{prefix} onto '{}'",
                    config.source.bucket, config.queue.name
                );
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Enqueue failed");
                eprintln!("Enqueue failed: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}

//! Status command implementation
//!
//! This module implements the `status` command, which reports how many
//! messages are waiting on the work queue.

use crate::adapters::factory::{connect_queue, load_sdk_config};
use crate::config::load_config_or_env;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking queue status");

        println!("📊 Queue Status");
        println!();

        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let sdk_config = load_sdk_config(&config.aws).await;
        let queue = match connect_queue(&sdk_config, &config.queue.name).await {
            Ok(q) => q,
            Err(e) => {
                println!("❌ Failed to connect to queue '{}'", config.queue.name);
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let depth = match queue.depth().await {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to read queue attributes");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("  Queue: {}", config.queue.name);
        println!("  Messages waiting: {depth}");
        println!();

        if depth == 0 {
            println!("Nothing to do. Run 'landsat-cog enqueue' to add items.");
        }

        Ok(0)
    }
}

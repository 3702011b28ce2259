//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the worker configuration.

use crate::config::load_config_or_env;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a config that loads is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration: {config_path}");
        println!();

        let config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Source: s3://{}/{}",
            config.source.bucket, config.source.prefix
        );
        println!(
            "  Destination: s3://{}/{}",
            config.destination.bucket, config.destination.prefix
        );
        println!("  Queue: {}", config.queue.name);
        println!(
            "  Visibility Timeout: {}s",
            config.queue.visibility_timeout_secs
        );
        println!("  Max Receives: {}", config.queue.max_receives);
        println!("  Download Dir: {}", config.staging.download_dir);
        println!("  Output Dir: {}", config.staging.output_dir);
        println!("  Overwrite: {}", config.processing.overwrite);
        println!("  Cleanup: {}", config.processing.cleanup);
        println!("  Min Outputs: {}", config.processing.min_outputs);
        println!("  Converter: {}", config.transform.gdal_translate_bin);
        if let Some(region) = &config.aws.region {
            println!("  AWS Region: {region}");
        }
        if let Some(endpoint) = &config.aws.endpoint_url {
            println!("  AWS Endpoint: {endpoint}");
        }
        println!(
            "  AWS Credentials: {}",
            if config.aws.has_static_credentials() {
                "static (from configuration)"
            } else {
                "default provider chain"
            }
        );
        println!();
        Ok(0)
    }
}

//! Configuration management.
//!
//! # Overview
//!
//! The worker reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Short deployment overrides (`IN_BUCKET`, `OUT_PATH`, `QUEUE`, `OVERWRITE`, ...)
//! - Default values for every optional setting
//! - Validation before anything touches AWS
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use landsat_cog::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("landsat-cog.toml")?;
//! println!("Reading from s3://{}/{}", config.source.bucket, config.source.prefix);
//! println!("Queue: {}", config.queue.name);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! bucket = "landsat-ard-in"
//! prefix = "espa/orders"
//!
//! [destination]
//! bucket = "landsat-cog-out"
//! prefix = "cogs"
//!
//! [queue]
//! name = "landsat-to-cog"
//! visibility_timeout_secs = 1000
//!
//! [processing]
//! overwrite = false
//! cleanup = true
//!
//! [aws]
//! region = "ap-southeast-2"
//! secret_access_key = "${AWS_SECRET_ACCESS_KEY}"
//! access_key_id = "${AWS_ACCESS_KEY_ID}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_env, load_from_env, DEFAULT_CONFIG_FILE};
pub use schema::{
    ApplicationConfig, AwsConfig, BucketLocation, Environment, LoggingConfig, PipelineConfig,
    ProcessingConfig, QueueConfig, StagingConfig, TransformConfig, WorkerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};

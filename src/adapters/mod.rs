//! External system integrations.
//!
//! - [`storage`] - Remote object store (S3)
//! - [`queue`] - Work queue (SQS)
//! - [`factory`] - Builds connected clients from configuration
//!
//! # Design Pattern
//!
//! Adapters isolate the AWS SDK behind the [`ObjectStore`](storage::ObjectStore)
//! and [`WorkQueue`](queue::WorkQueue) traits. The orchestrator takes them as
//! constructor arguments, so tests swap in in-memory fakes.
//!
//! ```rust,no_run
//! use landsat_cog::adapters::factory::connect;
//! use landsat_cog::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("landsat-cog.toml")?;
//! let connections = connect(&config).await?;
//! println!("{} messages waiting", connections.queue.depth().await?);
//! # Ok(())
//! # }
//! ```

pub mod factory;
pub mod queue;
pub mod storage;

//! Core business logic.
//!
//! # Modules
//!
//! - [`staging`] - Local download and output workspaces
//! - [`extract`] - Archive unpacking and descriptor parsing
//! - [`transform`] - Qualifying raster discovery and COG conversion
//! - [`process`] - Single-item orchestration, acknowledge policy, worker loop
//! - [`refill`] - Seeding the queue from a bucket listing
//!
//! # Item Workflow
//!
//! 1. **Lease**: take one message from the queue
//! 2. **Fetch**: download the archive unless a complete copy is already local
//! 3. **Unpack**: extract the archive into the download workspace
//! 4. **Describe**: parse the single XML descriptor into scene metadata
//! 5. **Check**: skip if the descriptor is already published and overwrite is off
//! 6. **Transform**: convert every qualifying raster to a COG
//! 7. **Validate**: require the minimum number of outputs
//! 8. **Publish**: upload outputs, then the descriptor
//! 9. **Clean up** (optional) and **acknowledge**
//!
//! # Example
//!
//! ```rust,no_run
//! use landsat_cog::adapters::factory::connect;
//! use landsat_cog::config::load_config;
//! use landsat_cog::core::process::{Orchestrator, OrchestratorSettings};
//! use landsat_cog::core::staging::StagingArea;
//! use landsat_cog::core::transform::GdalTranslator;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("landsat-cog.toml")?;
//! let connections = connect(&config).await?;
//!
//! let orchestrator = Orchestrator::new(
//!     connections.source,
//!     connections.destination,
//!     connections.queue,
//!     Arc::new(GdalTranslator::new(&config.transform.gdal_translate_bin)),
//!     StagingArea::from_config(&config.staging),
//!     OrchestratorSettings::from_config(&config),
//! );
//!
//! let outcome = orchestrator.process_one(true, true, None).await?;
//! println!("{}: {} outputs", outcome.status, outcome.output_count);
//! # Ok(())
//! # }
//! ```

pub mod extract;
pub mod process;
pub mod refill;
pub mod staging;
pub mod transform;

// Landsat COG - Landsat archive to Cloud Optimised GeoTIFF batch worker
// Copyright (c) 2025 Landsat COG Contributors
// Licensed under the MIT License

//! # Landsat COG
//!
//! A queue-driven batch worker that converts Landsat surface reflectance
//! archives into Cloud Optimised GeoTIFFs and publishes them under a
//! predictable key layout.
//!
//! ## Overview
//!
//! Each queue message names one archive in the source bucket. For that
//! archive the worker:
//! - **Downloads** and unpacks it into a local staging area
//! - **Reads** the scene descriptor (satellite, WRS path/row, acquisition date)
//! - **Converts** every surface reflectance and QA raster into a COG
//! - **Publishes** the COGs, then the descriptor, under
//!   `{prefix}/{satellite}/{path}/{row}/{YYYY}/{MM}/{DD}/`
//!
//! A published descriptor marks the scene as done, so reruns skip it unless
//! overwrite is enabled.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (staging, extract, transform, process, refill)
//! - [`adapters`] - External integrations (S3, SQS)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use landsat_cog::adapters::factory::connect;
//! use landsat_cog::config::load_config;
//! use landsat_cog::core::process::{Orchestrator, OrchestratorSettings, Worker, WorkerSettings};
//! use landsat_cog::core::staging::StagingArea;
//! use landsat_cog::core::transform::GdalTranslator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("landsat-cog.toml")?;
//!     let connections = connect(&config).await?;
//!
//!     let orchestrator = Orchestrator::new(
//!         connections.source,
//!         connections.destination,
//!         connections.queue,
//!         Arc::new(GdalTranslator::new(&config.transform.gdal_translate_bin)),
//!         StagingArea::from_config(&config.staging),
//!         OrchestratorSettings::from_config(&config),
//!     );
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let mut worker = Worker::new(orchestrator, WorkerSettings::from_config(&config), shutdown_rx);
//!     let summary = worker.run().await?;
//!
//!     println!("Published {} scenes", summary.published);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fatal failures are [`domain::PipelineError`]; the message is left on the
//! queue and reappears once its lease expires. Corrupt input and incomplete
//! conversions are soft failures reported through
//! [`domain::ProcessingOutcome`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

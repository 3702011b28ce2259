//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod enqueue;
pub mod init;
pub mod process_one;
pub mod run;
pub mod status;
pub mod validate;

use crate::adapters::factory::Connections;
use crate::config::PipelineConfig;
use crate::core::process::{Orchestrator, OrchestratorSettings};
use crate::core::staging::StagingArea;
use crate::core::transform::GdalTranslator;
use std::sync::Arc;

/// Wire the production orchestrator from configuration and live clients
fn build_orchestrator(config: &PipelineConfig, connections: Connections) -> Orchestrator {
    Orchestrator::new(
        connections.source,
        connections.destination,
        connections.queue,
        Arc::new(GdalTranslator::new(&config.transform.gdal_translate_bin)),
        StagingArea::from_config(&config.staging),
        OrchestratorSettings::from_config(config),
    )
}

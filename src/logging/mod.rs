//! Logging and observability
//!
//! All outcomes are reported through `tracing` events with structured fields;
//! there is no separate status channel.
//!
//! # Example
//!
//! ```no_run
//! use landsat_cog::logging::init_logging;
//! use landsat_cog::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(key = "espa/scene.tar.gz", "Found file to process");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the final outcome of one item
///
/// Published and skipped items log at info, soft failures at warn.
///
/// # Example
///
/// ```no_run
/// use landsat_cog::log_outcome;
/// use landsat_cog::domain::ProcessingOutcome;
///
/// let outcome = ProcessingOutcome::no_work();
/// log_outcome!(&outcome);
/// ```
#[macro_export]
macro_rules! log_outcome {
    ($outcome:expr) => {{
        let outcome = $outcome;
        let key = outcome
            .item
            .as_ref()
            .map(|item| item.as_str().to_string())
            .unwrap_or_default();
        match &outcome.failure_reason {
            Some(reason) => tracing::warn!(
                key = %key,
                status = %outcome.status,
                reason = %reason,
                acknowledged = outcome.acknowledged,
                "Processing FAILED"
            ),
            None => tracing::info!(
                key = %key,
                status = %outcome.status,
                outputs = outcome.output_count,
                acknowledged = outcome.acknowledged,
                "Processing finished"
            ),
        }
    }};
}

/// Log a stage transition for the current item
///
/// # Example
///
/// ```no_run
/// use landsat_cog::log_stage;
///
/// log_stage!("espa/scene.tar.gz", "unpack");
/// ```
#[macro_export]
macro_rules! log_stage {
    ($key:expr, $stage:expr) => {
        tracing::debug!(key = %$key, stage = $stage, "Entering stage");
    };
}

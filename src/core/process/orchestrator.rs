//! Single-item orchestrator
//!
//! Takes one archive from lease to publish. Every collaborator is injected,
//! so the whole flow runs against in-memory fakes in tests.

use super::policy::{AckDecision, AckPolicy};
use crate::adapters::queue::{Lease, WorkQueue};
use crate::adapters::storage::ObjectStore;
use crate::config::PipelineConfig;
use crate::core::extract::{self, find_descriptor, parse_descriptor};
use crate::core::staging::{FetchStatus, StagingArea};
use crate::core::transform::{transform_workspace, CogProfile, RasterTranslator};
use crate::domain::{
    ExtractedMetadata, OutputKeyPrefix, PipelineError, ProcessingOutcome, Result, SoftFailure,
    WorkItem,
};
use crate::{log_outcome, log_stage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Tunables for [`Orchestrator`]
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Key prefix all outputs are published under
    pub output_root: String,

    /// Lease length requested from the queue
    pub visibility_timeout: Duration,

    /// Minimum number of converted rasters for a valid dataset
    pub min_outputs: usize,

    /// What to do with soft-failed leases
    pub ack_policy: AckPolicy,

    /// COG creation parameters
    pub profile: CogProfile,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl OrchestratorSettings {
    /// Settings from a loaded configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            output_root: config.destination.prefix.clone(),
            visibility_timeout: Duration::from_secs(config.queue.visibility_timeout_secs),
            min_outputs: config.processing.min_outputs,
            ack_policy: AckPolicy::new(config.queue.max_receives),
            profile: CogProfile::from_config(&config.transform),
        }
    }
}

/// Processes one work item per call
pub struct Orchestrator {
    source: Arc<dyn ObjectStore>,
    destination: Arc<dyn ObjectStore>,
    queue: Arc<dyn WorkQueue>,
    translator: Arc<dyn RasterTranslator>,
    staging: StagingArea,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    /// Create an orchestrator from its collaborators
    pub fn new(
        source: Arc<dyn ObjectStore>,
        destination: Arc<dyn ObjectStore>,
        queue: Arc<dyn WorkQueue>,
        translator: Arc<dyn RasterTranslator>,
        staging: StagingArea,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            source,
            destination,
            queue,
            translator,
            staging,
            settings,
        }
    }

    /// The work queue this orchestrator leases from
    pub fn queue(&self) -> &Arc<dyn WorkQueue> {
        &self.queue
    }

    /// Process at most one item
    ///
    /// With `test_item` set the queue is not touched at all: that item is
    /// processed and nothing is acknowledged. Otherwise one item is leased;
    /// an empty queue yields [`ProcessingOutcome::no_work`].
    ///
    /// Soft failures (unreadable archive, unusable descriptor, too few
    /// outputs) come back as `Ok` with a failed outcome. Everything else is
    /// returned as `Err`; in that case the lease is neither acknowledged nor
    /// released, so the item reappears once its visibility timeout lapses.
    /// Staging is cleared on every outcome when `cleanup` is set.
    pub async fn process_one(
        &self,
        overwrite: bool,
        cleanup: bool,
        test_item: Option<WorkItem>,
    ) -> Result<ProcessingOutcome> {
        info!("Starting up a run");

        let (item, lease) = match test_item {
            Some(item) => {
                info!(key = %item, "Processing test item");
                (item, None)
            }
            None => match self.queue.receive(self.settings.visibility_timeout).await? {
                Some(lease) => {
                    info!(
                        key = %lease.item,
                        receive_count = lease.receive_count,
                        "Found file to process"
                    );
                    (lease.item.clone(), Some(lease))
                }
                None => {
                    warn!(queue = self.queue.name(), "No messages, nothing to do");
                    return Ok(ProcessingOutcome::no_work());
                }
            },
        };

        let mut outcome = match self.process_item(&item, overwrite).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(key = %item, error = %e, "Processing aborted");
                // Leftovers would be unpacked alongside the next item
                if cleanup {
                    log_stage!(item, "cleanup");
                    if let Err(clear_err) = self.staging.clear().await {
                        error!(key = %item, error = %clear_err, "Failed to clean up after abort");
                    }
                }
                return Err(e);
            }
        };

        if cleanup {
            log_stage!(item, "cleanup");
            self.staging.clear().await?;
        }

        if let Some(lease) = &lease {
            outcome.acknowledged = self.settle(lease, &outcome).await?;
        }

        log_outcome!(&outcome);
        Ok(outcome)
    }

    /// Acknowledge or release `lease`; returns whether it was deleted
    async fn settle(&self, lease: &Lease, outcome: &ProcessingOutcome) -> Result<bool> {
        match self.settings.ack_policy.decide(lease, outcome) {
            AckDecision::Acknowledge => {
                self.queue.acknowledge(lease).await?;
                info!(key = %lease.item, "Deleted message from queue");
                Ok(true)
            }
            AckDecision::Release => {
                self.queue.release(lease).await?;
                info!(
                    key = %lease.item,
                    receive_count = lease.receive_count,
                    max_receives = self.settings.ack_policy.max_receives,
                    "Released message for redelivery"
                );
                Ok(false)
            }
        }
    }

    async fn process_item(&self, item: &WorkItem, overwrite: bool) -> Result<ProcessingOutcome> {
        self.staging.ensure().await?;

        log_stage!(item, "fetch");
        let archive = self.staging.archive_path(item);
        if let FetchStatus::Downloaded(bytes) = self.staging.fetch(self.source.as_ref(), item).await? {
            info!(key = %item, bytes, "Downloaded archive");
        }

        log_stage!(item, "unpack");
        match extract::extract(&archive, self.staging.download_dir()).await {
            Ok(()) => {}
            Err(PipelineError::Extract(e)) if e.is_input_corruption() => {
                error!(key = %item, error = %e, "Failed to unpack archive");
                return Ok(ProcessingOutcome::failed(
                    item.clone(),
                    SoftFailure::Unpack(e.to_string()),
                ));
            }
            Err(e) => return Err(e),
        }

        log_stage!(item, "metadata");
        let (descriptor, metadata) = match self.read_metadata().await {
            Ok(found) => found,
            Err(PipelineError::Extract(e)) if e.is_input_corruption() => {
                error!(key = %item, error = %e, "Descriptor unusable");
                return Ok(ProcessingOutcome::failed(
                    item.clone(),
                    SoftFailure::Descriptor(e.to_string()),
                ));
            }
            Err(e) => return Err(e),
        };

        let prefix = OutputKeyPrefix::new(&self.settings.output_root, &metadata);
        let descriptor_name = descriptor
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PipelineError::Validation(format!(
                    "Descriptor path {} has no file name",
                    descriptor.display()
                ))
            })?;
        let metadata_key = prefix.key_for(&descriptor_name);

        log_stage!(item, "idempotency");
        let published = self.destination.exists(&metadata_key).await?;
        if published && !overwrite {
            info!(
                key = %item,
                metadata_key = %metadata_key,
                "Already processed and overwrite is off, skipping"
            );
            return Ok(ProcessingOutcome::skipped(item.clone()));
        }
        if published {
            info!(metadata_key = %metadata_key, "Already processed, overwriting");
        }

        log_stage!(item, "transform");
        let produced = transform_workspace(
            self.translator.as_ref(),
            self.staging.download_dir(),
            self.staging.output_dir(),
            &self.settings.profile,
        )
        .await?;

        if produced.len() < self.settings.min_outputs {
            warn!(
                key = %item,
                produced = produced.len(),
                required = self.settings.min_outputs,
                "Too few outputs for a valid dataset, not publishing"
            );
            return Ok(ProcessingOutcome::failed(
                item.clone(),
                SoftFailure::Incomplete {
                    produced: produced.len(),
                    required: self.settings.min_outputs,
                },
            ));
        }

        // Descriptor goes last: its presence marks the scene as published
        log_stage!(item, "publish");
        for output in &produced {
            let key = prefix.key_for(&output.relative.file_name());
            info!(key = %key, bucket = self.destination.bucket(), "Uploading output");
            self.destination.upload(&key, &output.path).await?;
        }
        info!(key = %metadata_key, "Uploading metadata file");
        self.destination.upload(&metadata_key, &descriptor).await?;

        Ok(ProcessingOutcome::published(item.clone(), produced.len()))
    }

    async fn read_metadata(&self) -> Result<(PathBuf, ExtractedMetadata)> {
        let descriptor = find_descriptor(self.staging.download_dir())?;
        let metadata = parse_descriptor(&descriptor).await?;
        Ok((descriptor, metadata))
    }
}

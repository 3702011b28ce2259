//! Result of one orchestrator attempt

use super::ids::WorkItem;
use std::fmt;

/// What happened to the item taken in one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The queue was empty and no test item was given
    NoWork,
    /// Outputs already existed and overwrite was off
    Skipped,
    /// Outputs and descriptor were uploaded
    Published,
    /// The item failed softly; nothing was published
    Failed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeStatus::NoWork => "no_work",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Published => "published",
            OutcomeStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why an item failed softly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftFailure {
    /// The archive could not be unpacked
    Unpack(String),
    /// The descriptor was missing or malformed
    Descriptor(String),
    /// Too few qualifying outputs were produced
    Incomplete { produced: usize, required: usize },
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftFailure::Unpack(msg) => write!(f, "unpack failed: {msg}"),
            SoftFailure::Descriptor(msg) => write!(f, "descriptor unusable: {msg}"),
            SoftFailure::Incomplete { produced, required } => write!(
                f,
                "only {produced} outputs produced, {required} required for a valid dataset"
            ),
        }
    }
}

/// Outcome of [`Orchestrator::process_one`](crate::core::process::Orchestrator::process_one)
///
/// Not persisted. Drives the acknowledge decision and the log line for the item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingOutcome {
    /// Item that was processed, if any
    pub item: Option<WorkItem>,

    /// Final status
    pub status: OutcomeStatus,

    /// Number of outputs uploaded
    pub output_count: usize,

    /// Reason for a soft failure
    pub failure_reason: Option<SoftFailure>,

    /// Whether the queue message was deleted
    pub acknowledged: bool,
}

impl ProcessingOutcome {
    /// Outcome for an empty queue
    pub fn no_work() -> Self {
        Self {
            item: None,
            status: OutcomeStatus::NoWork,
            output_count: 0,
            failure_reason: None,
            acknowledged: false,
        }
    }

    /// Outcome for an already-published item
    pub fn skipped(item: WorkItem) -> Self {
        Self {
            item: Some(item),
            status: OutcomeStatus::Skipped,
            output_count: 0,
            failure_reason: None,
            acknowledged: false,
        }
    }

    /// Outcome for a successful publish
    pub fn published(item: WorkItem, output_count: usize) -> Self {
        Self {
            item: Some(item),
            status: OutcomeStatus::Published,
            output_count,
            failure_reason: None,
            acknowledged: false,
        }
    }

    /// Outcome for a soft failure
    pub fn failed(item: WorkItem, reason: SoftFailure) -> Self {
        Self {
            item: Some(item),
            status: OutcomeStatus::Failed,
            output_count: 0,
            failure_reason: Some(reason),
            acknowledged: false,
        }
    }

    /// Whether the attempt succeeded (no work, skipped and published all count)
    pub fn succeeded(&self) -> bool {
        self.status != OutcomeStatus::Failed
    }

    /// Whether an item was actually taken
    pub fn is_no_work(&self) -> bool {
        self.status == OutcomeStatus::NoWork
    }
}

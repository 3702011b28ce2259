//! Acknowledge policy
//!
//! Decides whether a finished lease is deleted or handed back to the queue.

use crate::adapters::queue::Lease;
use crate::domain::{OutcomeStatus, ProcessingOutcome};

/// What to do with a lease once its item has an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckDecision {
    /// Delete the message
    Acknowledge,
    /// Make the message visible again straight away
    Release,
}

/// When to give up on a soft-failed item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckPolicy {
    /// Receive count at which a soft failure is acknowledged
    pub max_receives: u32,
}

impl Default for AckPolicy {
    fn default() -> Self {
        Self { max_receives: 1 }
    }
}

impl AckPolicy {
    /// Policy that deletes after `max_receives` deliveries (at least one)
    pub fn new(max_receives: u32) -> Self {
        Self {
            max_receives: max_receives.max(1),
        }
    }

    /// Decide the fate of `lease` given the item's outcome
    ///
    /// Published and skipped items are always acknowledged. A soft failure is
    /// acknowledged once the message has been received `max_receives` times,
    /// and released before that.
    pub fn decide(&self, lease: &Lease, outcome: &ProcessingOutcome) -> AckDecision {
        match outcome.status {
            OutcomeStatus::Failed if lease.receive_count < self.max_receives => {
                AckDecision::Release
            }
            _ => AckDecision::Acknowledge,
        }
    }
}

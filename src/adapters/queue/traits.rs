//! Work queue abstraction

use crate::domain::{Result, WorkItem};
use async_trait::async_trait;
use std::time::Duration;

/// A temporary exclusive claim on one queued item
///
/// The queue hides the message from other consumers until the visibility
/// timeout passes; acknowledge before then or the item is redelivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lease {
    /// The leased item
    pub item: WorkItem,

    /// Opaque handle used to acknowledge or release the lease
    pub receipt_handle: String,

    /// How many times the queue has handed this message out, this time included
    pub receive_count: u32,
}

/// Message queue with lease semantics
#[async_trait]
pub trait WorkQueue: Send + Sync {
    /// Queue name, for logging
    fn name(&self) -> &str;

    /// Lease at most one item, hiding it for `visibility_timeout`
    ///
    /// Returns `Ok(None)` when the queue is empty.
    async fn receive(&self, visibility_timeout: Duration) -> Result<Option<Lease>>;

    /// Delete the leased message
    async fn acknowledge(&self, lease: &Lease) -> Result<()>;

    /// End the lease early so the message is redelivered right away
    async fn release(&self, lease: &Lease) -> Result<()>;

    /// Approximate number of visible messages
    async fn depth(&self) -> Result<usize>;

    /// Add an item to the queue
    async fn enqueue(&self, item: &WorkItem) -> Result<()>;
}

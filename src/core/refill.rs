//! Queue refill
//!
//! Seeds the work queue from a listing of the source bucket.

use crate::adapters::queue::WorkQueue;
use crate::adapters::storage::ObjectStore;
use crate::domain::{Result, WorkItem};
use tracing::{debug, info};

/// Enqueue up to `limit` keys under `prefix` that contain `filter`
///
/// A `None` filter matches every key. Keys that can't name an archive
/// (directory placeholders ending in `/`) are passed over. Listing stops as
/// soon as `limit` items have been sent. Returns the number enqueued.
pub async fn enqueue_matching(
    store: &dyn ObjectStore,
    queue: &dyn WorkQueue,
    prefix: &str,
    filter: Option<&str>,
    limit: usize,
) -> Result<usize> {
    info!(
        limit,
        bucket = store.bucket(),
        prefix,
        filter = filter.unwrap_or(""),
        queue = queue.name(),
        "Adding items to the queue"
    );

    let mut count = 0usize;
    let mut token: Option<String> = None;

    while count < limit {
        let page = store.list_page(prefix, token.take()).await?;
        debug!(keys = page.keys.len(), "Listed page");

        for key in page.keys {
            if count >= limit {
                break;
            }
            if filter.is_some_and(|f| !key.contains(f)) {
                continue;
            }
            let Ok(item) = WorkItem::new(key) else {
                continue;
            };
            queue.enqueue(&item).await?;
            debug!(key = %item, "Enqueued");
            count += 1;
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    info!(count, "Finished adding items to the queue");
    Ok(count)
}

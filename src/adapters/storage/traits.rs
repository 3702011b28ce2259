//! Object store abstraction
//!
//! The orchestrator only needs four things from a bucket, so that is all the
//! trait asks for. Tests substitute an in-memory implementation.

use crate::domain::Result;
use async_trait::async_trait;
use std::path::Path;

/// One page of a key listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    /// Keys on this page, in store order
    pub keys: Vec<String>,

    /// Token for the next page; `None` on the last page
    pub next_token: Option<String>,
}

/// Key-addressed remote object store bound to one bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket this store reads and writes
    fn bucket(&self) -> &str;

    /// Check whether `key` exists
    ///
    /// # Errors
    ///
    /// Any failure other than "not found" is an error, never `Ok(false)`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Stream `key` into the file at `destination`, returning the byte count
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`](crate::domain::StorageError::NotFound)
    /// if the key doesn't exist.
    async fn download(&self, key: &str, destination: &Path) -> Result<u64>;

    /// Stream the file at `source` to `key`, replacing any existing object
    async fn upload(&self, key: &str, source: &Path) -> Result<()>;

    /// List one page of keys under `prefix`
    ///
    /// Pass the previous page's `next_token` to continue.
    async fn list_page(&self, prefix: &str, continuation_token: Option<String>)
        -> Result<KeyPage>;
}

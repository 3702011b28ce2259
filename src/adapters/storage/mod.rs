//! Remote object store
//!
//! Trait-based so the orchestrator can run against S3 in production and an
//! in-memory store in tests.

pub mod s3;
pub mod traits;

pub use s3::S3ObjectStore;
pub use traits::{KeyPage, ObjectStore};

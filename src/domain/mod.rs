//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`WorkItem`], [`RelativeAssetPath`], [`OutputKeyPrefix`])
//! - **Scene metadata** ([`ExtractedMetadata`])
//! - **Attempt results** ([`ProcessingOutcome`], [`SoftFailure`])
//! - **Error types** ([`PipelineError`] and the per-collaborator enums)
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Fatal failures are `Err(PipelineError)`; soft item failures come back as
//! an `Ok(ProcessingOutcome)` with [`OutcomeStatus::Failed`]:
//!
//! ```rust
//! use landsat_cog::domain::{PipelineError, Result, WorkItem};
//!
//! fn parse(body: &str) -> Result<WorkItem> {
//!     WorkItem::new(body).map_err(PipelineError::Validation)
//! }
//! # assert!(parse("a/b.tar.gz").is_ok());
//! ```

pub mod errors;
pub mod ids;
pub mod metadata;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExtractError, PipelineError, QueueError, StorageError, TransformError};
pub use ids::{OutputKeyPrefix, RelativeAssetPath, WorkItem};
pub use metadata::ExtractedMetadata;
pub use outcome::{OutcomeStatus, ProcessingOutcome, SoftFailure};
pub use result::Result;

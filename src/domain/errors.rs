//! Domain error types
//!
//! This module defines the error hierarchy for the pipeline. Errors are
//! domain-specific and don't expose AWS SDK or codec types.

use std::path::PathBuf;
use thiserror::Error;

/// Main pipeline error type
///
/// Every variant here is *fatal* for the attempt that raised it: it is
/// propagated to the caller and the queue message is left for redelivery.
/// Soft item failures are reported through
/// [`ProcessingOutcome`](crate::domain::ProcessingOutcome) instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote object store errors
    #[error("Object store error: {0}")]
    Storage(#[from] StorageError),

    /// Work queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Archive and descriptor errors
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Raster conversion errors
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Remote object store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object does not exist
    #[error("Object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Existence check failed for a reason other than "not found"
    #[error("Failed to check s3://{bucket}/{key}: {message}")]
    LookupFailed {
        bucket: String,
        key: String,
        message: String,
    },

    /// Download failed
    #[error("Failed to download s3://{bucket}/{key}: {message}")]
    DownloadFailed {
        bucket: String,
        key: String,
        message: String,
    },

    /// Upload failed
    #[error("Failed to upload s3://{bucket}/{key}: {message}")]
    UploadFailed {
        bucket: String,
        key: String,
        message: String,
    },

    /// Listing failed
    #[error("Failed to list s3://{bucket}/{prefix}: {message}")]
    ListFailed {
        bucket: String,
        prefix: String,
        message: String,
    },
}

/// Work queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// Queue URL could not be resolved from its name
    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    /// Receive call failed
    #[error("Failed to receive message: {0}")]
    ReceiveFailed(String),

    /// Delete (acknowledge) call failed
    #[error("Failed to delete message: {0}")]
    DeleteFailed(String),

    /// Visibility change failed
    #[error("Failed to release message: {0}")]
    ReleaseFailed(String),

    /// Send call failed
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    /// Attribute query failed
    #[error("Failed to read queue attributes: {0}")]
    AttributesFailed(String),

    /// Message arrived without a usable body
    #[error("Invalid message: {0}")]
    InvalidMessage(String),
}

/// Archive and descriptor errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Archive could not be unpacked
    #[error("Failed to unpack {}: {message}", archive.display())]
    ArchiveFailed { archive: PathBuf, message: String },

    /// No descriptor file in the workspace
    #[error("No descriptor file found in {}", .0.display())]
    DescriptorNotFound(PathBuf),

    /// More than one descriptor file in the workspace
    #[error("Multiple descriptor files found in {}: {}", dir.display(), files.join(", "))]
    MultipleDescriptors { dir: PathBuf, files: Vec<String> },

    /// Descriptor is missing fields or is not well-formed XML
    #[error("Malformed metadata in {}: {message}", path.display())]
    MalformedMetadata { path: PathBuf, message: String },
}

impl ExtractError {
    /// Whether this error describes corrupt input rather than a broken workspace
    ///
    /// Corrupt input is a soft item failure. A workspace holding several
    /// descriptors is an operator problem, so that one stays fatal.
    pub fn is_input_corruption(&self) -> bool {
        !matches!(self, ExtractError::MultipleDescriptors { .. })
    }
}

/// Raster conversion errors
#[derive(Debug, Error)]
pub enum TransformError {
    /// Converter could not be started
    #[error("Failed to launch converter '{program}': {message}")]
    LaunchFailed { program: String, message: String },

    /// Converter exited unsuccessfully
    #[error("Conversion of {} failed (exit code {code:?}): {stderr}", input.display())]
    ConversionFailed {
        input: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// Converter reported success but wrote nothing
    #[error("Converter produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

// Conversion from std::io::Error
impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::Configuration(format!("TOML parse error: {err}"))
    }
}

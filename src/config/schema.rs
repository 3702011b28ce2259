//! Configuration schema types
//!
//! This module defines the configuration structure for the worker. Every
//! section has defaults so a configuration can be assembled from environment
//! variables alone.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main worker configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Where archives are read from
    #[serde(default)]
    pub source: BucketLocation,

    /// Where COGs and descriptors are published
    #[serde(default)]
    pub destination: BucketLocation,

    /// Work queue settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Local staging directories
    #[serde(default)]
    pub staging: StagingConfig,

    /// Per-item processing switches
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Raster conversion settings
    #[serde(default)]
    pub transform: TransformConfig,

    /// AWS client settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Worker loop settings
    #[serde(default)]
    pub worker: WorkerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PipelineConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate("source")?;
        self.destination.validate("destination")?;
        self.queue.validate()?;
        self.staging.validate()?;
        self.processing.validate()?;
        self.transform.validate()?;
        self.aws.validate(&self.environment)?;
        self.worker.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// A bucket plus a key prefix inside it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketLocation {
    /// Bucket name
    #[serde(default)]
    pub bucket: String,

    /// Key prefix (no leading or trailing slash needed)
    #[serde(default)]
    pub prefix: String,
}

impl BucketLocation {
    fn validate(&self, section: &str) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err(format!("{section}.bucket cannot be empty"));
        }
        if self.bucket.contains('/') {
            return Err(format!(
                "{section}.bucket '{}' must be a bucket name, not a path",
                self.bucket
            ));
        }
        Ok(())
    }
}

/// Work queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Queue name
    #[serde(default)]
    pub name: String,

    /// Lease length; must exceed the worst-case processing time of one item
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,

    /// Receive count at which a soft-failed item is deleted instead of released
    ///
    /// `1` deletes on the first soft failure.
    #[serde(default = "default_max_receives")]
    pub max_receives: u32,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("queue.name cannot be empty".to_string());
        }
        // SQS caps visibility timeouts at 12 hours
        if self.visibility_timeout_secs == 0 || self.visibility_timeout_secs > 43_200 {
            return Err(format!(
                "queue.visibility_timeout_secs must be between 1 and 43200, got {}",
                self.visibility_timeout_secs
            ));
        }
        if self.max_receives == 0 {
            return Err("queue.max_receives must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
            max_receives: default_max_receives(),
        }
    }
}

/// Local staging directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Where archives are downloaded and unpacked
    #[serde(default = "default_download_dir")]
    pub download_dir: String,

    /// Where converted outputs are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl StagingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.download_dir.is_empty() {
            return Err("staging.download_dir cannot be empty".to_string());
        }
        if self.output_dir.is_empty() {
            return Err("staging.output_dir cannot be empty".to_string());
        }
        if self.download_dir == self.output_dir {
            return Err(
                "staging.download_dir and staging.output_dir must be different directories"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            output_dir: default_output_dir(),
        }
    }
}

/// Per-item processing switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Reprocess and republish scenes that are already published
    #[serde(default = "default_true")]
    pub overwrite: bool,

    /// Clear both staging directories after each item
    #[serde(default = "default_true")]
    pub cleanup: bool,

    /// Minimum number of converted rasters for a valid dataset
    #[serde(default = "default_min_outputs")]
    pub min_outputs: usize,
}

impl ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.min_outputs == 0 {
            return Err("processing.min_outputs must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            overwrite: true,
            cleanup: true,
            min_outputs: default_min_outputs(),
        }
    }
}

/// Raster conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Path or name of the `gdal_translate` executable
    #[serde(default = "default_gdal_translate_bin")]
    pub gdal_translate_bin: String,

    /// Tile edge length in pixels
    #[serde(default = "default_block_size")]
    pub block_size: u32,

    /// DEFLATE level (1-9)
    #[serde(default = "default_compression_level")]
    pub compression_level: u8,

    /// TIFF predictor (1 none, 2 horizontal differencing, 3 floating point)
    #[serde(default = "default_predictor")]
    pub predictor: u8,

    /// Number of reduced-resolution overviews
    #[serde(default = "default_overview_levels")]
    pub overview_levels: u32,

    /// Overview resampling method
    #[serde(default = "default_overview_resampling")]
    pub overview_resampling: String,
}

impl TransformConfig {
    fn validate(&self) -> Result<(), String> {
        if self.gdal_translate_bin.is_empty() {
            return Err("transform.gdal_translate_bin cannot be empty".to_string());
        }
        if self.block_size == 0 || self.block_size % 16 != 0 {
            return Err(format!(
                "transform.block_size must be a positive multiple of 16, got {}",
                self.block_size
            ));
        }
        if !(1..=9).contains(&self.compression_level) {
            return Err(format!(
                "transform.compression_level must be between 1 and 9, got {}",
                self.compression_level
            ));
        }
        if !(1..=3).contains(&self.predictor) {
            return Err(format!(
                "transform.predictor must be 1, 2 or 3, got {}",
                self.predictor
            ));
        }
        let valid_resampling = ["nearest", "average", "bilinear", "cubic", "mode"];
        if !valid_resampling.contains(&self.overview_resampling.as_str()) {
            return Err(format!(
                "Invalid transform.overview_resampling '{}'. Must be one of: {}",
                self.overview_resampling,
                valid_resampling.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            gdal_translate_bin: default_gdal_translate_bin(),
            block_size: default_block_size(),
            compression_level: default_compression_level(),
            predictor: default_predictor(),
            overview_levels: default_overview_levels(),
            overview_resampling: default_overview_resampling(),
        }
    }
}

/// AWS client configuration
///
/// Anything left unset falls through to the standard AWS provider chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region override
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override for S3/SQS-compatible services (MinIO, LocalStack)
    #[serde(default)]
    pub endpoint_url: Option<String>,

    /// Use path-style S3 addressing
    #[serde(default)]
    pub force_path_style: bool,

    /// Static access key id
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub secret_access_key: Option<SecretString>,
}

impl AwsConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(
                "aws.access_key_id and aws.secret_access_key must be set together".to_string(),
            );
        }

        if let Some(endpoint) = &self.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err("aws.endpoint_url must start with http:// or https://".to_string());
            }
            if *environment == Environment::Production && endpoint.starts_with("http://") {
                return Err(
                    "Plain-HTTP endpoints cannot be used in production environments".to_string(),
                );
            }
        }

        Ok(())
    }

    /// Whether static credentials are configured
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

/// Worker loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Keep polling when the queue is empty instead of exiting
    #[serde(default)]
    pub follow: bool,

    /// Sleep between polls of an empty queue in follow mode
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Stop after this many fatal errors in a row
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: usize,
}

impl WorkerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.poll_interval_secs == 0 {
            return Err("worker.poll_interval_secs must be > 0".to_string());
        }
        if self.max_consecutive_failures == 0 {
            return Err("worker.max_consecutive_failures must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            follow: false,
            poll_interval_secs: default_poll_interval_secs(),
            max_consecutive_failures: default_max_consecutive_failures(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_visibility_timeout_secs() -> u64 {
    1000
}

fn default_max_receives() -> u32 {
    1
}

fn default_download_dir() -> String {
    "data/download".to_string()
}

fn default_output_dir() -> String {
    "data/out".to_string()
}

fn default_min_outputs() -> usize {
    7
}

fn default_gdal_translate_bin() -> String {
    "gdal_translate".to_string()
}

fn default_block_size() -> u32 {
    512
}

fn default_compression_level() -> u8 {
    9
}

fn default_predictor() -> u8 {
    2
}

fn default_overview_levels() -> u32 {
    5
}

fn default_overview_resampling() -> String {
    "average".to_string()
}

fn default_poll_interval_secs() -> u64 {
    20
}

fn default_max_consecutive_failures() -> usize {
    5
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn valid_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.source.bucket = "landsat-in".to_string();
        config.destination.bucket = "landsat-out".to_string();
        config.queue.name = "landsat-to-cog".to_string();
        config
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert!(config.processing.overwrite);
        assert!(config.processing.cleanup);
        assert_eq!(config.processing.min_outputs, 7);
        assert_eq!(config.queue.visibility_timeout_secs, 1000);
        assert_eq!(config.queue.max_receives, 1);
        assert_eq!(config.staging.download_dir, "data/download");
        assert_eq!(config.staging.output_dir, "data/out");
        assert_eq!(config.transform.block_size, 512);
        assert_eq!(config.transform.compression_level, 9);
        assert_eq!(config.transform.predictor, 2);
        assert_eq!(config.transform.overview_levels, 5);
        assert_eq!(config.transform.overview_resampling, "average");
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_bucket_fails() {
        let mut config = valid_config();
        config.source.bucket.clear();
        let err = config.validate().unwrap_err();
        assert!(err.contains("source.bucket"));
    }

    #[test]
    fn test_missing_queue_fails() {
        let mut config = valid_config();
        config.queue.name.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_visibility_timeout_bounds() {
        let mut config = valid_config();
        config.queue.visibility_timeout_secs = 0;
        assert!(config.validate().is_err());
        config.queue.visibility_timeout_secs = 43_201;
        assert!(config.validate().is_err());
        config.queue.visibility_timeout_secs = 43_200;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_staging_dirs_must_differ() {
        let mut config = valid_config();
        config.staging.output_dir = config.staging.download_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_transform_validation() {
        let mut config = valid_config();
        config.transform.compression_level = 10;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.transform.block_size = 500;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.transform.overview_resampling = "lanczos2".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aws_credentials_must_be_paired() {
        let mut config = valid_config();
        config.aws.access_key_id = Some("AKIA".to_string());
        assert!(config.validate().is_err());

        config.aws.secret_access_key = Some(secret_string("secret".to_string()));
        assert!(config.validate().is_ok());
        assert!(config.aws.has_static_credentials());
    }

    #[test]
    fn test_plain_http_endpoint_rejected_in_production() {
        let mut config = valid_config();
        config.aws.endpoint_url = Some("http://localhost:4566".to_string());
        assert!(config.validate().is_ok());

        config.environment = Environment::Production;
        let err = config.validate().unwrap_err();
        assert!(err.contains("production"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }
}

//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing landsat-cog configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your buckets and queue", self.output);
                println!("  2. Make sure gdal_translate (GDAL 3.1+) is on PATH");
                println!("  3. Provide AWS credentials via the usual provider chain");
                println!("  4. Validate configuration: landsat-cog validate-config");
                println!("  5. Seed the queue: landsat-cog enqueue --filter LE07 --limit 10");
                println!("  6. Process: landsat-cog run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# landsat-cog configuration

[application]
log_level = "info"

[source]
bucket = "landsat-ard-in"
prefix = "espa/orders"

[destination]
bucket = "landsat-cog-out"
prefix = "cogs"

[queue]
name = "landsat-to-cog"
visibility_timeout_secs = 1000
max_receives = 1

[staging]
download_dir = "data/download"
output_dir = "data/out"

[processing]
overwrite = true
cleanup = true
min_outputs = 7

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# landsat-cog configuration
#
# Every value can be overridden from the environment. The short names
# IN_BUCKET, IN_PATH, OUT_BUCKET, OUT_PATH, QUEUE, WORKDIR, OUTDIR,
# OVERWRITE and CLEANUP cover the common settings; everything else uses
# LANDSAT_COG_<SECTION>_<KEY>, e.g. LANDSAT_COG_AWS_REGION.
#
# Values may reference environment variables with ${VAR_NAME}.

# development | staging | production
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Buckets
# ============================================================================
[source]
# Bucket holding the ESPA archives (IN_BUCKET)
bucket = "landsat-ard-in"

# Prefix used by `landsat-cog enqueue` (IN_PATH)
prefix = "espa/orders"

[destination]
# Bucket outputs are published to (OUT_BUCKET, defaults to IN_BUCKET)
bucket = "landsat-cog-out"

# Root of the published layout (OUT_PATH):
#   {prefix}/{satellite}/{path}/{row}/{YYYY}/{MM}/{DD}/{file}
prefix = "cogs"

# ============================================================================
# Work Queue
# ============================================================================
[queue]
# Queue name (QUEUE)
name = "landsat-to-cog"

# Lease length in seconds; must exceed the time to process one archive
visibility_timeout_secs = 1000

# Receive count at which a soft-failed item is deleted.
# 1 deletes on the first failure; higher values give corrupt downloads
# another chance before the message is dropped.
max_receives = 1

# ============================================================================
# Staging
# ============================================================================
[staging]
# Archive download and unpack directory (WORKDIR)
download_dir = "data/download"

# Converted output directory (OUTDIR)
output_dir = "data/out"

# ============================================================================
# Processing
# ============================================================================
[processing]
# Republish scenes whose descriptor already exists (OVERWRITE)
overwrite = true

# Clear both staging directories after each item (CLEANUP)
cleanup = true

# Minimum converted rasters for a valid dataset
min_outputs = 7

# ============================================================================
# COG Conversion
# ============================================================================
[transform]
gdal_translate_bin = "gdal_translate"
block_size = 512
compression_level = 9
predictor = 2
overview_levels = 5
overview_resampling = "average"

# ============================================================================
# AWS
# ============================================================================
[aws]
# region = "ap-southeast-2"

# S3/SQS-compatible endpoint, e.g. LocalStack
# endpoint_url = "http://localhost:4566"
# force_path_style = true

# Static credentials; leave unset to use the default provider chain
# access_key_id = "${AWS_ACCESS_KEY_ID}"
# secret_access_key = "${AWS_SECRET_ACCESS_KEY}"

# ============================================================================
# Worker Loop
# ============================================================================
[worker]
# Keep polling an empty queue instead of exiting
follow = false

# Seconds between polls of an empty queue
poll_interval_secs = 20

# Stop after this many fatal errors in a row
max_consecutive_failures = 5

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "logs"

# daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

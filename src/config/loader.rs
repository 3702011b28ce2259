//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PipelineConfig;
use super::secret::secret_string;
use crate::domain::errors::PipelineError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "landsat-cog.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PipelineConfig
/// 4. Applies environment variable overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use landsat_cog::config::loader::load_config;
///
/// let config = load_config("landsat-cog.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PipelineError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PipelineError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: PipelineConfig = toml::from_str(&contents)
        .map_err(|e| PipelineError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from defaults and environment variables only
///
/// Used when no configuration file is present, so a container can be
/// configured with `IN_BUCKET`, `QUEUE` and friends alone.
pub fn load_from_env() -> Result<PipelineConfig> {
    let mut config = PipelineConfig::default();
    finish(&mut config)?;
    Ok(config)
}

/// Loads `path` if it exists, otherwise falls back to [`load_from_env`]
///
/// Only the default file name may be missing; an explicitly named file that
/// doesn't exist is an error.
pub fn load_config_or_env(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    if !path.exists() && path == Path::new(DEFAULT_CONFIG_FILE) {
        tracing::debug!(
            path = %path.display(),
            "No configuration file, using defaults and environment"
        );
        return load_from_env();
    }
    load_config(path)
}

fn finish(config: &mut PipelineConfig) -> Result<()> {
    apply_env_overrides(config)?;

    config.validate().map_err(|e| {
        PipelineError::Configuration(format!("Configuration validation failed: {}", e))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PipelineError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        // Don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PipelineError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Parses a boolean switch from the environment
///
/// Accepts `true/false`, `1/0` and `yes/no` in any case, so both `True`
/// and `true` work.
fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(PipelineError::Configuration(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        PipelineError::Configuration(format!("{name} must be a number, got '{value}'"))
    })
}

/// Applies environment variable overrides
///
/// The short deployment names (`IN_BUCKET`, `IN_PATH`, `OUT_BUCKET`,
/// `OUT_PATH`, `QUEUE`, `WORKDIR`, `OUTDIR`, `OVERWRITE`, `CLEANUP`) cover the
/// common settings; everything else uses the `LANDSAT_COG_<SECTION>_<KEY>`
/// pattern.
fn apply_env_overrides(config: &mut PipelineConfig) -> Result<()> {
    // Source and destination
    if let Ok(val) = std::env::var("IN_BUCKET") {
        config.source.bucket = val;
    }
    if let Ok(val) = std::env::var("IN_PATH") {
        config.source.prefix = val;
    }
    if let Ok(val) = std::env::var("OUT_BUCKET") {
        config.destination.bucket = val;
    }
    if let Ok(val) = std::env::var("OUT_PATH") {
        config.destination.prefix = val;
    }
    // Output bucket defaults to the input bucket
    if config.destination.bucket.is_empty() {
        config.destination.bucket = config.source.bucket.clone();
    }

    // Queue
    if let Ok(val) = std::env::var("QUEUE") {
        config.queue.name = val;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_QUEUE_VISIBILITY_TIMEOUT_SECS") {
        config.queue.visibility_timeout_secs =
            parse_number("LANDSAT_COG_QUEUE_VISIBILITY_TIMEOUT_SECS", &val)?;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_QUEUE_MAX_RECEIVES") {
        config.queue.max_receives = parse_number("LANDSAT_COG_QUEUE_MAX_RECEIVES", &val)?;
    }

    // Staging
    if let Ok(val) = std::env::var("WORKDIR") {
        config.staging.download_dir = val;
    }
    if let Ok(val) = std::env::var("OUTDIR") {
        config.staging.output_dir = val;
    }

    // Processing
    if let Ok(val) = std::env::var("OVERWRITE") {
        config.processing.overwrite = parse_bool("OVERWRITE", &val)?;
    }
    if let Ok(val) = std::env::var("CLEANUP") {
        config.processing.cleanup = parse_bool("CLEANUP", &val)?;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_PROCESSING_MIN_OUTPUTS") {
        config.processing.min_outputs = parse_number("LANDSAT_COG_PROCESSING_MIN_OUTPUTS", &val)?;
    }

    // Transform
    if let Ok(val) = std::env::var("LANDSAT_COG_TRANSFORM_GDAL_TRANSLATE_BIN") {
        config.transform.gdal_translate_bin = val;
    }

    // AWS
    if let Ok(val) = std::env::var("LANDSAT_COG_AWS_REGION") {
        config.aws.region = Some(val);
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_AWS_ENDPOINT_URL") {
        config.aws.endpoint_url = Some(val);
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_AWS_FORCE_PATH_STYLE") {
        config.aws.force_path_style = parse_bool("LANDSAT_COG_AWS_FORCE_PATH_STYLE", &val)?;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_AWS_ACCESS_KEY_ID") {
        config.aws.access_key_id = Some(val);
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_AWS_SECRET_ACCESS_KEY") {
        config.aws.secret_access_key = Some(secret_string(val));
    }

    // Worker
    if let Ok(val) = std::env::var("LANDSAT_COG_WORKER_FOLLOW") {
        config.worker.follow = parse_bool("LANDSAT_COG_WORKER_FOLLOW", &val)?;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_WORKER_POLL_INTERVAL_SECS") {
        config.worker.poll_interval_secs =
            parse_number("LANDSAT_COG_WORKER_POLL_INTERVAL_SECS", &val)?;
    }

    // Application and logging
    if let Ok(val) = std::env::var("LANDSAT_COG_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("LANDSAT_COG_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("LANDSAT_COG_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

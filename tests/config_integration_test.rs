//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables hold ENV_MUTEX so they
//! don't see each other's overrides.

use landsat_cog::config::{load_config, load_from_env, Environment};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for var in [
        "IN_BUCKET",
        "IN_PATH",
        "OUT_BUCKET",
        "OUT_PATH",
        "QUEUE",
        "WORKDIR",
        "OUTDIR",
        "OVERWRITE",
        "CLEANUP",
        "LANDSAT_COG_QUEUE_MAX_RECEIVES",
        "LANDSAT_COG_APPLICATION_LOG_LEVEL",
        "LANDSAT_COG_AWS_ENDPOINT_URL",
        "TEST_LANDSAT_SECRET",
    ] {
        std::env::remove_var(var);
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
environment = "staging"

[application]
log_level = "debug"

[source]
bucket = "landsat-ard-in"
prefix = "espa/orders"

[destination]
bucket = "landsat-cog-out"
prefix = "cogs/v1"

[queue]
name = "landsat-to-cog"
visibility_timeout_secs = 1800
max_receives = 3

[staging]
download_dir = "/scratch/download"
output_dir = "/scratch/out"

[processing]
overwrite = false
cleanup = false
min_outputs = 8

[transform]
gdal_translate_bin = "/opt/gdal/bin/gdal_translate"
block_size = 256
overview_resampling = "nearest"

[aws]
region = "ap-southeast-2"
endpoint_url = "http://localhost:4566"
force_path_style = true

[worker]
follow = true
poll_interval_secs = 5
max_consecutive_failures = 3
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.source.bucket, "landsat-ard-in");
    assert_eq!(config.destination.prefix, "cogs/v1");
    assert_eq!(config.queue.visibility_timeout_secs, 1800);
    assert_eq!(config.queue.max_receives, 3);
    assert_eq!(config.staging.download_dir, "/scratch/download");
    assert!(!config.processing.overwrite);
    assert!(!config.processing.cleanup);
    assert_eq!(config.processing.min_outputs, 8);
    assert_eq!(config.transform.block_size, 256);
    assert_eq!(config.transform.compression_level, 9);
    assert_eq!(config.aws.region.as_deref(), Some("ap-southeast-2"));
    assert!(config.aws.force_path_style);
    assert!(config.worker.follow);
    assert_eq!(config.worker.poll_interval_secs, 5);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
bucket = "landsat-ard-in"

[queue]
name = "landsat-to-cog"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.environment, Environment::Development);
    // Output bucket defaults to the input bucket
    assert_eq!(config.destination.bucket, "landsat-ard-in");
    assert_eq!(config.destination.prefix, "");
    assert_eq!(config.queue.visibility_timeout_secs, 1000);
    assert_eq!(config.queue.max_receives, 1);
    assert_eq!(config.staging.download_dir, "data/download");
    assert_eq!(config.staging.output_dir, "data/out");
    assert!(config.processing.overwrite);
    assert!(config.processing.cleanup);
    assert_eq!(config.processing.min_outputs, 7);
    assert_eq!(config.transform.gdal_translate_bin, "gdal_translate");
}

#[test]
fn test_env_var_substitution() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_LANDSAT_SECRET", "s3cr3t");

    let file = write_config(
        r#"
[source]
bucket = "landsat-ard-in"

[queue]
name = "landsat-to-cog"

[aws]
access_key_id = "AKIDEXAMPLE"
secret_access_key = "${TEST_LANDSAT_SECRET}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(config.aws.has_static_credentials());

    cleanup_env_vars();
}

#[test]
fn test_env_var_substitution_missing_variable() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
bucket = "${TEST_LANDSAT_SECRET}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_LANDSAT_SECRET"));
}

#[test]
fn test_env_var_overrides() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("IN_BUCKET", "override-in");
    std::env::set_var("OUT_PATH", "override/out");
    std::env::set_var("QUEUE", "override-queue");
    std::env::set_var("OVERWRITE", "False");
    std::env::set_var("CLEANUP", "True");
    std::env::set_var("LANDSAT_COG_QUEUE_MAX_RECEIVES", "4");

    let file = write_config(
        r#"
[source]
bucket = "landsat-ard-in"

[destination]
bucket = "landsat-cog-out"

[queue]
name = "landsat-to-cog"

[processing]
overwrite = true
cleanup = false
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.source.bucket, "override-in");
    // An explicit output bucket is kept
    assert_eq!(config.destination.bucket, "landsat-cog-out");
    assert_eq!(config.destination.prefix, "override/out");
    assert_eq!(config.queue.name, "override-queue");
    assert!(!config.processing.overwrite);
    assert!(config.processing.cleanup);
    assert_eq!(config.queue.max_receives, 4);

    cleanup_env_vars();
}

#[test]
fn test_load_from_env_only() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("IN_BUCKET", "env-bucket");
    std::env::set_var("QUEUE", "env-queue");
    std::env::set_var("WORKDIR", "/tmp/work");

    let config = load_from_env().unwrap();

    assert_eq!(config.source.bucket, "env-bucket");
    assert_eq!(config.destination.bucket, "env-bucket");
    assert_eq!(config.queue.name, "env-queue");
    assert_eq!(config.staging.download_dir, "/tmp/work");

    cleanup_env_vars();
}

#[test]
fn test_load_from_env_requires_bucket_and_queue() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let err = load_from_env().unwrap_err();
    assert!(err.to_string().contains("source.bucket"), "{err}");

    std::env::set_var("IN_BUCKET", "env-bucket");
    let err = load_from_env().unwrap_err();
    assert!(err.to_string().contains("queue.name"), "{err}");

    cleanup_env_vars();
}

#[test]
fn test_invalid_boolean_override() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("IN_BUCKET", "env-bucket");
    std::env::set_var("QUEUE", "env-queue");
    std::env::set_var("OVERWRITE", "sometimes");

    let err = load_from_env().unwrap_err();
    assert!(err.to_string().contains("OVERWRITE"), "{err}");

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        (
            r#"
[source]
bucket = "landsat-ard-in"
[queue]
name = "q"
visibility_timeout_secs = 0
"#,
            "visibility_timeout_secs",
        ),
        (
            r#"
[source]
bucket = "landsat-ard-in"
[queue]
name = "q"
[processing]
min_outputs = 0
"#,
            "min_outputs",
        ),
        (
            r#"
environment = "production"
[source]
bucket = "landsat-ard-in"
[queue]
name = "q"
[aws]
endpoint_url = "http://localhost:4566"
"#,
            "Plain-HTTP",
        ),
        (
            r#"
[source]
bucket = "landsat-ard-in"
[queue]
name = "q"
[aws]
access_key_id = "AKIDEXAMPLE"
"#,
            "must be set together",
        ),
    ];

    for (content, expected) in cases {
        let file = write_config(content);
        let err = load_config(file.path()).unwrap_err();
        assert!(err.to_string().contains(expected), "{expected}: {err}");
    }
}

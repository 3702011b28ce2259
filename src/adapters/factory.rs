//! Client factory
//!
//! Builds the production store and queue clients from configuration. The
//! orchestrator never constructs clients itself; it receives them from here
//! (or from a test).

use crate::adapters::queue::{SqsWorkQueue, WorkQueue};
use crate::adapters::storage::{ObjectStore, S3ObjectStore};
use crate::config::{AwsConfig, PipelineConfig};
use crate::domain::Result;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Connected clients for one worker process
#[derive(Clone)]
pub struct Connections {
    /// Bucket archives are read from
    pub source: Arc<dyn ObjectStore>,

    /// Bucket outputs are published to
    pub destination: Arc<dyn ObjectStore>,

    /// Work queue
    pub queue: Arc<dyn WorkQueue>,
}

/// Load shared AWS configuration
///
/// Region, endpoint and static credentials from `aws` override the standard
/// provider chain; anything unset falls through to it.
pub async fn load_sdk_config(aws: &AwsConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &aws.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &aws.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key_id), Some(secret_access_key)) =
        (&aws.access_key_id, &aws.secret_access_key)
    {
        let credentials = Credentials::new(
            access_key_id,
            secret_access_key.expose_secret().as_ref(),
            None,
            None,
            "landsat-cog-config",
        );
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}

/// Create the store clients and resolve the queue
///
/// # Errors
///
/// Returns an error if the queue URL can't be resolved.
pub async fn connect(config: &PipelineConfig) -> Result<Connections> {
    let sdk_config = load_sdk_config(&config.aws).await;
    let s3_client = S3ObjectStore::client_from_sdk_config(&sdk_config, &config.aws);

    tracing::info!(
        source = %config.source.bucket,
        destination = %config.destination.bucket,
        queue = %config.queue.name,
        "Creating AWS clients"
    );

    let source = S3ObjectStore::new(s3_client.clone(), config.source.bucket.clone());
    let destination = S3ObjectStore::new(s3_client, config.destination.bucket.clone());

    let queue = connect_queue(&sdk_config, &config.queue.name).await?;

    Ok(Connections {
        source: Arc::new(source),
        destination: Arc::new(destination),
        queue,
    })
}

/// Resolve only the queue, for commands that don't touch the buckets
pub async fn connect_queue(sdk_config: &SdkConfig, name: &str) -> Result<Arc<dyn WorkQueue>> {
    let sqs_client = SqsWorkQueue::client_from_sdk_config(sdk_config);
    let queue = SqsWorkQueue::connect(sqs_client, name).await?;
    Ok(Arc::new(queue))
}

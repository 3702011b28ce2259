//! Amazon S3 implementation of [`ObjectStore`]

use super::traits::{KeyPage, ObjectStore};
use crate::config::AwsConfig;
use crate::domain::{Result, StorageError};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// S3 bucket handle
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Wrap an existing client
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build an S3 client from shared SDK configuration
    pub fn client_from_sdk_config(sdk_config: &SdkConfig, aws: &AwsConfig) -> Client {
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(aws.force_path_style)
            .build();
        Client::from_conf(s3_config)
    }
}

/// Content type for a published key
fn content_type_for(key: &str) -> Option<&'static str> {
    let lower = key.to_ascii_lowercase();
    if lower.ends_with(".tif") || lower.ends_with(".tiff") {
        Some("image/tiff; application=geotiff; profile=cloud-optimized")
    } else if lower.ends_with(".xml") {
        Some("application/xml")
    } else {
        None
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => Ok(false),
            Err(e) => Err(StorageError::LookupFailed {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            }
            .into()),
        }
    }

    #[instrument(skip(self, destination), fields(bucket = %self.bucket))]
    async fn download(&self, key: &str, destination: &Path) -> Result<u64> {
        let download_failed = |message: String| StorageError::DownloadFailed {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            message,
        };

        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(SdkError::ServiceError(err)) if err.err().is_no_such_key() => {
                return Err(StorageError::NotFound {
                    bucket: self.bucket.clone(),
                    key: key.to_string(),
                }
                .into())
            }
            Err(e) => return Err(download_failed(DisplayErrorContext(&e).to_string()).into()),
        };

        let mut reader = response.body.into_async_read();
        let mut file = tokio::fs::File::create(destination).await?;
        let bytes = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| download_failed(e.to_string()))?;
        file.flush().await?;
        file.sync_all().await?;

        debug!(
            "Downloaded {} bytes from s3://{}/{}",
            bytes, self.bucket, key
        );
        Ok(bytes)
    }

    #[instrument(skip(self, source), fields(bucket = %self.bucket))]
    async fn upload(&self, key: &str, source: &Path) -> Result<()> {
        let upload_failed = |message: String| StorageError::UploadFailed {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            message,
        };

        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| upload_failed(e.to_string()))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body);

        if let Some(content_type) = content_type_for(key) {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| upload_failed(DisplayErrorContext(&e).to_string()))?;

        debug!("Uploaded {} to s3://{}/{}", source.display(), self.bucket, key);
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<KeyPage> {
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix);

        if let Some(token) = continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| StorageError::ListFailed {
            bucket: self.bucket.clone(),
            prefix: prefix.to_string(),
            message: DisplayErrorContext(&e).to_string(),
        })?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(|k| k.to_string()))
            .collect();

        let next_token = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|t| t.to_string())
        } else {
            None
        };

        Ok(KeyPage { keys, next_token })
    }
}

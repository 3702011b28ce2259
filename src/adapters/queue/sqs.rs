//! Amazon SQS implementation of [`WorkQueue`]

use super::traits::{Lease, WorkQueue};
use crate::domain::{QueueError, Result, WorkItem};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::{MessageSystemAttributeName, QueueAttributeName};
use aws_sdk_sqs::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// SQS queue handle with its resolved URL
#[derive(Clone)]
pub struct SqsWorkQueue {
    client: Client,
    name: String,
    url: String,
}

impl SqsWorkQueue {
    /// Resolve the queue URL for `name` and return a handle
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::QueueNotFound`] if the name can't be resolved.
    pub async fn connect(client: Client, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let response = client
            .get_queue_url()
            .queue_name(&name)
            .send()
            .await
            .map_err(|e| {
                QueueError::QueueNotFound(format!("{name}: {}", DisplayErrorContext(&e)))
            })?;

        let url = response
            .queue_url()
            .ok_or_else(|| QueueError::QueueNotFound(format!("{name}: no URL returned")))?
            .to_string();

        debug!(queue = %name, url = %url, "Resolved queue URL");
        Ok(Self { client, name, url })
    }

    /// Build an SQS client from shared SDK configuration
    pub fn client_from_sdk_config(sdk_config: &SdkConfig) -> Client {
        Client::new(sdk_config)
    }

    /// Queue URL
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn discard(&self, receipt_handle: &str) -> Result<()> {
        self.client
            .delete_message()
            .queue_url(&self.url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| QueueError::DeleteFailed(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl WorkQueue for SqsWorkQueue {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(queue = %self.name))]
    async fn receive(&self, visibility_timeout: Duration) -> Result<Option<Lease>> {
        let visibility_secs = i32::try_from(visibility_timeout.as_secs()).unwrap_or(i32::MAX);

        let output = self
            .client
            .receive_message()
            .queue_url(&self.url)
            .max_number_of_messages(1)
            .visibility_timeout(visibility_secs)
            .message_system_attribute_names(MessageSystemAttributeName::ApproximateReceiveCount)
            .send()
            .await
            .map_err(|e| QueueError::ReceiveFailed(DisplayErrorContext(&e).to_string()))?;

        let Some(message) = output.messages().first() else {
            return Ok(None);
        };

        let receipt_handle = message
            .receipt_handle()
            .ok_or_else(|| QueueError::InvalidMessage("message has no receipt handle".into()))?
            .to_string();

        let body = message.body().unwrap_or_default();
        let item = match WorkItem::new(body) {
            Ok(item) => item,
            Err(reason) => {
                // A body that names no key can never succeed; drop it so it
                // doesn't come back forever.
                error!(
                    message_id = message.message_id().unwrap_or_default(),
                    reason = %reason,
                    "Discarding message with unusable body"
                );
                self.discard(&receipt_handle).await?;
                return Err(QueueError::InvalidMessage(reason).into());
            }
        };

        let receive_count = message
            .attributes()
            .and_then(|attrs| attrs.get(&MessageSystemAttributeName::ApproximateReceiveCount))
            .and_then(|count| count.parse().ok())
            .unwrap_or(1);

        Ok(Some(Lease {
            item,
            receipt_handle,
            receive_count,
        }))
    }

    #[instrument(skip(self, lease), fields(queue = %self.name, key = %lease.item))]
    async fn acknowledge(&self, lease: &Lease) -> Result<()> {
        self.discard(&lease.receipt_handle).await
    }

    #[instrument(skip(self, lease), fields(queue = %self.name, key = %lease.item))]
    async fn release(&self, lease: &Lease) -> Result<()> {
        self.client
            .change_message_visibility()
            .queue_url(&self.url)
            .receipt_handle(&lease.receipt_handle)
            .visibility_timeout(0)
            .send()
            .await
            .map_err(|e| QueueError::ReleaseFailed(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }

    async fn depth(&self) -> Result<usize> {
        let output = self
            .client
            .get_queue_attributes()
            .queue_url(&self.url)
            .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
            .send()
            .await
            .map_err(|e| QueueError::AttributesFailed(DisplayErrorContext(&e).to_string()))?;

        let count = output
            .attributes()
            .and_then(|attrs| attrs.get(&QueueAttributeName::ApproximateNumberOfMessages))
            .ok_or_else(|| {
                QueueError::AttributesFailed("ApproximateNumberOfMessages missing".to_string())
            })?;

        count.parse().map_err(|_| {
            QueueError::AttributesFailed(format!("non-numeric message count '{count}'")).into()
        })
    }

    #[instrument(skip(self), fields(queue = %self.name))]
    async fn enqueue(&self, item: &WorkItem) -> Result<()> {
        self.client
            .send_message()
            .queue_url(&self.url)
            .message_body(item.as_str())
            .send()
            .await
            .map_err(|e| QueueError::SendFailed(DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

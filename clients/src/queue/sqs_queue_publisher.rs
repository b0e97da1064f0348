use anyhow::anyhow;
use async_trait::async_trait;
use rusoto_core::RusotoError;
use rusoto_sqs::{SendMessageError, SendMessageRequest, Sqs};

use super::{QueuePublisher, QueuePublisherError};

pub struct SqsQueuePublisher<S: Sqs + Sync + Send> {
    queue_url: String,
    sqs_client: S,
}

impl<S: Sqs + Sync + Send> SqsQueuePublisher<S> {
    pub fn new(queue_url: String, sqs_client: S) -> Self {
        Self {
            queue_url,
            sqs_client,
        }
    }
}

#[async_trait]
impl<S: Sqs + Sync + Send> QueuePublisher for SqsQueuePublisher<S> {
    async fn publish(&self, message_body: String) -> Result<(), QueuePublisherError> {
        let result = self
            .sqs_client
            .send_message(SendMessageRequest {
                message_body,
                queue_url: self.queue_url.clone(),
                ..SendMessageRequest::default()
            })
            .await
            .map_err(classify_send_error)?;

        tracing::debug!(
            message_id = ?result.message_id,
            "message published to {}",
            self.queue_url
        );

        Ok(())
    }
}

fn classify_send_error(error: RusotoError<SendMessageError>) -> QueuePublisherError {
    match error {
        RusotoError::HttpDispatch(e) => {
            QueuePublisherError::Unreachable(anyhow!(e).context("unable to reach SQS"))
        }
        RusotoError::Credentials(e) => {
            QueuePublisherError::Unreachable(anyhow!(e).context("unable to sign SQS request"))
        }
        other => QueuePublisherError::Rejected(anyhow!("unable to send message to SQS: {other}")),
    }
}

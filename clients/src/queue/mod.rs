use async_trait::async_trait;

pub mod sqs_queue_publisher;

#[cfg(feature = "test_mocks")]
use mockall::mock;

#[derive(Debug, thiserror::Error)]
pub enum QueuePublisherError {
    /// The queue API could not be reached at all (connection, DNS or credentials failure).
    #[error("queue unreachable: {0:#}")]
    Unreachable(anyhow::Error),
    /// The queue was reached but did not accept the message.
    #[error("message rejected by the queue: {0:#}")]
    Rejected(anyhow::Error),
}

impl QueuePublisherError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, QueuePublisherError::Unreachable(_))
    }
}

/// Publishes independent messages to the durable queue feeding the delivery worker.
#[async_trait]
pub trait QueuePublisher: Sync + Send {
    async fn publish(&self, message_body: String) -> Result<(), QueuePublisherError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub QueuePublisher {}

    #[async_trait]
    impl QueuePublisher for QueuePublisher {
        async fn publish(&self, message_body: String) -> Result<(), QueuePublisherError>;
    }
}

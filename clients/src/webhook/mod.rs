use async_trait::async_trait;
use model::inventory::InventoryRecord;

pub mod http_webhook_client;

#[cfg(feature = "test_mocks")]
use mockall::mock;

#[derive(Debug, thiserror::Error)]
pub enum WebhookClientError {
    #[error("webhook request failed: {0:#}")]
    Transport(anyhow::Error),
    #[error("webhook answered with unexpected status {0}")]
    UnexpectedStatus(u16),
}

/// Notifies the external system that a product reached its stock threshold.
#[async_trait]
pub trait WebhookClient: Sync + Send {
    async fn notify(&self, record: &InventoryRecord) -> Result<(), WebhookClientError>;
}

#[cfg(feature = "test_mocks")]
mock! {
    pub WebhookClient {}

    #[async_trait]
    impl WebhookClient for WebhookClient {
        async fn notify(&self, record: &InventoryRecord) -> Result<(), WebhookClientError>;
    }
}

mod config;
mod dtos;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use aws_lambda_events::event::sqs::SqsEvent;
use clients::webhook::http_webhook_client::HttpWebhookClient;
use clients::webhook::WebhookClient;
use common::config::ConfigLoader;
use config::Config;
use dtos::into_queue_messages;
use model::batch::BatchResponse;
use stock_alert_relay::batch::Deadline;
use stock_alert_relay::delivery::deliver;
use stock_alert_relay::result::error::{RelayError, Result};
use stock_alert_relay::{lambda_main, lambda_structure::lambda_trait::Lambda};
use validator::Validate;

pub struct Persisted {
    pub webhook: Arc<dyn WebhookClient>,
}

pub struct WebhookDelivery;

#[async_trait]
impl Lambda for WebhookDelivery {
    type PersistedMemory = Persisted;
    type InputBody = SqsEvent;
    type Output = BatchResponse;
    type Error = RelayError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;
        config.validate()?;

        let webhook = HttpWebhookClient::new(&config.webhook_url)
            .map_err(|e| anyhow!(e).context("unable to build webhook client"))?;
        tracing::info!(endpoint = webhook.endpoint(), "webhook client ready");

        Ok(Persisted {
            webhook: Arc::new(webhook),
        })
    }

    async fn run(
        request: Self::InputBody,
        state: &Self::PersistedMemory,
        deadline: Deadline,
    ) -> Result<Self::Output> {
        let messages = into_queue_messages(request);
        let report = deliver(messages, state.webhook.clone(), deadline).await;

        Ok(report.into_response())
    }
}

lambda_main!(WebhookDelivery);

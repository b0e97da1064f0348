mod config;
mod dtos;

use std::sync::Arc;

use async_trait::async_trait;
use clients::queue::sqs_queue_publisher::SqsQueuePublisher;
use clients::queue::QueuePublisher;
use common::aws_clients::sqs::get_sqs_client;
use common::config::aws_client_config::AwsClientConfig;
use common::config::ConfigLoader;
use config::Config;
use dtos::DynamoDbStreamEvent;
use model::batch::BatchResponse;
use stock_alert_relay::batch::Deadline;
use stock_alert_relay::forwarder::forward;
use stock_alert_relay::result::error::RelayError;
use stock_alert_relay::result::error::Result;
use stock_alert_relay::{lambda_main, lambda_structure::lambda_trait::Lambda};
use validator::Validate;

pub struct Persisted {
    pub publisher: Arc<dyn QueuePublisher>,
}

pub struct StreamForwarder;

#[async_trait]
impl Lambda for StreamForwarder {
    type PersistedMemory = Persisted;
    type InputBody = DynamoDbStreamEvent;
    type Output = BatchResponse;
    type Error = RelayError;

    async fn bootstrap() -> Result<Self::PersistedMemory> {
        let config = ConfigLoader::load_default::<Config>()?;
        config.validate()?;

        let aws_client_config = ConfigLoader::load_default::<AwsClientConfig>()?;
        let sqs_client = get_sqs_client(&aws_client_config)?;

        Ok(Persisted {
            publisher: Arc::new(SqsQueuePublisher::new(config.queue_url, sqs_client)),
        })
    }

    async fn run(
        request: Self::InputBody,
        state: &Self::PersistedMemory,
        deadline: Deadline,
    ) -> Result<Self::Output> {
        let records = request.into_change_records();
        let report = forward(records, state.publisher.clone(), deadline).await?;

        Ok(report.into_response())
    }
}

lambda_main!(StreamForwarder);

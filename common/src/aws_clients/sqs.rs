use crate::config::aws_client_config::AwsClientConfig;
use anyhow::{anyhow, Context};
use rusoto_core::credential::EnvironmentProvider;
use rusoto_sqs::SqsClient;

pub fn get_sqs_client(config: &AwsClientConfig) -> anyhow::Result<SqsClient> {
    let request_dispatcher = rusoto_core::request::HttpClient::new()
        .map_err(|e| anyhow!("Unable to build Rusoto HTTP Client: {e}"))?;
    let region = config.region().context("building SQS client")?;

    Ok(SqsClient::new_with(
        request_dispatcher,
        EnvironmentProvider::default(),
        region,
    ))
}

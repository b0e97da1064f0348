//! Delivers queued threshold crossings to the external webhook.

use std::sync::Arc;

use clients::webhook::{WebhookClient, WebhookClientError};
use model::inventory::{InventoryRecord, InventoryRecordError};
use model::queue::QueueMessage;
use model::stream::QueuedChange;

use crate::batch::{process_concurrently, BatchReport, Deadline};

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("message has no body")]
    MissingBody,
    #[error("message body is not a queued change: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidRecord(#[from] InventoryRecordError),
    #[error(transparent)]
    Webhook(#[from] WebhookClientError),
}

/// Decodes a queue message body into the inventory record it carries. The `streamId` kept for
/// correlation is dropped.
pub fn decode_message(body: &str) -> Result<InventoryRecord, DeliveryError> {
    let QueuedChange {
        stream_id,
        new_image,
    } = serde_json::from_str(body)?;

    tracing::debug!(stream_id = stream_id.as_str(), "decoded queued change");

    Ok(InventoryRecord::from_image(new_image)?)
}

/// Posts every message of the batch to the webhook concurrently. Failures are keyed by message
/// id; no attempt is retried here, redelivery is left to the queue.
pub async fn deliver(
    messages: Vec<QueueMessage>,
    webhook: Arc<dyn WebhookClient>,
    deadline: Deadline,
) -> BatchReport<DeliveryError> {
    let items = messages
        .into_iter()
        .map(|message| (message.message_id.clone(), message))
        .collect();

    let report = process_concurrently(items, deadline, |message| {
        let webhook = webhook.clone();
        async move { deliver_message(webhook.as_ref(), message).await }
    })
    .await;

    tracing::info!(
        attempted = report.attempted,
        failed = report.failures.len(),
        "message batch delivered"
    );

    report
}

async fn deliver_message(
    webhook: &dyn WebhookClient,
    message: QueueMessage,
) -> Result<(), DeliveryError> {
    if let Some(receive_count) = message.receive_count {
        tracing::info!(
            message_id = message.message_id.as_str(),
            receive_count,
            "delivering message (receive count {receive_count})"
        );
    }

    let body = message.body.ok_or(DeliveryError::MissingBody)?;
    let record = decode_message(&body)?;

    webhook.notify(&record).await?;

    tracing::info!(
        product_id = record.product_id.as_str(),
        quantity = record.quantity,
        threshold = record.threshold,
        "webhook notified"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::FailureReason;
    use clients::webhook::http_webhook_client::HttpWebhookClient;
    use clients::webhook::MockWebhookClient;
    use common::test_tools::stream::inventory_image;
    use rstest::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn queued_body(stream_id: &str, product_id: &str) -> String {
        let mut body = inventory_image(product_id, 3, 5);
        body["streamId"] = json!(stream_id);
        body.to_string()
    }

    fn message(message_id: &str, body: Option<String>) -> QueueMessage {
        QueueMessage {
            message_id: message_id.to_owned(),
            body,
            receive_count: Some(1),
        }
    }

    #[test]
    fn decode_strips_stream_id_and_table_keys() {
        let record = decode_message(&queued_body("111", "prd_1")).unwrap();

        assert_eq!(
            record,
            InventoryRecord {
                product_id: "prd_1".to_owned(),
                product_name: "prd_1-name".to_owned(),
                quantity: 3,
                threshold: 5,
            }
        );
    }

    #[rstest]
    #[case::not_json("not json")]
    #[case::json_array("[1, 2]")]
    fn decode_rejects_malformed_bodies(#[case] body: &str) {
        assert!(matches!(
            decode_message(body).unwrap_err(),
            DeliveryError::MalformedBody(_)
        ));
    }

    #[test]
    fn decode_accepts_body_without_stream_id() {
        let mut body = inventory_image("prd_7", 1, 2);
        body.as_object_mut().unwrap().remove("sk");

        let record = decode_message(&body.to_string()).unwrap();

        assert_eq!(record.product_id, "prd_7");
        assert_eq!(record.quantity, 1);
    }

    #[test]
    fn decode_rejects_incomplete_records() {
        let body = json!({ "streamId": "111", "productId": { "S": "prd_1" } }).to_string();

        assert!(matches!(
            decode_message(&body).unwrap_err(),
            DeliveryError::InvalidRecord(_)
        ));
    }

    #[tokio::test]
    async fn every_message_is_posted_once() {
        let mut webhook = MockWebhookClient::new();
        webhook
            .expect_notify()
            .withf(|record| record.product_id == "prd_1")
            .times(1)
            .returning(|_| Ok(()));
        webhook
            .expect_notify()
            .withf(|record| record.product_id == "prd_2")
            .times(1)
            .returning(|_| Ok(()));

        let messages = vec![
            message("msg-1", Some(queued_body("1", "prd_1"))),
            message("msg-2", Some(queued_body("2", "prd_2"))),
        ];

        let report = deliver(messages, Arc::new(webhook), Deadline::unbounded()).await;

        assert_eq!(report.attempted, 2);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn undecodable_messages_fail_without_reaching_the_webhook() {
        let mut webhook = MockWebhookClient::new();
        webhook
            .expect_notify()
            .withf(|record| record.product_id == "prd_3")
            .times(1)
            .returning(|_| Ok(()));

        let messages = vec![
            message("msg-1", None),
            message("msg-2", Some("{".to_owned())),
            message("msg-3", Some(queued_body("3", "prd_3"))),
        ];

        let report = deliver(messages, Arc::new(webhook), Deadline::unbounded()).await;

        assert_eq!(report.failed_identifiers(), vec!["msg-1", "msg-2"]);
        assert!(matches!(
            report.failures[0].reason,
            FailureReason::Failed(DeliveryError::MissingBody)
        ));
    }

    #[tokio::test]
    async fn webhook_errors_fail_only_their_message() {
        let mut webhook = MockWebhookClient::new();
        webhook.expect_notify().times(3).returning(|record| {
            if record.product_id == "prd_2" {
                Err(WebhookClientError::UnexpectedStatus(503))
            } else {
                Ok(())
            }
        });

        let messages = (1..=3)
            .map(|n| message(&format!("msg-{n}"), Some(queued_body("1", &format!("prd_{n}")))))
            .collect();

        let report = deliver(messages, Arc::new(webhook), Deadline::unbounded()).await;

        assert_eq!(report.failed_identifiers(), vec!["msg-2"]);
    }

    #[tokio::test]
    async fn server_error_on_one_message_fails_only_that_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(body_partial_json(json!({ "productId": "prd_2" })))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let webhook = Arc::new(HttpWebhookClient::new(&server.uri()).unwrap());
        let messages = (1..=3)
            .map(|n| message(&format!("msg-{n}"), Some(queued_body("1", &format!("prd_{n}")))))
            .collect();

        let report = deliver(messages, webhook, Deadline::unbounded()).await;

        assert_eq!(report.failed_identifiers(), vec!["msg-2"]);
        assert!(matches!(
            report.failures[0].reason,
            FailureReason::Failed(DeliveryError::Webhook(WebhookClientError::UnexpectedStatus(
                500
            )))
        ));
    }
}

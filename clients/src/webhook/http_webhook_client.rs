use anyhow::anyhow;
use async_trait::async_trait;
use model::inventory::InventoryRecord;
use reqwest::redirect::Policy;

use super::{WebhookClient, WebhookClientError};

const WEBHOOK_PATH: &str = "webhook";

/// Posts inventory records as JSON to `{webhook_url}/webhook`.
///
/// Any status in the 200-399 range counts as delivered. Redirects are not followed, a 3xx
/// answer is taken as the receiver's acknowledgement.
pub struct HttpWebhookClient {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpWebhookClient {
    pub fn new(webhook_url: &str) -> Result<Self, WebhookClientError> {
        let http_client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| {
                WebhookClientError::Transport(anyhow!(e).context("unable to build HTTP client"))
            })?;

        Ok(Self {
            endpoint: format!("{}/{WEBHOOK_PATH}", webhook_url.trim_end_matches('/')),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl WebhookClient for HttpWebhookClient {
    async fn notify(&self, record: &InventoryRecord) -> Result<(), WebhookClientError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                WebhookClientError::Transport(
                    anyhow!(e).context(format!("posting product {}", record.product_id)),
                )
            })?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(WebhookClientError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[fixture]
    fn record() -> InventoryRecord {
        InventoryRecord {
            product_id: "prd_1".to_owned(),
            product_name: "test-item".to_owned(),
            quantity: 10,
            threshold: 20,
        }
    }

    #[test]
    fn trailing_slash_is_not_duplicated() {
        let client = HttpWebhookClient::new("http://localhost:9000/").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:9000/webhook");
    }

    #[rstest]
    #[tokio::test]
    async fn posts_record_as_json(record: InventoryRecord) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "productId": "prd_1",
                "productName": "test-item",
                "quantity": 10,
                "threshold": 20
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpWebhookClient::new(&mock_server.uri()).unwrap();

        client.notify(&record).await.expect("should be delivered");
    }

    #[rstest]
    #[case::created(201)]
    #[case::no_content(204)]
    #[case::found(302)]
    #[case::not_modified(304)]
    #[tokio::test]
    async fn success_and_redirect_statuses_are_delivered(
        #[case] status: u16,
        record: InventoryRecord,
    ) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/webhook"))
            .respond_with(
                ResponseTemplate::new(status).insert_header("location", "/somewhere-else"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HttpWebhookClient::new(&mock_server.uri()).unwrap();

        client.notify(&record).await.expect("should be delivered");
    }

    #[rstest]
    #[case::bad_request(400)]
    #[case::not_found(404)]
    #[case::server_error(500)]
    #[case::unavailable(503)]
    #[tokio::test]
    async fn other_statuses_are_failures(#[case] status: u16, record: InventoryRecord) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let client = HttpWebhookClient::new(&mock_server.uri()).unwrap();

        let error = client.notify(&record).await.unwrap_err();
        assert!(matches!(error, WebhookClientError::UnexpectedStatus(s) if s == status));
    }

    #[rstest]
    #[tokio::test]
    async fn connection_errors_are_transport_failures(record: InventoryRecord) {
        let client = HttpWebhookClient::new("http://127.0.0.1:9").unwrap();

        let error = client.notify(&record).await.unwrap_err();
        assert!(matches!(error, WebhookClientError::Transport(_)));
        assert!(error.to_string().contains("prd_1"));
    }
}

use http::StatusCode;
use lambda_http::Request;
use serde_json::Value;
use stock_alert_relay::http::lambda_proxy::LambdaProxyHttpResponse;
use stock_alert_relay::http_lambda_main;
use stock_alert_relay::lambda_structure::http_lambda_main::{HttpLambdaResponse, RequestExtractor};
use stock_alert_relay::validations::http::content_type::validate_content_type;

const PROCESSED_MESSAGE: &str = "Message processed!";

pub struct State;

// Receiving end used in development to watch the alerts the delivery worker sends.
async fn handler(request: Request, _state: &State) -> HttpLambdaResponse {
    let alert: Value = request.extract_body()?;

    tracing::info!(alert = %alert, "stock alert received");

    LambdaProxyHttpResponse::acknowledgement(StatusCode::OK, PROCESSED_MESSAGE).try_into()
}

http_lambda_main!({ State }, handler, [validate_content_type]);

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use lambda_http::Body;
    use rstest::rstest;

    fn request(content_type: &str, body: &str) -> Request {
        let mut request = Request::default();
        request
            .headers_mut()
            .insert("Content-Type", HeaderValue::from_str(content_type).unwrap());
        *request.body_mut() = Body::Text(body.to_owned());
        request
    }

    #[tokio::test]
    async fn acknowledges_json_alerts() {
        let request = request(
            "application/json",
            r#"{"productId":"prd_1","productName":"test-item","quantity":4,"threshold":20}"#,
        );

        let response = handler(request, &State).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(response.body()).unwrap();
        assert_eq!(body["message"], PROCESSED_MESSAGE);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn rejects_non_json_body() {
        let response = handler(request("application/json", "prd_1 is low"), &State)
            .await
            .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case::plain_text("text/plain", StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case::json("application/json", StatusCode::OK)]
    fn content_type_is_validated(#[case] content_type: &str, #[case] expected: StatusCode) {
        let result = validate_content_type(&request(content_type, "{}"));

        match result {
            Ok(()) => assert_eq!(expected, StatusCode::OK),
            Err(response) => assert_eq!(response.status(), expected),
        }
    }
}

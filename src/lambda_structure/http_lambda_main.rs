use std::str::FromStr;

use anyhow::anyhow;
use http::header::ToStrError;
use http::Response;
use lambda_http::{Body, Request};
use serde::de::DeserializeOwned;

use crate::http::errors::{unknown_error_response, validation_error_response};
use crate::result::error::LambdaError;

pub type HttpLambdaResponse = Result<Response<String>, Response<String>>;

// This macro is intended for lambdas that answer HTTP requests directly (function URLs or the
// ApiGateway). It preserves state between executions and lets the handler return error
// responses with the `?` operator.
//
// Request validations are passed as a third parameter and run before the handler. They have
// the signature `Fn(&Request) -> Result<(), Response<String>>` and live in the
// `<root>/src/validations/http/` submodule.
//
// Example usage:
// ```
// http_lambda_main!(
// { .. State },
// main_fn,
// [
//   validation_1,
//   ..
//   validation_n
// ]
// )
// ```
#[macro_export]
macro_rules! http_lambda_main {
    ($persisted_block:block, $handler: ident) => {
        http_lambda_main!($persisted_block, $handler, []);
    };
    ($persisted_block:block, $handler: ident, [$($validation:ident),*]) => {
        #[tokio::main]
        async fn main() -> Result<(), lambda_http::Error> {
            use http::Response;
            use lambda_http::{run, service_fn, Body, Error, Request};
            use $crate::lambda_structure::http_lambda_main::RequestExtractor;
            use $crate::lambda_structure::logging::Logging;

            let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
            let logging = &Logging::init(app_name)?;

            let persisted = &{ $persisted_block };

            let service = move |request: Request| async move {
                logging.reset_level();

                let payload = match request.body() {
                    Body::Empty => "No Payload".to_owned(),
                    _ => match request.extract_body::<serde_json::Value>() {
                        Ok(payload) => payload.to_string(),
                        Err(e) => return Ok::<Response<String>, Error>(e.into()),
                    }
                };
                tracing::info!(payload = ?payload, "Execution started");

                $(
                if let Err(response) = $validation(&request) {
                    return Ok(response);
                }
                )*

                match $handler(request, persisted).await {
                    Ok(response) => Ok(response),
                    Err(response) => Ok(response),
                }
            };

            run(service_fn(service)).await
        }
    };
}

pub trait RequestExtractor {
    fn extract_header<T: DeserializeOwned + FromStr>(
        &self,
        header_name: &str,
    ) -> Result<T, RequestExtractorError>;

    fn extract_body<T: DeserializeOwned>(&self) -> Result<T, RequestExtractorError>;
}

impl RequestExtractor for Request {
    fn extract_header<T: DeserializeOwned + FromStr>(
        &self,
        header_name: &str,
    ) -> Result<T, RequestExtractorError> {
        let headers = self.headers();
        match headers.get(header_name) {
            None => Err(RequestExtractorError::HeaderNotFoundError(
                header_name.to_string(),
            )),
            Some(value) => {
                let val = value
                    .to_str()
                    .map_err(RequestExtractorError::HeaderDeserializingError)?;
                T::from_str(val).map_err(|_| {
                    RequestExtractorError::HeaderWithWrongTypeError(header_name.to_string())
                })
            }
        }
    }

    fn extract_body<T: DeserializeOwned>(&self) -> Result<T, RequestExtractorError> {
        match self.body() {
            Body::Text(json_str) => Ok(serde_json::from_str(json_str)
                .map_err(RequestExtractorError::BodyDeserializationError)?),
            Body::Binary(bytes) => Ok(serde_json::from_slice(bytes)
                .map_err(RequestExtractorError::BodyDeserializationError)?),
            _ => Err(RequestExtractorError::BodyIsEmptyError),
        }
    }
}

#[derive(Debug)]
pub enum RequestExtractorError {
    HeaderNotFoundError(String),
    HeaderWithWrongTypeError(String),
    HeaderDeserializingError(ToStrError),
    BodyIsEmptyError,
    BodyDeserializationError(serde_json::Error),
}

impl From<RequestExtractorError> for Response<String> {
    fn from(error: RequestExtractorError) -> Self {
        match error {
            RequestExtractorError::HeaderNotFoundError(header_name) => validation_error_response(
                format!("{header_name} not found in request headers"),
                None,
            ),
            RequestExtractorError::HeaderWithWrongTypeError(header_name) => {
                validation_error_response(
                    format!("{header_name} with wrong type in request headers"),
                    None,
                )
            }
            RequestExtractorError::HeaderDeserializingError(e) => {
                unknown_error_response(LambdaError::Unknown(anyhow!(e)))
            }
            RequestExtractorError::BodyIsEmptyError => {
                validation_error_response("body was empty".to_owned(), None)
            }
            RequestExtractorError::BodyDeserializationError(e) => {
                let message = if e.is_data() {
                    e.to_string()
                } else {
                    "body failed to be converted to a json object".to_owned()
                };
                validation_error_response(message, None)
            }
        }
    }
}

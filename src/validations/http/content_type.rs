use crate::http::errors::unsupported_media_error_response;
use crate::lambda_structure::http_lambda_main::RequestExtractor;
use lambda_http::{Request, Response};

const CONTENT_TYPE_HEADER_VALUE: &str = "application/json";
const CONTENT_TYPE_HEADER_NAME: &str = "Content-Type";

/// Rejects stock alerts whose body is not declared as JSON.
pub fn validate_content_type(request: &Request) -> Result<(), Response<String>> {
    let content_type: String = request.extract_header(CONTENT_TYPE_HEADER_NAME)?;
    if !content_type
        .to_lowercase()
        .contains(CONTENT_TYPE_HEADER_VALUE)
    {
        Err(unsupported_media_error_response(None))
    } else {
        Ok(())
    }
}

//! RelayError is the error every relay lambda can fail an invocation with. Errors local to one
//! item of a batch never end up here: they are reported as batch item failures instead.

use common::config::ConfigError;
use lambda_runtime::Error as LambdaRuntimeError;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, RelayError>;
pub type LambdaRuntimeResult = std::result::Result<(), LambdaRuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("invalid configuration: {0}")]
    Validation(String),
    #[error("queue unavailable, no record of the batch could be published: {0:#}")]
    QueueUnavailable(#[source] anyhow::Error),
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}

impl From<ValidationErrors> for RelayError {
    fn from(e: ValidationErrors) -> Self {
        RelayError::Validation(format!("{e:#}"))
    }
}

impl From<ConfigError> for RelayError {
    fn from(e: ConfigError) -> Self {
        RelayError::Validation(e.to_string())
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(e: anyhow::Error) -> Self {
        RelayError::Unknown(e)
    }
}

/// Errors of the HTTP lambdas, turned into error responses rather than failed invocations.
#[derive(Debug, thiserror::Error)]
pub enum LambdaError {
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}

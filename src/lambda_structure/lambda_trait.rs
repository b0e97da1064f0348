use async_trait::async_trait;
use lambda_runtime::{Error, LambdaEvent};
use serde::{de::DeserializeOwned, Serialize};

use crate::batch::Deadline;
use crate::lambda_structure::logging::Logging;

#[async_trait]
pub trait Lambda {
    type PersistedMemory: Sync + Send;
    type InputBody: DeserializeOwned + Send + Sync + std::fmt::Debug;
    type Output: Serialize + Send + Sync;
    type Error: Into<Error> + std::error::Error + Sync + Send + 'static;

    /// This function should be implemented to return any common connections or state that we want to persist between lambda executions.
    async fn bootstrap() -> Result<Self::PersistedMemory, Self::Error>;

    /// This function should be implemented with the actual business logic of the lambda.
    /// `deadline` is the point by which the batch must be answered.
    async fn run(
        payload: Self::InputBody,
        connections: &Self::PersistedMemory,
        deadline: Deadline,
    ) -> Result<Self::Output, Self::Error>;

    /// A pre-configured main function that will bootstrap an instance of this lambda and start execution. Call this from the top-level main function for a given lambda.
    async fn main() -> Result<(), Error> {
        let app_name = concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION")).to_string();
        let logging = &Logging::init(app_name)?;

        // Get a reference to avoid moving the original connections into the below closure.
        let persisted = &Self::bootstrap().await?;

        // Wrap our actual service call so we can pass in our connection data while preserving the expected Lambda signature.
        let service = move |event: LambdaEvent<Self::InputBody>| async move {
            logging.reset_level();

            Self::service(event, persisted).await
        };

        lambda_runtime::run(lambda_runtime::service_fn(service)).await
    }

    /// Service function that is called everytime the lambda executes. The invocation deadline
    /// reported by the runtime is handed down to `run`.
    async fn service(
        event: LambdaEvent<Self::InputBody>,
        connections: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        let LambdaEvent { payload, context } = event;

        tracing::info!(payload = ?payload, context = ?context, "Execution started");

        let deadline = Deadline::from_context(&context);

        // Call operation.
        Self::run(payload, connections, deadline).await
    }
}

#[macro_export]
macro_rules! lambda_main {
    ($lambda: ty) => {
        #[tokio::main]
        async fn main() -> $crate::result::error::LambdaRuntimeResult {
            use $crate::lambda_structure::lambda_trait::Lambda;
            <$lambda>::main().await
        }
    };
}

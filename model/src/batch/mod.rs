use serde::{Deserialize, Serialize};

/// Identifies one unit of a batch that did not complete, so only that unit is redelivered.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemFailure {
    pub item_identifier: String,
}

impl BatchItemFailure {
    pub fn new(item_identifier: impl Into<String>) -> Self {
        Self {
            item_identifier: item_identifier.into(),
        }
    }
}

/// Partial batch response understood by both the stream and the queue event sources.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub batch_item_failures: Vec<BatchItemFailure>,
}

impl BatchResponse {
    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.batch_item_failures
            .iter()
            .map(|failure| failure.item_identifier.as_str())
            .collect()
    }
}

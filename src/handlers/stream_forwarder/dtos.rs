use std::str::FromStr;

use model::stream::{ChangeRecord, EventKind, Image};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct DynamoDbStreamEvent {
    #[serde(default)]
    pub records: Vec<DynamoDbStreamEventData>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct DynamoDbStreamEventData {
    pub event_name: String,
    pub dynamodb: Option<DynamoDbEvent>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct DynamoDbEvent {
    pub sequence_number: Option<String>,
    pub new_image: Option<Image>,
}

impl DynamoDbStreamEvent {
    /// Records with an event name the stream is not expected to emit are skipped.
    pub fn into_change_records(self) -> Vec<ChangeRecord> {
        self.records
            .into_iter()
            .filter_map(DynamoDbStreamEventData::into_change_record)
            .collect()
    }
}

impl DynamoDbStreamEventData {
    fn into_change_record(self) -> Option<ChangeRecord> {
        let event_kind = match EventKind::from_str(&self.event_name) {
            Ok(event_kind) => event_kind,
            Err(e) => {
                tracing::warn!(
                    event_name = self.event_name.as_str(),
                    "unprocessable event \"{}\": {e}",
                    self.event_name
                );
                return None;
            }
        };

        let DynamoDbEvent {
            sequence_number,
            new_image,
        } = self.dynamodb.unwrap_or_default();

        Some(ChangeRecord {
            event_kind,
            sequence_token: sequence_number,
            new_image,
        })
    }
}

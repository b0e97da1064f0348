use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_dynamo::AttributeValue;
use strum::{Display, EnumString};

/// Attributes of a record store item in their DynamoDB wire representation.
pub type Image = HashMap<String, AttributeValue>;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
}

/// One mutation emitted by the record store's change stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub event_kind: EventKind,
    /// Unique and increasing per partition key. Used as the item identifier when reporting
    /// failures back to the stream.
    pub sequence_token: Option<String>,
    pub new_image: Option<Image>,
}

impl ChangeRecord {
    pub fn modify(sequence_token: impl Into<String>, new_image: Image) -> Self {
        Self {
            event_kind: EventKind::Modify,
            sequence_token: Some(sequence_token.into()),
            new_image: Some(new_image),
        }
    }
}

/// Body of the message published to the durable queue: the new image plus the sequence token
/// of the change that produced it, kept for correlation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedChange {
    /// Empty when the producer did not attach one.
    #[serde(default)]
    pub stream_id: String,

    #[serde(flatten)]
    pub new_image: Image,
}

impl QueuedChange {
    pub fn new(stream_id: String, new_image: Image) -> Self {
        Self {
            stream_id,
            new_image,
        }
    }
}

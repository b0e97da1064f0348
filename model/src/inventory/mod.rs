use serde::{Deserialize, Serialize};

use crate::stream::Image;

/// Name of the numeric attribute holding the units in stock.
pub const QUANTITY_ATTRIBUTE: &str = "quantity";

/// Name of the numeric attribute holding the level at or below which an alert is raised.
pub const THRESHOLD_ATTRIBUTE: &str = "threshold";

#[derive(Debug, thiserror::Error)]
#[error("unable to unmarshall inventory record: {0}")]
pub struct InventoryRecordError(#[from] serde_dynamo::Error);

/// Inventory record as notified to the webhook.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub threshold: i64,
}

impl InventoryRecord {
    /// Unmarshalls a record from its DynamoDB image. Attributes that are not part of the record
    /// (table keys, entity metadata) are ignored.
    pub fn from_image(image: Image) -> Result<Self, InventoryRecordError> {
        Ok(serde_dynamo::from_item(image)?)
    }
}

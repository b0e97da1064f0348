//! Decides which change records are worth relaying: modifications whose new image leaves a
//! product at or below its restock threshold.

use model::inventory::{QUANTITY_ATTRIBUTE, THRESHOLD_ATTRIBUTE};
use model::stream::{ChangeRecord, EventKind, Image};
use serde_dynamo::AttributeValue;

/// The new image holds a stock attribute that is present but not an integer number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("attribute `{attribute}` is not an integer number: {found}")]
pub struct SchemaViolation {
    pub attribute: &'static str,
    pub found: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevel {
    pub quantity: i64,
    pub threshold: i64,
}

impl StockLevel {
    /// Reads the stock attributes of an image. `Ok(None)` when either is absent or NULL.
    pub fn from_image(image: &Image) -> Result<Option<Self>, SchemaViolation> {
        let quantity = number_attribute(image, QUANTITY_ATTRIBUTE)?;
        let threshold = number_attribute(image, THRESHOLD_ATTRIBUTE)?;

        Ok(quantity
            .zip(threshold)
            .map(|(quantity, threshold)| StockLevel {
                quantity,
                threshold,
            }))
    }

    pub fn needs_restock(&self) -> bool {
        self.quantity <= self.threshold
    }
}

/// Whether a change record must be forwarded to the alert queue.
///
/// Only `MODIFY` records carrying a sequence token and a new image with both stock attributes
/// are candidates. Anything else is silently discarded.
pub fn should_forward(record: &ChangeRecord) -> Result<bool, SchemaViolation> {
    if record.event_kind != EventKind::Modify || record.sequence_token.is_none() {
        return Ok(false);
    }

    let Some(image) = record.new_image.as_ref() else {
        return Ok(false);
    };

    Ok(StockLevel::from_image(image)?.map_or(false, |level| level.needs_restock()))
}

fn number_attribute(
    image: &Image,
    attribute: &'static str,
) -> Result<Option<i64>, SchemaViolation> {
    match image.get(attribute) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(AttributeValue::N(number)) => {
            number
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| SchemaViolation {
                    attribute,
                    found: number.clone(),
                })
        }
        Some(other) => Err(SchemaViolation {
            attribute,
            found: format!("{other:?}"),
        }),
    }
}

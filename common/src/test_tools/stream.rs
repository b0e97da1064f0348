use serde_json::{json, Value};

/// DynamoDB wire image of an inventory record, as written by the product table.
pub fn inventory_image(product_id: &str, quantity: i64, threshold: i64) -> Value {
    json!({
        "pk": { "S": product_id },
        "sk": { "S": product_id },
        "productId": { "S": product_id },
        "productName": { "S": format!("{product_id}-name") },
        "quantity": { "N": quantity.to_string() },
        "threshold": { "N": threshold.to_string() },
    })
}

pub fn stream_record(event_name: &str, sequence_number: &str, new_image: Value) -> Value {
    json!({
        "eventID": format!("event-{sequence_number}"),
        "eventName": event_name,
        "eventSource": "aws:dynamodb",
        "awsRegion": "eu-west-1",
        "dynamodb": {
            "Keys": {
                "pk": new_image.get("pk").cloned().unwrap_or(Value::Null),
                "sk": new_image.get("sk").cloned().unwrap_or(Value::Null),
            },
            "NewImage": new_image,
            "SequenceNumber": sequence_number,
            "StreamViewType": "NEW_IMAGE",
        }
    })
}

pub fn stream_event(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}

use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use model::queue::RECEIVE_COUNT_ATTRIBUTE;
use std::collections::HashMap;

pub fn build_sqs_message(message_id: &str, body: String, receive_count: u32) -> SqsMessage {
    SqsMessage {
        message_id: Some(message_id.to_owned()),
        body: Some(body),
        attributes: HashMap::from([(
            RECEIVE_COUNT_ATTRIBUTE.to_owned(),
            receive_count.to_string(),
        )]),
        event_source: Some("aws:sqs".to_owned()),
        ..SqsMessage::default()
    }
}

pub fn build_sqs_event(messages: Vec<SqsMessage>) -> SqsEvent {
    SqsEvent { records: messages }
}

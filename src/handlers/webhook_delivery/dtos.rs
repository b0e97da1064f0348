use aws_lambda_events::event::sqs::{SqsEvent, SqsMessage};
use model::queue::{QueueMessage, RECEIVE_COUNT_ATTRIBUTE};

pub fn into_queue_messages(event: SqsEvent) -> Vec<QueueMessage> {
    event.records.into_iter().map(into_queue_message).collect()
}

fn into_queue_message(message: SqsMessage) -> QueueMessage {
    let receive_count = message
        .attributes
        .get(RECEIVE_COUNT_ATTRIBUTE)
        .and_then(|count| count.parse().ok());

    let message_id = message.message_id.unwrap_or_else(|| {
        tracing::warn!("received a queue message without message id");
        String::new()
    });

    QueueMessage {
        message_id,
        body: message.body,
        receive_count,
    }
}

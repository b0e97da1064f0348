/// SQS system attribute counting how many times a message has been handed out.
pub const RECEIVE_COUNT_ATTRIBUTE: &str = "ApproximateReceiveCount";

/// A message received from the durable queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    pub message_id: String,
    pub body: Option<String>,
    /// Times the queue has handed this message out, including the current delivery.
    pub receive_count: Option<u32>,
}

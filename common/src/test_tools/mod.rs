pub mod sqs;
pub mod stream;

pub mod batch;
pub mod inventory;
pub mod queue;
pub mod stream;

pub mod queue;
pub mod webhook;

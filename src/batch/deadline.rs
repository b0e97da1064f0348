use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lambda_runtime::Context;
use tokio::time::Instant;

/// Time kept in reserve before the invocation deadline to collect results and answer the
/// event source.
pub const DEADLINE_SAFETY_MARGIN: Duration = Duration::from_millis(500);

/// Point in time by which every item of a batch must have completed. Items still running then
/// are reported as failed so the event source redelivers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn unbounded() -> Self {
        Self(None)
    }

    pub fn after(budget: Duration) -> Self {
        Self(Some(Instant::now() + budget))
    }

    /// Derives the deadline from the invocation context. The runtime reports it in
    /// milliseconds since the epoch, `0` meaning no deadline was supplied.
    pub fn from_context(context: &Context) -> Self {
        if context.deadline == 0 {
            return Self::unbounded();
        }

        let invocation_deadline = UNIX_EPOCH + Duration::from_millis(context.deadline);
        let remaining = invocation_deadline
            .duration_since(SystemTime::now())
            .unwrap_or_default()
            .saturating_sub(DEADLINE_SAFETY_MARGIN);

        Self::after(remaining)
    }

    pub fn instant(&self) -> Option<Instant> {
        self.0
    }
}

//! Partial batch processing shared by the stream forwarder and the delivery worker.
//!
//! Every item of a batch is processed independently and concurrently. The outcome is the list
//! of identifiers that did not complete, which the event source redelivers without touching the
//! items that succeeded.

mod deadline;

use std::fmt::Display;
use std::future::Future;

use model::batch::{BatchItemFailure, BatchResponse};
use tokio::task::JoinError;
use tracing::Instrument;

pub use deadline::{Deadline, DEADLINE_SAFETY_MARGIN};

#[derive(Debug, thiserror::Error)]
pub enum FailureReason<E> {
    #[error("{0}")]
    Failed(E),
    #[error("deadline exceeded before the item completed")]
    DeadlineExceeded,
    #[error("item processing aborted: {0}")]
    Aborted(JoinError),
}

#[derive(Debug)]
pub struct ItemFailure<E> {
    pub item_identifier: String,
    pub reason: FailureReason<E>,
}

#[derive(Debug)]
pub struct BatchReport<E> {
    /// Items handed to the processing function.
    pub attempted: usize,
    pub failures: Vec<ItemFailure<E>>,
}

impl<E> Default for BatchReport<E> {
    fn default() -> Self {
        Self {
            attempted: 0,
            failures: Vec::new(),
        }
    }
}

impl<E: Display> BatchReport<E> {
    /// True when the batch was not empty and every attempted item failed for a reason matching
    /// `predicate`.
    pub fn every_item_failed_with(&self, predicate: impl Fn(&FailureReason<E>) -> bool) -> bool {
        self.attempted > 0
            && self.failures.len() == self.attempted
            && self.failures.iter().map(|f| &f.reason).all(predicate)
    }

    pub fn failed_identifiers(&self) -> Vec<&str> {
        self.failures
            .iter()
            .map(|failure| failure.item_identifier.as_str())
            .collect()
    }

    pub fn into_response(self) -> BatchResponse {
        let batch_item_failures = self
            .failures
            .into_iter()
            .map(|failure| {
                tracing::error!(
                    item_identifier = failure.item_identifier.as_str(),
                    error = %failure.reason,
                    "item {} failed: {}",
                    failure.item_identifier,
                    failure.reason
                );
                BatchItemFailure::new(failure.item_identifier)
            })
            .collect();

        BatchResponse {
            batch_item_failures,
        }
    }
}

/// Runs `handler` for every `(identifier, item)` pair concurrently and waits for all of them.
///
/// An item fails when its handler returns an error, when it is still running at `deadline`, or
/// when its task panics. Failures are returned in input order.
pub async fn process_concurrently<T, E, F, Fut>(
    items: Vec<(String, T)>,
    deadline: Deadline,
    handler: F,
) -> BatchReport<E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Send + 'static,
{
    let attempted = items.len();

    // Spawn every item before awaiting any, so a slow item never holds back its siblings.
    let tasks: Vec<_> = items
        .into_iter()
        .map(|(item_identifier, item)| {
            let span = tracing::info_span!("batch_item", item_identifier = item_identifier.as_str());
            let work = handler(item);
            let task = tokio::spawn(
                async move {
                    match deadline.instant() {
                        Some(at) => tokio::time::timeout_at(at, work).await.ok(),
                        None => Some(work.await),
                    }
                }
                .instrument(span),
            );

            (item_identifier, task)
        })
        .collect();

    let mut failures = Vec::new();
    for (item_identifier, task) in tasks {
        let reason = match task.await {
            Ok(Some(Ok(()))) => continue,
            Ok(Some(Err(e))) => FailureReason::Failed(e),
            Ok(None) => FailureReason::DeadlineExceeded,
            Err(e) => FailureReason::Aborted(e),
        };

        failures.push(ItemFailure {
            item_identifier,
            reason,
        });
    }

    BatchReport {
        attempted,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("boom {0}")]
    struct Boom(u32);

    fn numbered(count: u32) -> Vec<(String, u32)> {
        (0..count).map(|n| (format!("item-{n}"), n)).collect()
    }

    #[tokio::test]
    async fn all_successful_items_report_no_failures() {
        let report =
            process_concurrently(numbered(5), Deadline::unbounded(), |_| async { Ok::<_, Boom>(()) })
                .await;

        assert_eq!(report.attempted, 5);
        assert!(report.failures.is_empty());
        assert!(report.into_response().batch_item_failures.is_empty());
    }

    #[tokio::test]
    async fn only_failed_items_are_reported_in_input_order() {
        let report = process_concurrently(numbered(6), Deadline::unbounded(), |n| async move {
            if n % 2 == 1 {
                Err(Boom(n))
            } else {
                Ok(())
            }
        })
        .await;

        assert_eq!(report.failed_identifiers(), vec!["item-1", "item-3", "item-5"]);
        assert!(matches!(
            report.failures[0].reason,
            FailureReason::Failed(Boom(1))
        ));
    }

    #[tokio::test]
    async fn slow_item_fails_at_the_deadline_without_holding_back_siblings() {
        let started = Instant::now();

        let report = process_concurrently(
            numbered(3),
            Deadline::after(Duration::from_millis(200)),
            |n| async move {
                if n == 1 {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                Ok::<_, Boom>(())
            },
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(report.failed_identifiers(), vec!["item-1"]);
        assert!(matches!(
            report.failures[0].reason,
            FailureReason::DeadlineExceeded
        ));
    }

    #[tokio::test]
    async fn panicking_item_is_reported_as_failed() {
        let report = process_concurrently(numbered(2), Deadline::unbounded(), |n| async move {
            if n == 0 {
                panic!("item handler panicked");
            }
            Ok::<_, Boom>(())
        })
        .await;

        assert_eq!(report.failed_identifiers(), vec!["item-0"]);
        assert!(matches!(report.failures[0].reason, FailureReason::Aborted(_)));
    }

    #[tokio::test]
    async fn every_item_failed_with_requires_a_non_empty_batch() {
        let empty: BatchReport<Boom> =
            process_concurrently(Vec::<(String, u32)>::new(), Deadline::unbounded(), |_| async {
                Ok(())
            })
            .await;
        assert!(!empty.every_item_failed_with(|_| true));

        let all_failed =
            process_concurrently(numbered(2), Deadline::unbounded(), |n| async move {
                Err(Boom(n))
            })
            .await;
        assert!(all_failed.every_item_failed_with(|r| matches!(r, FailureReason::Failed(_))));
        assert!(!all_failed.every_item_failed_with(|r| matches!(r, FailureReason::DeadlineExceeded)));
    }

    #[test]
    fn response_lists_failed_identifiers() {
        let report = BatchReport {
            attempted: 2,
            failures: vec![ItemFailure {
                item_identifier: "msg-2".to_owned(),
                reason: FailureReason::Failed(Boom(2)),
            }],
        };

        assert_eq!(report.into_response().failed_identifiers(), vec!["msg-2"]);
    }
}

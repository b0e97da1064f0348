//! Relays threshold crossings from the record store's change stream to the alert queue.

use std::sync::Arc;

use anyhow::anyhow;
use clients::queue::{QueuePublisher, QueuePublisherError};
use model::stream::{ChangeRecord, QueuedChange};

use crate::batch::{process_concurrently, BatchReport, Deadline, FailureReason, ItemFailure};
use crate::filter::{should_forward, SchemaViolation};
use crate::result::error::RelayError;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] SchemaViolation),
    #[error("unable to serialize queued change: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Publish(#[from] QueuePublisherError),
}

/// Filters a batch of change records and publishes every retained one to the alert queue.
///
/// The report holds one failure per record that was retained but could not be published, plus
/// one per record with malformed stock attributes, keyed by sequence token. Records that were
/// filtered out never show up. Fails the whole invocation only when the queue could not be
/// reached for any of the records of the batch.
pub async fn forward(
    records: Vec<ChangeRecord>,
    publisher: Arc<dyn QueuePublisher>,
    deadline: Deadline,
) -> Result<BatchReport<ForwardError>, RelayError> {
    let received = records.len();
    let mut violations = Vec::new();
    let mut retained = Vec::new();

    for record in records {
        match should_forward(&record) {
            Ok(true) => {
                if let Some((sequence_token, change)) = into_queued_change(record) {
                    retained.push((sequence_token, change));
                }
            }
            Ok(false) => {}
            Err(violation) => {
                let item_identifier = record.sequence_token.unwrap_or_default();
                tracing::error!(
                    kind = "schema_violation",
                    item_identifier = item_identifier.as_str(),
                    attribute = violation.attribute,
                    found = violation.found.as_str(),
                    "malformed change record {item_identifier}: {violation}"
                );
                violations.push(ItemFailure {
                    item_identifier,
                    reason: FailureReason::Failed(ForwardError::from(violation)),
                });
            }
        }
    }

    tracing::info!(
        received,
        retained = retained.len(),
        malformed = violations.len(),
        "change batch filtered"
    );

    let mut report = process_concurrently(retained, deadline, |change| {
        let publisher = publisher.clone();
        async move { publish(publisher.as_ref(), &change).await }
    })
    .await;

    if report.every_item_failed_with(is_unreachable) {
        return Err(RelayError::QueueUnavailable(anyhow!(
            "{} publish attempts could not reach the queue",
            report.attempted
        )));
    }

    report.attempted += violations.len();
    report.failures.extend(violations);

    Ok(report)
}

fn into_queued_change(record: ChangeRecord) -> Option<(String, QueuedChange)> {
    let sequence_token = record.sequence_token?;
    let new_image = record.new_image?;

    Some((
        sequence_token.clone(),
        QueuedChange::new(sequence_token, new_image),
    ))
}

async fn publish(
    publisher: &dyn QueuePublisher,
    change: &QueuedChange,
) -> Result<(), ForwardError> {
    let message_body = serde_json::to_string(change)?;
    publisher.publish(message_body).await?;

    tracing::info!(stream_id = change.stream_id.as_str(), "change published");
    Ok(())
}

fn is_unreachable(reason: &FailureReason<ForwardError>) -> bool {
    matches!(
        reason,
        FailureReason::Failed(ForwardError::Publish(e)) if e.is_unreachable()
    )
}

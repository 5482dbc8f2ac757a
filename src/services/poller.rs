//! Third-party propagation poller
//!
//! After enrollment the backend pushes the certificate to declared third-party
//! systems asynchronously. This poller refetches the enrollment request record
//! with a bounded retry budget until every required connector has confirmed
//! receipt, or the budget runs out.
//!
//! The sleep between attempts is an async `tokio::time::sleep`, so the whole
//! wait is cancellable at every await point; callers that need a hard deadline
//! wrap the future in `tokio::time::timeout`.

use std::time::Duration;
use tracing::{debug, info};

use crate::config::PollConfig;
use crate::services::backend::PkiBackend;
use crate::utils::error::{Error, Result};

/// Wait until every required third-party connector appears in the request's
/// propagation status list
///
/// An empty `required` set succeeds immediately with no network call. Returns
/// success as soon as all connectors are confirmed, without exhausting the
/// budget. On exhaustion the error names exactly the connectors that never
/// confirmed. Connectors in the status list that were not required are
/// ignored.
pub async fn wait_for_third_parties<B: PkiBackend + ?Sized>(
    backend: &B,
    request_id: &str,
    required: &[String],
    poll: &PollConfig,
) -> Result<()> {
    if required.is_empty() {
        return Ok(());
    }

    let mut missing: Vec<String> = Vec::with_capacity(required.len());
    for connector in required {
        if !missing.contains(connector) {
            missing.push(connector.clone());
        }
    }

    for attempt in 1..=poll.max_retries {
        tokio::time::sleep(Duration::from_secs(poll.interval_secs)).await;

        let record = backend.get_request(request_id).await?;

        missing.retain(|connector| {
            !record
                .third_parties
                .iter()
                .any(|item| item.connector == *connector)
        });

        if missing.is_empty() {
            info!(
                request_id,
                attempt, "All third parties confirmed certificate propagation"
            );
            return Ok(());
        }

        debug!(
            request_id,
            attempt,
            remaining = missing.len(),
            "Third parties not yet confirmed"
        );
    }

    Err(Error::PropagationTimeout { missing })
}

//! Backoff Client: executes an outbound request against a flaky endpoint,
//! retrying failed attempts with an exponentially growing delay.
//!
//! Attempt lifecycle:
//! `Pending → Attempting → (Success | RetryableFailure → Waiting → Attempting)* → (Success | Exhausted)`
//!
//! The inter-attempt wait is a `tokio::time::sleep`, so only the calling task is
//! suspended. Independent calls share no mutable state.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

pub mod policy;
pub mod transport;

pub use policy::BackoffPolicy;
pub use transport::{HttpTransport, RequestAttempt, Transport, TransportResponse};

/// Longest response body kept in errors and log lines.
const MAX_LOGGED_BODY: usize = 2048;

/// The last failure seen once a request can no longer be retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("upstream returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("transport error: {cause}")]
    Transport { cause: String },
}

impl SendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SendError::HttpStatus { status, .. } => Some(*status),
            SendError::Transport { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct BackoffClient {
    transport: Arc<dyn Transport>,
}

impl BackoffClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Sends `request`, retrying under `policy`.
    ///
    /// - 2xx: returned immediately, unmodified.
    /// - non-2xx / transport failure: logged, then retried after `policy.delay_for(i)`
    ///   unless this was the last attempt or the policy refuses the status.
    /// - On exhaustion the last failure is returned, never a generic error.
    pub async fn send(
        &self,
        request: &RequestAttempt,
        policy: &BackoffPolicy,
    ) -> Result<TransportResponse, SendError> {
        let max_attempts = policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.transport.execute(request).await {
                Ok(response) if response.is_success() => {
                    debug!(
                        "{} succeeded on attempt {}/{} (status {})",
                        request.endpoint,
                        attempt + 1,
                        max_attempts,
                        response.status
                    );
                    return Ok(response);
                }
                Ok(response) => {
                    let body = truncate(response.text());
                    warn!(
                        "Attempt {}/{} to {} returned status {}: {}",
                        attempt + 1,
                        max_attempts,
                        request.endpoint,
                        response.status,
                        body
                    );
                    SendError::HttpStatus {
                        status: response.status,
                        body,
                    }
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{} to {} failed with network error: {}",
                        attempt + 1,
                        max_attempts,
                        request.endpoint,
                        e.cause
                    );
                    SendError::Transport { cause: e.cause }
                }
            };

            if attempt + 1 >= max_attempts {
                return Err(failure);
            }
            if let Some(status) = failure.status() {
                if !policy.retries_status(status) {
                    warn!("Status {status} is not retryable under the current policy");
                    return Err(failure);
                }
            }

            let delay = policy.delay_for(attempt);
            warn!("Retrying {} in {}ms", request.endpoint, delay.as_millis());
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_LOGGED_BODY {
        let mut cut = MAX_LOGGED_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}

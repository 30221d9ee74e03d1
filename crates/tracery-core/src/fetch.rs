//! Retry-resilient query execution.
//!
//! Wraps a [`LedgerSource`] with a bounded retry loop: transient failures
//! (dropped connections, elapsed result timeouts, 5xx) consume attempts
//! from a fixed budget with no backoff; permanent failures propagate
//! immediately. The result is an explicit tri-state [`FetchOutcome`] so
//! callers can never mistake an exhausted retry budget for an empty window.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::error::{CoreError, SourceError};
use crate::source::LedgerSource;
use crate::types::{FetchOutcome, TransactionTable};

/// Retry strategy for one query execution.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt ceiling, counting the first try.
    pub max_attempts: usize,
    /// How long each attempt may wait for the query's result set.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

/// Executes queries against a [`LedgerSource`] under a [`RetryPolicy`].
pub struct ResilientFetcher {
    source: Arc<dyn LedgerSource>,
    policy: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(source: Arc<dyn LedgerSource>, policy: RetryPolicy) -> Self {
        Self { source, policy }
    }

    /// Execute `sql`, materializing the result rows into a table.
    ///
    /// Terminates after at most `max_attempts` attempts regardless of how
    /// failures interleave. Zero result rows are `FetchOutcome::Empty`, an
    /// exhausted budget is `FetchOutcome::Exhausted`; only permanent source
    /// errors and malformed row sets produce `Err`.
    pub async fn fetch(&self, sql: &str) -> Result<FetchOutcome, CoreError> {
        // A ceiling of zero would mean never trying at all.
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<SourceError> = None;

        for attempt in 1..=max_attempts {
            let attempt_result =
                tokio::time::timeout(self.policy.attempt_timeout, self.source.run_query(sql))
                    .await;

            let error = match attempt_result {
                Ok(Ok(rows)) => {
                    if rows.is_empty() {
                        return Ok(FetchOutcome::Empty);
                    }
                    let table = TransactionTable::from_source_rows(rows)?;
                    return Ok(FetchOutcome::Data(table));
                }
                Ok(Err(error)) => error,
                Err(_elapsed) => SourceError::Timeout {
                    timeout: self.policy.attempt_timeout,
                },
            };

            if !error.is_transient() {
                return Err(error.into());
            }

            warn!(
                attempt,
                max_attempts,
                error = %error,
                "transient failure while pulling query results"
            );
            last_error = Some(error);
        }

        Ok(FetchOutcome::Exhausted {
            attempts: max_attempts,
            last_error: last_error.expect("loop body ran at least once before exhaustion"),
        })
    }
}

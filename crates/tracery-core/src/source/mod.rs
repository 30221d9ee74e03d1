//! Ledger query source abstraction.
//!
//! Defines the [`LedgerSource`] trait and provides an HTTP implementation
//! ([`HttpLedgerClient`]) plus a test mock (`mock::MockSource`).

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{resolve_api_token, HttpLedgerClient};

use async_trait::async_trait;

use crate::error::SourceError;
use crate::types::SourceRow;

/// Minimal contract for a tabular SQL query service.
///
/// Implementations own authentication, connection management, and response
/// deserialization. Callers only see rows or a classified [`SourceError`];
/// retry policy lives one layer up, in the fetcher.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Execute `sql` and return every result row.
    async fn run_query(&self, sql: &str) -> Result<Vec<SourceRow>, SourceError>;
}

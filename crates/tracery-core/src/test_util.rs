//! Shared test helpers for `tracery-core` unit tests.
//!
//! Consolidates builders for source rows and result tables so tests across
//! modules share one source of truth for dummy data construction.

use crate::types::{
    SourceRow, TransactionTable, COL_BLOCK_TIMESTAMP, COL_FROM_ADDRESS, COL_NONCE, COL_TO_ADDRESS,
    COL_VALUE,
};

/// Build a source row with the standard transaction schema.
pub fn make_row(
    from: &str,
    to: &str,
    value: f64,
    nonce: u64,
    block_timestamp: &str,
) -> SourceRow {
    SourceRow {
        columns: vec![
            COL_FROM_ADDRESS.to_owned(),
            COL_TO_ADDRESS.to_owned(),
            COL_VALUE.to_owned(),
            COL_NONCE.to_owned(),
            COL_BLOCK_TIMESTAMP.to_owned(),
        ],
        values: vec![
            serde_json::json!(from),
            serde_json::json!(to),
            serde_json::json!(value),
            serde_json::json!(nonce),
            serde_json::json!(block_timestamp),
        ],
    }
}

/// Materialize rows into a table, panicking on malformed fixtures.
pub fn make_table(rows: Vec<SourceRow>) -> TransactionTable {
    TransactionTable::from_source_rows(rows).expect("test fixture rows must materialize")
}

//! Domain types for the transaction network pipeline.
//!
//! Contains the wire row shape (`SourceRow`), the materialized result table
//! (`TransactionTable`), the typed per-row view (`TransactionRecord`), and
//! the tri-state fetch result (`FetchOutcome`).

use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::error::{CoreError, SourceError};

/// Column names of the public transactions dataset that the pipeline
/// consumes. Queries select `*`; only these five are extracted.
pub const COL_FROM_ADDRESS: &str = "from_address";
pub const COL_TO_ADDRESS: &str = "to_address";
pub const COL_VALUE: &str = "value";
pub const COL_NONCE: &str = "nonce";
pub const COL_BLOCK_TIMESTAMP: &str = "block_timestamp";

/// Timestamp layout used by the ledger dataset (`2019-11-29 16:25:57`).
const LEDGER_TIMESTAMP: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

// ==============================================================================
// Timestamps
// ==============================================================================

/// Parse a ledger timestamp. Accepts the dataset's own
/// `YYYY-MM-DD HH:MM:SS` layout (with or without a trailing ` UTC`) and
/// RFC 3339. All timestamps are interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, CoreError> {
    let trimmed = raw.trim().trim_end_matches(" UTC");
    if let Ok(dt) = PrimitiveDateTime::parse(trimmed, LEDGER_TIMESTAMP) {
        return Ok(dt.assume_utc());
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .map_err(|_| CoreError::InvalidTimestamp(raw.to_owned()))
}

/// Format a timestamp in the ledger's `YYYY-MM-DD HH:MM:SS` layout (UTC).
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.to_offset(time::UtcOffset::UTC)
        .format(LEDGER_TIMESTAMP)
        .expect("ledger timestamp layout only uses components every datetime has")
}

// ==============================================================================
// Rows and Tables
// ==============================================================================

/// One result row as returned by a query source: parallel column names and
/// values. The fetcher takes the table schema from the first row.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub columns: Vec<String>,
    pub values: Vec<serde_json::Value>,
}

/// An ordered sequence of result rows sharing one column schema.
///
/// The table keeps the raw values; [`TransactionTable::records`] extracts
/// the typed fields the graph builder needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionTable {
    columns: Vec<String>,
    rows: Vec<Vec<serde_json::Value>>,
}

impl TransactionTable {
    /// Materialize source rows into a table. The column schema is taken
    /// from the first row; every later row must match its arity.
    pub fn from_source_rows(rows: Vec<SourceRow>) -> Result<Self, CoreError> {
        let Some(first) = rows.first() else {
            return Ok(Self {
                columns: Vec::new(),
                rows: Vec::new(),
            });
        };

        let columns = first.columns.clone();
        let mut materialized = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.values.len() != columns.len() {
                return Err(CoreError::InvalidRow {
                    index,
                    message: format!(
                        "expected {} values per the first row's schema, got {}",
                        columns.len(),
                        row.values.len()
                    ),
                });
            }
            materialized.push(row.values);
        }

        Ok(Self {
            columns,
            rows: materialized,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Tab-separated header plus the first `limit` rows, for logging.
    pub fn preview(&self, limit: usize) -> Vec<String> {
        let mut lines = Vec::with_capacity(limit + 1);
        lines.push(self.columns.join("\t"));
        for row in self.rows.iter().take(limit) {
            lines.push(
                row.iter()
                    .map(render_cell)
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
        }
        lines
    }

    /// Extract one typed record per row, in table order.
    pub fn records(&self) -> Result<Vec<TransactionRecord>, CoreError> {
        // An empty table has no schema to check against.
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }

        let from = self.column_index(COL_FROM_ADDRESS)?;
        let to = self.column_index(COL_TO_ADDRESS)?;
        let value = self.column_index(COL_VALUE)?;
        let nonce = self.column_index(COL_NONCE)?;
        let block_timestamp = self.column_index(COL_BLOCK_TIMESTAMP)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                Ok(TransactionRecord {
                    from_address: parse_cell_string(&row[from], index, COL_FROM_ADDRESS)?,
                    to_address: parse_cell_string(&row[to], index, COL_TO_ADDRESS)?,
                    value: parse_cell_f64(&row[value], index, COL_VALUE)?,
                    nonce: parse_cell_u64(&row[nonce], index, COL_NONCE)?,
                    block_timestamp: parse_cell_timestamp(
                        &row[block_timestamp],
                        index,
                        COL_BLOCK_TIMESTAMP,
                    )?,
                })
            })
            .collect()
    }

    fn column_index(&self, name: &'static str) -> Result<usize, CoreError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or(CoreError::MissingColumn { name })
    }
}

/// One ledger transfer, as extracted from a table row. Immutable once
/// parsed; `value` is in the ledger's native unit and always positive for
/// fetched rows (the generated queries filter `value > 0` at the source).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub from_address: String,
    pub to_address: String,
    pub value: f64,
    pub nonce: u64,
    pub block_timestamp: OffsetDateTime,
}

// ==============================================================================
// Fetch Outcome
// ==============================================================================

/// Result of one resilient fetch.
///
/// `Empty` and `Exhausted` are deliberately distinct variants: a window
/// with no transactions and a query whose results never arrived must not
/// be conflated by callers.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The query succeeded and returned at least one row.
    Data(TransactionTable),
    /// The query succeeded and returned zero rows.
    Empty,
    /// Every attempt failed transiently; the retry budget is spent.
    Exhausted {
        attempts: usize,
        last_error: SourceError,
    },
}

// ==============================================================================
// Cell Parsing
// ==============================================================================

fn render_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_cell_string(
    value: &serde_json::Value,
    index: usize,
    field: &str,
) -> Result<String, CoreError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| invalid_cell(index, field, value))
}

/// The dataset serves its numeric column either as a JSON number or as a
/// decimal string, depending on magnitude.
fn parse_cell_f64(value: &serde_json::Value, index: usize, field: &str) -> Result<f64, CoreError> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| invalid_cell(index, field, value)),
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| invalid_cell(index, field, value)),
        _ => Err(invalid_cell(index, field, value)),
    }
}

fn parse_cell_u64(value: &serde_json::Value, index: usize, field: &str) -> Result<u64, CoreError> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().ok_or_else(|| invalid_cell(index, field, value)),
        serde_json::Value::String(s) => s
            .parse::<u64>()
            .map_err(|_| invalid_cell(index, field, value)),
        _ => Err(invalid_cell(index, field, value)),
    }
}

fn parse_cell_timestamp(
    value: &serde_json::Value,
    index: usize,
    field: &str,
) -> Result<OffsetDateTime, CoreError> {
    let raw = value
        .as_str()
        .ok_or_else(|| invalid_cell(index, field, value))?;
    parse_timestamp(raw).map_err(|_| invalid_cell(index, field, value))
}

fn invalid_cell(index: usize, field: &str, value: &serde_json::Value) -> CoreError {
    CoreError::InvalidRow {
        index,
        message: format!("unparseable {field}: {value}"),
    }
}

// ==============================================================================
// Tests
// ==============================================================================

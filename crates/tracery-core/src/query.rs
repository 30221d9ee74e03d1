//! SQL builders for the public ledger dataset.
//!
//! Two query shapes: a symmetric time window around a center timestamp, and
//! all activity touching one address. Both filter out zero-value transfers
//! at the source, so downstream code never sees them.

use time::{Duration, OffsetDateTime};

use crate::error::CoreError;
use crate::types::{format_timestamp, parse_timestamp};

/// Fully-qualified name of the public transactions table.
pub const TRANSACTIONS_TABLE: &str = "bigquery-public-data.crypto_ethereum.transactions";

/// Half-width of the temporal window.
pub const WINDOW_HALF_WIDTH: Duration = Duration::minutes(5);

/// Parse the window-center timestamp supplied by the caller.
pub fn parse_center_timestamp(raw: &str) -> Result<OffsetDateTime, CoreError> {
    parse_timestamp(raw)
}

/// All positive-value transactions whose `block_timestamp` lies within
/// ±5 minutes of `center`, both bounds inclusive, ascending by timestamp.
pub fn temporal_window(center: OffsetDateTime) -> String {
    let lower = format_timestamp(center - WINDOW_HALF_WIDTH);
    let upper = format_timestamp(center + WINDOW_HALF_WIDTH);
    format!(
        "SELECT\n  *\nFROM\n  `{TRANSACTIONS_TABLE}` AS txns\nWHERE TRUE\n  AND txns.value > 0\n  AND txns.block_timestamp >= \"{lower}\"\n  AND txns.block_timestamp <= \"{upper}\"\nORDER BY txns.block_timestamp"
    )
}

/// All positive-value transactions where `address` is sender or receiver.
/// No time bound and no ordering guarantee.
pub fn address_activity(address: &str) -> String {
    format!(
        "SELECT\n  *\nFROM\n  `{TRANSACTIONS_TABLE}` AS txns\nWHERE TRUE\n  AND txns.value > 0\n  AND (txns.from_address = \"{address}\" OR txns.to_address = \"{address}\")"
    )
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn window_bounds_are_inclusive_and_exact() {
        let sql = temporal_window(datetime!(2019-11-29 16:25:57 UTC));
        // Both bounds are exactly five minutes from the center and use
        // inclusive comparisons.
        assert!(sql.contains("block_timestamp >= \"2019-11-29 16:20:57\""));
        assert!(sql.contains("block_timestamp <= \"2019-11-29 16:30:57\""));
        // No exclusive comparison against either bound.
        assert!(!sql.contains("block_timestamp > \""));
        assert!(!sql.contains("block_timestamp < \""));
    }

    #[test]
    fn window_orders_ascending_by_timestamp() {
        let sql = temporal_window(datetime!(2019-11-29 16:25:57 UTC));
        assert!(sql.ends_with("ORDER BY txns.block_timestamp"));
    }

    #[test]
    fn window_filters_zero_value_transfers() {
        let sql = temporal_window(datetime!(2019-11-29 16:25:57 UTC));
        assert!(sql.contains("txns.value > 0"));
    }

    #[test]
    fn window_crossing_midnight() {
        let sql = temporal_window(datetime!(2020-01-01 00:02:00 UTC));
        assert!(sql.contains(">= \"2019-12-31 23:57:00\""));
        assert!(sql.contains("<= \"2020-01-01 00:07:00\""));
    }

    #[test]
    fn address_query_matches_either_endpoint() {
        let sql = address_activity("0xabc");
        assert!(sql.contains("txns.from_address = \"0xabc\""));
        assert!(sql.contains("txns.to_address = \"0xabc\""));
        assert!(sql.contains("txns.value > 0"));
    }

    #[test]
    fn address_query_has_no_time_bound_or_ordering() {
        let sql = address_activity("0xabc");
        assert!(!sql.contains("block_timestamp"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn center_timestamp_accepts_both_layouts() {
        let a = parse_center_timestamp("2019-11-29 16:25:57").expect("ledger layout");
        let b = parse_center_timestamp("2019-11-29T16:25:57Z").expect("rfc3339");
        assert_eq!(a, b);
    }
}

//! Graph metric computation (reserved extension point).

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::graph::AddressGraph;

/// Graph-level and per-node metrics for a transaction network.
///
/// This is the reserved result shape; no metric is computed yet.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NetworkStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// Total degree to number of nodes with that degree.
    pub degree_distribution: BTreeMap<usize, usize>,
    pub degree_by_address: BTreeMap<String, usize>,
}

/// Compute summary metrics for `network`.
///
/// Not implemented: calling this always fails with
/// [`CoreError::NotImplemented`]. The signature is the contract: a pure
/// function of the graph, with no rendering or fetching involved.
pub fn network_statistics(_network: &AddressGraph) -> Result<NetworkStatistics, CoreError> {
    Err(CoreError::NotImplemented("network statistics"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build_network;
    use crate::test_util::{make_row, make_table};

    #[test]
    fn statistics_fail_loudly() {
        let network = build_network(&make_table(vec![make_row(
            "a",
            "b",
            1.0,
            0,
            "2019-11-29 16:25:57",
        )]))
        .expect("network must build");

        let err = network_statistics(&network).expect_err("statistics must be unimplemented");
        assert!(matches!(err, CoreError::NotImplemented("network statistics")));
    }

    #[test]
    fn statistics_fail_even_for_an_empty_network() {
        let empty = build_network(&make_table(Vec::new())).expect("empty network must build");
        let err = network_statistics(&empty).expect_err("statistics must be unimplemented");
        assert!(matches!(err, CoreError::NotImplemented(_)));
    }
}

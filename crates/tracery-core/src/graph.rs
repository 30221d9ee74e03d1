//! Transaction network assembly.
//!
//! Builds a directed multigraph of addresses from a result table: one node
//! per unique address, one edge per transaction. Edges are never
//! deduplicated; two transfers between the same pair of addresses stay two
//! parallel edges, each carrying its own attributes.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use time::OffsetDateTime;

use crate::error::CoreError;
use crate::types::TransactionTable;

/// Edge payload: one transfer between two addresses.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub value: f64,
    pub nonce: u64,
    pub block_timestamp: OffsetDateTime,
}

/// A directed multigraph of addresses connected by individual transfers.
///
/// Nodes are interned addresses; only addresses that appear in some
/// transaction exist, so the graph never contains isolated nodes. The
/// structure is append-only during construction and read-only afterward,
/// which keeps petgraph's node indices compact and stable.
#[derive(Debug)]
pub struct AddressGraph {
    graph: DiGraph<String, Transfer>,
    indices: HashMap<String, NodeIndex>,
}

impl AddressGraph {
    fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            indices: HashMap::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.indices.contains_key(address)
    }

    pub fn node_index(&self, address: &str) -> Option<NodeIndex> {
        self.indices.get(address).copied()
    }

    pub fn address(&self, index: NodeIndex) -> &str {
        &self.graph[index]
    }

    /// Total degree: in-degree plus out-degree, counting parallel edges
    /// individually and a self-loop twice.
    pub fn degree(&self, index: NodeIndex) -> usize {
        self.graph.edges_directed(index, Direction::Incoming).count()
            + self.graph.edges_directed(index, Direction::Outgoing).count()
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    /// Read access to the underlying graph, for layout and metrics.
    pub fn inner(&self) -> &DiGraph<String, Transfer> {
        &self.graph
    }

    fn intern(&mut self, address: String) -> NodeIndex {
        if let Some(&index) = self.indices.get(&address) {
            return index;
        }
        let index = self.graph.add_node(address.clone());
        self.indices.insert(address, index);
        index
    }
}

/// Build the transaction network for a result table.
///
/// Per row, in table order: intern the sender, intern the receiver, add
/// one directed edge carrying the transfer attributes. Self-transfers
/// become self-loops. An empty table builds an empty graph.
pub fn build_network(table: &TransactionTable) -> Result<AddressGraph, CoreError> {
    let mut network = AddressGraph::new();

    for record in table.records()? {
        let from = network.intern(record.from_address);
        let to = network.intern(record.to_address);
        network.graph.add_edge(
            from,
            to,
            Transfer {
                value: record.value,
                nonce: record.nonce,
                block_timestamp: record.block_timestamp,
            },
        );
    }

    Ok(network)
}

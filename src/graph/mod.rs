//! The call-graph arena and its owning `CallGraph` type.
//!
//! Methods are node weights addressed by `petgraph::graph::NodeIndex`;
//! edges are edge weights addressed by `petgraph::graph::EdgeIndex`. Both
//! stay stable for the lifetime of the graph: nodes/edges are only ever
//! added, never removed from the underlying `petgraph::Graph` (the two
//! purges in [`purge`] operate on a separate ordered `Vec<EdgeIndex>`
//! instead, so removing an edge from the diff never invalidates another
//! edge's index).

pub mod builder;
pub mod edge;
pub mod equivalence;
pub mod invoke;
pub mod loader;
pub mod method;
pub mod purge;
pub mod rank;
pub mod reachability;
pub mod relax;

pub use edge::EdgeData;
pub use invoke::InvokeSite;
pub use method::{Method, Reachability};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};

/// Per-graph tallies, recomputed after reachability stabilizes and kept up
/// to date by the edge purges. Informational only — they do not feed back
/// into the algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub unreachable: usize,
    pub spuriously_reachable: usize,
    pub truly_reachable: usize,
    pub edges_total: usize,
    pub edges_spurious: usize,
    pub edges_nonspurious: usize,
}

impl Tally {
    pub fn reachable(&self) -> usize {
        self.spuriously_reachable + self.truly_reachable
    }
}

/// One call graph: its methods, invoke sites, and materialized edges.
pub struct CallGraph {
    name: String,
    graph: DiGraph<Method, EdgeData>,
    by_qualified_name: HashMap<String, NodeIndex>,
    invokes: Vec<InvokeSite>,
    /// Insertion order of edges, independent of `petgraph`'s own edge
    /// storage order, so that purging can shrink this list without
    /// touching the graph topology.
    edge_order: Vec<EdgeIndex>,
    tally: Tally,
}

impl CallGraph {
    pub fn new(
        name: String,
        graph: DiGraph<Method, EdgeData>,
        by_qualified_name: HashMap<String, NodeIndex>,
        invokes: Vec<InvokeSite>,
    ) -> Self {
        CallGraph {
            name,
            graph,
            by_qualified_name,
            invokes,
            edge_order: Vec::new(),
            tally: Tally::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn method(&self, idx: NodeIndex) -> &Method {
        &self.graph[idx]
    }

    pub fn method_mut(&mut self, idx: NodeIndex) -> &mut Method {
        &mut self.graph[idx]
    }

    pub fn methods(&self) -> impl Iterator<Item = (NodeIndex, &Method)> {
        self.graph.node_indices().map(move |i| (i, &self.graph[i]))
    }

    pub fn method_by_qualified_name(&self, qualified_name: &str) -> Option<&Method> {
        self.by_qualified_name
            .get(qualified_name)
            .map(|&idx| &self.graph[idx])
    }

    pub fn node_index_by_qualified_name(&self, qualified_name: &str) -> Option<NodeIndex> {
        self.by_qualified_name.get(qualified_name).copied()
    }

    pub fn invokes(&self) -> &[InvokeSite] {
        &self.invokes
    }

    pub fn invokes_mut(&mut self) -> &mut [InvokeSite] {
        &mut self.invokes
    }

    pub fn edge_order(&self) -> &[EdgeIndex] {
        &self.edge_order
    }

    /// Replaces the insertion-order edge list wholesale, used by the edge
    /// purges to drop entries without touching `petgraph` topology.
    pub(crate) fn set_edge_order(&mut self, edge_order: Vec<EdgeIndex>) {
        self.edge_order = edge_order;
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn edge_endpoints(&self, edge: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.graph
            .edge_endpoints(edge)
            .expect("edge_order only ever holds live petgraph edge indices")
    }

    pub fn edge_data(&self, edge: EdgeIndex) -> &EdgeData {
        &self.graph[edge]
    }

    pub fn edge_data_mut(&mut self, edge: EdgeIndex) -> &mut EdgeData {
        &mut self.graph[edge]
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    /// Appends an edge to both the `petgraph` graph and the insertion-order
    /// list, used only while building (never after purging starts).
    pub(crate) fn push_edge(&mut self, source: NodeIndex, target: NodeIndex, data: EdgeData) -> EdgeIndex {
        let idx = self.graph.add_edge(source, target, data);
        self.edge_order.push(idx);
        idx
    }

    /// Recomputes [`Tally`] from the current method table and edge-order
    /// list. Called after reachability stabilizes, and again after each
    /// purge so counters stay consistent.
    pub fn recompute_tally(&mut self) {
        let mut tally = Tally::default();
        for idx in self.graph.node_indices() {
            match self.graph[idx].reachability {
                Reachability::Unreachable => tally.unreachable += 1,
                Reachability::SpuriouslyReachable => tally.spuriously_reachable += 1,
                Reachability::TrulyReachable => tally.truly_reachable += 1,
            }
        }
        for &edge in &self.edge_order {
            tally.edges_total += 1;
            if self.graph[edge].is_spurious {
                tally.edges_spurious += 1;
            } else {
                tally.edges_nonspurious += 1;
            }
        }
        self.tally = tally;
    }
}

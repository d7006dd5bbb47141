//! The two edge purges. Both operate on the graph's insertion-order edge
//! list, not on `petgraph` topology, and both preserve the relative order
//! of survivors.

use crate::graph::method::Reachability;
use crate::graph::CallGraph;

/// Removes every edge whose source is `Unreachable`.
pub fn purge_unreachable_sourced(cg: &mut CallGraph) {
    retain_edges(cg, |cg, _edge, source, _target| {
        cg.method(source).reachability != Reachability::Unreachable
    });
}

/// Removes every edge whose target already has a reachable equivalent in
/// `other` — the target is covered by the other graph's analysis and is
/// not an informative diff.
pub fn purge_common(cg: &mut CallGraph, other: &CallGraph) {
    retain_edges(cg, |cg, _edge, _source, target| {
        match cg.method(target).equivalent {
            Some(eq) => other.method(eq).reachability == Reachability::Unreachable,
            None => true,
        }
    });
}

fn retain_edges(
    cg: &mut CallGraph,
    keep: impl Fn(&CallGraph, petgraph::graph::EdgeIndex, petgraph::graph::NodeIndex, petgraph::graph::NodeIndex) -> bool,
) {
    let survivors: Vec<_> = cg
        .edge_order()
        .iter()
        .copied()
        .filter(|&edge| {
            let (source, target) = cg.edge_endpoints(edge);
            keep(cg, edge, source, target)
        })
        .collect();
    cg.set_edge_order(survivors);
    cg.recompute_tally();
}

//! Devirtualization and edge materialization.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::graph::edge::EdgeData;
use crate::graph::CallGraph;

/// Promotes any invoke with `!is_direct && targets.len() == 1` to direct.
/// Supergraph-only, optional pre-pass run before edge construction; collapses
/// statically monomorphic virtual calls into non-spurious edges.
pub fn devirtualize(cg: &mut CallGraph) -> usize {
    let mut promoted = 0;
    for invoke in cg.invokes_mut() {
        if !invoke.is_direct && invoke.targets.len() == 1 {
            invoke.is_direct = true;
            promoted += 1;
        }
    }
    promoted
}

/// Walks each invoke in insertion order and, for each resolved target,
/// proposes an edge `(invoke.method, target)`. The first occurrence of a
/// given `(source, target)` pair wins; `NodeIndex` is already a 1:1 stand-in
/// for the source/target method's own `id` within this graph, so keying the
/// dedup set on the index pair is equivalent to keying on
/// `(source.id, target.id)`.
pub fn build_edges(cg: &mut CallGraph) {
    let invokes: Vec<_> = cg.invokes().to_vec();
    let mut seen: HashSet<(NodeIndex, NodeIndex)> = HashSet::new();
    let mut next_id: i64 = 0;

    for invoke in &invokes {
        for &target in &invoke.targets {
            let key = (invoke.method, target);
            if !seen.insert(key) {
                continue;
            }
            let data = EdgeData::new(next_id, !invoke.is_direct);
            next_id += 1;
            cg.push_edge(invoke.method, target, data);
        }
    }
}

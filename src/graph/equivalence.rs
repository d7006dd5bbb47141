//! Cross-graph equivalence linking by qualified name.

use crate::graph::CallGraph;

/// For each method in `g1`, looks it up in `g2` by `qualified_name` and, on
/// a match, links both sides' `equivalent` field. Always iterates `g1`'s
/// table; both iteration directions produce the identical symmetric link
/// set, so which side is iterated is not load-bearing for correctness.
pub fn link(g1: &mut CallGraph, g2: &mut CallGraph) {
    let pairs: Vec<_> = g1
        .methods()
        .filter_map(|(idx1, m1)| {
            g2.node_index_by_qualified_name(&m1.qualified_name)
                .map(|idx2| (idx1, idx2))
        })
        .collect();

    for (idx1, idx2) in pairs {
        g1.method_mut(idx1).equivalent = Some(idx2);
        g2.method_mut(idx2).equivalent = Some(idx1);
    }
}

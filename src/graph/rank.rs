//! Top-N edge ranking.

use petgraph::graph::EdgeIndex;

use crate::graph::CallGraph;

/// Returns the first `n` edges of `cg` sorted descending by `value`,
/// restricted to edges whose source has an equivalent in the other graph.
/// Ties are broken by ascending edge id for a deterministic order.
pub fn top_n(cg: &CallGraph, n: usize) -> Vec<EdgeIndex> {
    if n == 0 {
        return Vec::new();
    }

    let mut candidates: Vec<EdgeIndex> = cg
        .edge_order()
        .iter()
        .copied()
        .filter(|&edge| {
            let (source, _target) = cg.edge_endpoints(edge);
            cg.method(source).equivalent.is_some()
        })
        .collect();

    candidates.sort_by(|&a, &b| {
        let da = cg.edge_data(a);
        let db = cg.edge_data(b);
        db.value
            .partial_cmp(&da.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(da.id.cmp(&db.id))
    });

    candidates.truncate(n);
    candidates
}

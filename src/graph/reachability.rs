//! Fixed-point reachability propagation over the `{Unreachable <
//! SpuriouslyReachable < TrulyReachable}` lattice.

use crate::graph::method::Reachability;
use crate::graph::CallGraph;

/// Propagates reachability from entry points (already seeded to
/// `TrulyReachable` by [`crate::graph::method::Method::new`]) across every
/// edge until a pass makes no change.
///
/// Runs as repeated full passes over the edge list rather than a worklist:
/// the graphs in scope here are small enough that a worklist's bookkeeping
/// would not pay for itself. The lattice is finite and the update
/// monotonic, so the fixed point is reached in at most `2 * method_count`
/// passes.
pub fn compute(cg: &mut CallGraph) {
    loop {
        let mut changed = false;

        for &edge in cg.edge_order() {
            let (source, target) = cg.edge_endpoints(edge);
            let is_spurious = cg.edge_data(edge).is_spurious;
            let source_reachability = cg.method(source).reachability;

            let proposed = match source_reachability {
                Reachability::TrulyReachable => {
                    if is_spurious {
                        Reachability::SpuriouslyReachable
                    } else {
                        Reachability::TrulyReachable
                    }
                }
                Reachability::SpuriouslyReachable => Reachability::SpuriouslyReachable,
                Reachability::Unreachable => continue,
            };

            let target_method = cg.method_mut(target);
            if proposed > target_method.reachability {
                target_method.reachability = proposed;
                target_method.value = 1.0;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
}

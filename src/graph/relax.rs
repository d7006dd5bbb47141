//! Iterative value-propagation over the supergraph's remaining edges,
//! weighted by whether each endpoint is covered by the paired graph.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::graph::method::Reachability;
use crate::graph::CallGraph;

pub const ALPHA: f64 = 0.125;
pub const EPSILON: f64 = 0.001;
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Outcome of a relaxation run: how many outer iterations actually ran and
/// the largest per-pass level observed in the last completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxOutcome {
    pub iterations: usize,
    pub max: f64,
    pub cancelled: bool,
}

/// `level(m)`: zero if `m` has a reachable equivalent in `other`, else
/// `m.value`. A method with level zero is already covered by the other
/// graph's analysis and acts as a sink in the relaxation.
fn level(method: &crate::graph::Method, other: &CallGraph) -> f64 {
    match method.equivalent {
        Some(eq) if other.method(eq).reachability != Reachability::Unreachable => 0.0,
        _ => method.value,
    }
}

/// Runs the relaxation on `cg` (the supergraph) against `other` (the
/// subgraph) until `max` drops to or below `EPSILON`, `max_iterations` is
/// reached, or `cancel` is observed set. `cancel` is polled once per outer
/// iteration, never per edge.
pub fn run(cg: &mut CallGraph, other: &CallGraph, max_iterations: usize, cancel: &AtomicBool) -> RelaxOutcome {
    let mut max = 1.0_f64;
    let mut i = 0;
    let mut cancelled = false;

    while max > EPSILON && i < max_iterations {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }

        max = 0.0;
        let edges: Vec<_> = cg.edge_order().to_vec();

        for edge in edges {
            let (source, target) = cg.edge_endpoints(edge);
            let l_t = level(cg.method(target), other);
            let l_s = level(cg.method(source), other);
            max = max.max(l_t).max(l_s);

            let delta = ALPHA * (l_t - l_s);
            if delta > 0.0 {
                cg.edge_data_mut(edge).value += delta;
                cg.method_mut(target).value -= delta;
                cg.method_mut(source).value += delta;
            }
        }

        i += 1;
        if i % 100 == 0 {
            tracing::info!(iteration = i, max, "relaxation progress");
        }
    }

    if !cancelled {
        tracing::info!(iteration = i, max, "relaxation finished");
    }

    RelaxOutcome {
        iterations: i,
        max,
        cancelled,
    }
}

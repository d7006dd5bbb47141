//! Composes the loader, edge builder, reachability engine, equivalence
//! linker, edge purger, relaxation, and ranker into one run.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use petgraph::graph::EdgeIndex;

use crate::error::Result;
use crate::graph::{builder, equivalence, loader, purge, rank, reachability, relax};
use crate::graph::relax::RelaxOutcome;
use crate::graph::CallGraph;
use crate::output;

pub struct DiffConfig {
    pub max_iterations: usize,
    pub top_n: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig {
            max_iterations: relax::DEFAULT_MAX_ITERATIONS,
            top_n: 10,
        }
    }
}

pub struct DiffReport {
    pub supergraph: CallGraph,
    pub subgraph: CallGraph,
    pub ranked: Vec<EdgeIndex>,
    pub relax_outcome: RelaxOutcome,
}

/// Loads `super_dir`/`sub_dir`, runs the full pipeline, and returns the
/// ranked edge list alongside both graphs (needed by the caller to print
/// or export them). `cancel` is polled by the relaxation stage.
pub fn run(super_dir: &Path, sub_dir: &Path, config: &DiffConfig, cancel: &AtomicBool) -> Result<DiffReport> {
    let mut supergraph = loader::load(super_dir, "supergraph")?;
    let mut subgraph = loader::load(sub_dir, "subgraph")?;

    let promoted = builder::devirtualize(&mut supergraph);
    tracing::info!(promoted, "devirtualization complete");

    builder::build_edges(&mut supergraph);
    builder::build_edges(&mut subgraph);

    reachability::compute(&mut supergraph);
    reachability::compute(&mut subgraph);
    supergraph.recompute_tally();
    subgraph.recompute_tally();
    output::graph_summary(&supergraph);
    output::graph_summary(&subgraph);

    purge::purge_unreachable_sourced(&mut supergraph);
    output::graph_summary(&supergraph);

    equivalence::link(&mut supergraph, &mut subgraph);
    purge::purge_common(&mut supergraph, &subgraph);

    let relax_outcome = relax::run(&mut supergraph, &subgraph, config.max_iterations, cancel);
    tracing::info!(
        iterations = relax_outcome.iterations,
        max = relax_outcome.max,
        cancelled = relax_outcome.cancelled,
        "relaxation outcome"
    );

    let ranked = rank::top_n(&supergraph, config.top_n);

    Ok(DiffReport {
        supergraph,
        subgraph,
        ranked,
        relax_outcome,
    })
}

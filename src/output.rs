//! Plain console reporting, layered alongside `tracing` events.

use std::io::IsTerminal;

pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m";

#[inline]
fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn info(msg: &str) {
    let (c, r) = if is_terminal() { (GREEN, NC) } else { ("", "") };
    println!("{c}[INFO]{r} {msg}");
}

pub fn warn(msg: &str) {
    let (c, r) = if is_terminal() { (YELLOW, NC) } else { ("", "") };
    eprintln!("{c}[WARN]{r} {msg}");
}

pub fn error(msg: &str) {
    let (c, r) = if is_terminal() { (RED, NC) } else { ("", "") };
    eprintln!("{c}[ERROR]{r} {msg}");
}

pub fn header(msg: &str) {
    let (c, r) = if is_terminal() { (BOLD, NC) } else { ("", "") };
    println!("{c}==>{r} {msg}");
}

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;

/// One line per graph after load and again after the unreachable-sourced
/// purge: name, method count, reachable-method count, edge count.
pub fn graph_summary(cg: &crate::graph::CallGraph) {
    let tally = cg.tally();
    println!(
        "{}: {} methods ({} reachable), {} edges ({} spurious)",
        cg.name(),
        cg.method_count(),
        tally.reachable(),
        tally.edges_total,
        tally.edges_spurious,
    );
}

/// One line per ranked edge: `[value] Type.name(params) -> Type.name(params)`.
pub fn ranked_edge(cg: &crate::graph::CallGraph, edge: petgraph::graph::EdgeIndex) {
    let (source, target) = cg.edge_endpoints(edge);
    let value = cg.edge_data(edge).value;
    println!("{}", crate::graph::edge::format_edge(value, cg.method(source), cg.method(target)));
}

#[derive(serde::Serialize)]
struct RankedEdgeJson {
    value: f64,
    source: String,
    target: String,
}

#[derive(serde::Serialize)]
struct JsonReport {
    supergraph: String,
    subgraph: String,
    supergraph_methods: usize,
    supergraph_edges: usize,
    ranked: Vec<RankedEdgeJson>,
}

/// Renders the ranked edge list (and both graphs' names/sizes) as a single
/// compact JSON object on stdout.
pub fn print_json_report(supergraph: &crate::graph::CallGraph, subgraph: &crate::graph::CallGraph, ranked: &[petgraph::graph::EdgeIndex]) {
    let report = JsonReport {
        supergraph: supergraph.name().to_string(),
        subgraph: subgraph.name().to_string(),
        supergraph_methods: supergraph.method_count(),
        supergraph_edges: supergraph.edge_count(),
        ranked: ranked
            .iter()
            .map(|&edge| {
                let (source, target) = supergraph.edge_endpoints(edge);
                RankedEdgeJson {
                    value: supergraph.edge_data(edge).value,
                    source: supergraph.method(source).short_form(),
                    target: supergraph.method(target).short_form(),
                }
            })
            .collect(),
    };
    println!("{}", serde_json::to_string(&report).unwrap_or_default());
}

/// Writes the supergraph's method table to `path`, one row per method,
/// with a trailing `PresentInOther` column set from `equivalent`.
pub fn write_methods_csv(cg: &crate::graph::CallGraph, path: &std::path::Path) -> crate::error::Result<()> {
    use std::io::Write as _;

    let mut out = std::fs::File::create(path).map_err(|e| {
        crate::error::DiffError::Usage(format!("could not create {}: {}", path.display(), e))
    })?;

    writeln!(out, "Id,Name,Type,Parameters,Return,Display,Flags,IsEntryPoint,PresentInOther")
        .map_err(|e| crate::error::DiffError::Usage(e.to_string()))?;

    for (_, m) in cg.methods() {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            m.id,
            m.name,
            m.declared_type,
            if m.params.is_empty() { "empty" } else { &m.params },
            m.return_type,
            m.display,
            m.flags,
            m.is_entry_point,
            m.equivalent.is_some(),
        )
        .map_err(|e| crate::error::DiffError::Usage(e.to_string()))?;
    }

    Ok(())
}

//! Call-graph edge payload and the auxiliary Cypher emitter.

use crate::graph::method::Method;

/// Edge weight stored on the `petgraph` graph. Source/target are the
/// edge's own endpoints, obtainable via `graph.edge_endpoints(idx)` — not
/// duplicated here.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub id: i64,
    pub is_spurious: bool,
    pub value: f64,
}

impl EdgeData {
    pub fn new(id: i64, is_spurious: bool) -> Self {
        EdgeData {
            id,
            is_spurious,
            value: 0.0,
        }
    }
}

/// Console short form for an edge: `[value] src.short() -> tgt.short()`.
/// `value` is rendered with 4 significant digits, general format (`%.4g`),
/// matching the original tool's `edge_print`.
pub fn format_edge(value: f64, source: &Method, target: &Method) -> String {
    format!("[{}] {} -> {}", format_significant(value, 4), source.short_form(), target.short_form())
}

/// Mimics C's `%.*g`: fixed-point when the value's exponent falls in
/// `[-4, sig_figs)`, scientific notation otherwise, with trailing zeros
/// (and a dangling decimal point) stripped.
fn format_significant(value: f64, sig_figs: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let sig_figs = sig_figs.max(1) as i32;
    let exp = value.abs().log10().floor() as i32;

    if exp >= -4 && exp < sig_figs {
        let decimals = (sig_figs - 1 - exp).max(0) as usize;
        trim_trailing_zeros(&format!("{value:.decimals$}"))
    } else {
        let decimals = (sig_figs - 1).max(0) as usize;
        let formatted = format!("{value:.decimals$e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap();
        let exponent: i32 = exponent.parse().unwrap();
        format!(
            "{}e{}{:02}",
            trim_trailing_zeros(mantissa),
            if exponent < 0 { "-" } else { "+" },
            exponent.abs()
        )
    }
}

fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Renders an edge (and an optional path depth) as a Neo4j Cypher query
/// fragment. The output text is a fixed contract consumed by downstream
/// tooling, so field order and literal punctuation must not drift.
pub fn cypher(source: &Method, target: &Method, depth: u32) -> String {
    if depth > 0 {
        format!(
            "MATCH (m1:Method {{Type: '{}', Name: '{}', Parameters: '{}', Return: '{}'}})\n\
             -[:CALLS]->(m2:Method {{Type: '{}', Name: '{}', Parameters: '{}', Return: '{}'}})\n\
             MATCH path = (m2)-[:CALLS]->{{0,{}}}(:Method {{PresentInOther: 'false'}})\n\
             WHERE ALL(m IN nodes(path) WHERE m.PresentInOther = 'false')\n\
             RETURN m1, m2, path\n",
            source.declared_type,
            source.name,
            source.params,
            source.return_type,
            target.declared_type,
            target.name,
            target.params,
            target.return_type,
            depth,
        )
    } else {
        format!(
            "MATCH (m1:Method {{Type: '{}', Name: '{}', Parameters: '{}', Return: '{}'}})\n\
             -[:CALLS]->(m2:Method {{Type: '{}', Name: '{}', Parameters: '{}', Return: '{}'}})\n\
             RETURN m1, m2\n",
            source.declared_type,
            source.name,
            source.params,
            source.return_type,
            target.declared_type,
            target.name,
            target.params,
            target.return_type,
        )
    }
}

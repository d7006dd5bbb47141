//! Tabular loader: parses the three sibling CSV files into a `CallGraph`.
//!
//! This is a deliberately thin reader — no embedded commas or quoting are
//! supported. Tokenizing a row is just `line.split(',')`; the interesting
//! work here is resolving the file's own integer ids into
//! `petgraph::NodeIndex`/invoke-slot indices as rows are read, and
//! rejecting malformed input early.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{DiffError, Result};
use crate::graph::edge::EdgeData;
use crate::graph::method::Method;
use crate::graph::invoke::InvokeSite;
use crate::graph::CallGraph;

const METHODS_FILE: &str = "call_tree_methods.csv";
const INVOKES_FILE: &str = "call_tree_invokes.csv";
const TARGETS_FILE: &str = "call_tree_targets.csv";

/// A dense, growable array indexed directly by a file-supplied integer id.
/// Grows on demand rather than using a hash table, since ids here are
/// small and roughly contiguous.
struct IdMap<T> {
    items: Vec<Option<T>>,
}

impl<T> IdMap<T> {
    fn new() -> Self {
        IdMap { items: Vec::new() }
    }

    fn set(&mut self, id: i64, value: T) {
        let idx = id as usize;
        if idx >= self.items.len() {
            self.items.resize_with(idx + 1, || None);
        }
        self.items[idx] = Some(value);
    }

    fn get(&self, id: i64) -> Option<&T> {
        if id < 0 {
            return None;
        }
        self.items.get(id as usize).and_then(|o| o.as_ref())
    }
}

fn load_error(file: &str, row: usize, reason: impl Into<String>) -> DiffError {
    DiffError::Load {
        file: file.to_string(),
        row,
        reason: reason.into(),
    }
}

fn inconsistent(file: &str, row: usize, reason: impl Into<String>) -> DiffError {
    DiffError::InconsistentGraph {
        file: file.to_string(),
        row,
        reason: reason.into(),
    }
}

fn read_lines(dir: &Path, filename: &str) -> Result<Vec<String>> {
    let path = dir.join(filename);
    let contents = fs::read_to_string(&path).map_err(|e| {
        load_error(
            filename,
            0,
            format!("could not read {}: {}", path.display(), e),
        )
    })?;
    Ok(contents.lines().map(str::to_string).collect())
}

fn split_row(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n']).split(',').collect()
}

fn parse_id(field: &str, file: &str, row: usize, column: &str) -> Result<i64> {
    field
        .parse::<i64>()
        .map_err(|_| load_error(file, row, format!("column `{column}` is not an integer: {field:?}")))
}

fn parse_bool(field: &str, file: &str, row: usize, column: &str) -> Result<bool> {
    match field {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(load_error(
            file,
            row,
            format!("column `{column}` is not `true`/`false`: {other:?}"),
        )),
    }
}

/// Loads `call_tree_methods.csv` into `graph`/`by_qualified_name`,
/// returning the id→NodeIndex map used to resolve the other two tables.
fn load_methods(
    dir: &Path,
    graph: &mut DiGraph<Method, EdgeData>,
    by_qualified_name: &mut HashMap<String, NodeIndex>,
) -> Result<IdMap<NodeIndex>> {
    tracing::info!(file = METHODS_FILE, dir = %dir.display(), "opening file");
    let lines = read_lines(dir, METHODS_FILE)?;
    let mut methods_by_id = IdMap::new();

    for (row, line) in lines.into_iter().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        let mut fields = split_row(&line);

        // A row with only seven fields has an empty `Flags` column: shift
        // the `IsEntryPoint` value from column 6 into column 7 and treat
        // flags as empty.
        let flags;
        let is_entry_point_field;
        match fields.len() {
            8 => {
                flags = fields[6].to_string();
                is_entry_point_field = fields[7];
            }
            7 => {
                is_entry_point_field = fields[6];
                flags = String::new();
                fields.push(""); // keep indexing uniform below
            }
            n => {
                return Err(load_error(
                    METHODS_FILE,
                    row + 1,
                    format!("expected 7 or 8 fields, found {n}"),
                ));
            }
        }

        let id = parse_id(fields[0], METHODS_FILE, row + 1, "Id")?;
        let name = fields[1].to_string();
        let declared_type = fields[2].to_string();
        let params = if fields[3] == "empty" {
            String::new()
        } else {
            fields[3].to_string()
        };
        let return_type = fields[4].to_string();
        let display = fields[5].to_string();
        let is_entry_point = parse_bool(is_entry_point_field, METHODS_FILE, row + 1, "IsEntryPoint")?;

        let method = Method::new(id, name, declared_type, params, return_type, display, flags, is_entry_point);
        let qualified_name = method.qualified_name.clone();

        if by_qualified_name.contains_key(&qualified_name) {
            return Err(load_error(
                METHODS_FILE,
                row + 1,
                format!("duplicate qualified_name {qualified_name:?}"),
            ));
        }

        let idx = graph.add_node(method);
        by_qualified_name.insert(qualified_name, idx);
        methods_by_id.set(id, idx);
    }

    Ok(methods_by_id)
}

/// Loads `call_tree_invokes.csv`, resolving `MethodId`/`TargetId` through
/// `methods_by_id`.
fn load_invokes(dir: &Path, methods_by_id: &IdMap<NodeIndex>) -> Result<(Vec<InvokeSite>, IdMap<usize>)> {
    tracing::info!(file = INVOKES_FILE, dir = %dir.display(), "opening file");
    let lines = read_lines(dir, INVOKES_FILE)?;
    let mut invokes = Vec::new();
    let mut invokes_by_id = IdMap::new();

    for (row, line) in lines.into_iter().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        let fields = split_row(&line);
        if fields.len() != 5 {
            return Err(load_error(
                INVOKES_FILE,
                row + 1,
                format!("expected 5 fields, found {}", fields.len()),
            ));
        }

        let id = parse_id(fields[0], INVOKES_FILE, row + 1, "Id")?;
        let method_id = parse_id(fields[1], INVOKES_FILE, row + 1, "MethodId")?;
        let bci = fields[2].to_string();
        let target_id = parse_id(fields[3], INVOKES_FILE, row + 1, "TargetId")?;
        let is_direct = parse_bool(fields[4], INVOKES_FILE, row + 1, "IsDirect")?;

        let method = *methods_by_id.get(method_id).ok_or_else(|| {
            inconsistent(INVOKES_FILE, row + 1, format!("MethodId {method_id} does not resolve"))
        })?;
        let target = *methods_by_id.get(target_id).ok_or_else(|| {
            inconsistent(INVOKES_FILE, row + 1, format!("TargetId {target_id} does not resolve"))
        })?;

        let slot = invokes.len();
        invokes.push(InvokeSite::new(id, method, target, bci, is_direct));
        invokes_by_id.set(id, slot);
    }

    Ok((invokes, invokes_by_id))
}

/// Loads `call_tree_targets.csv`, appending to each invoke's `targets` in
/// file order.
fn load_targets(
    dir: &Path,
    invokes: &mut [InvokeSite],
    methods_by_id: &IdMap<NodeIndex>,
    invokes_by_id: &IdMap<usize>,
) -> Result<()> {
    tracing::info!(file = TARGETS_FILE, dir = %dir.display(), "opening file");
    let lines = read_lines(dir, TARGETS_FILE)?;

    for (row, line) in lines.into_iter().enumerate().skip(1) {
        if line.is_empty() {
            continue;
        }
        let fields = split_row(&line);
        if fields.len() != 2 {
            return Err(load_error(
                TARGETS_FILE,
                row + 1,
                format!("expected 2 fields, found {}", fields.len()),
            ));
        }

        let invoke_id = parse_id(fields[0], TARGETS_FILE, row + 1, "InvokeId")?;
        let target_method_id = parse_id(fields[1], TARGETS_FILE, row + 1, "TargetMethodId")?;

        let slot = *invokes_by_id.get(invoke_id).ok_or_else(|| {
            inconsistent(TARGETS_FILE, row + 1, format!("InvokeId {invoke_id} does not resolve"))
        })?;
        let target = *methods_by_id.get(target_method_id).ok_or_else(|| {
            inconsistent(
                TARGETS_FILE,
                row + 1,
                format!("TargetMethodId {target_method_id} does not resolve"),
            )
        })?;

        invokes[slot].add_target(target);
    }

    Ok(())
}

/// Loads a call graph named `name` from the three sibling CSV files in
/// `dir`. The transient `methods_by_id`/`invokes_by_id` arrays used to
/// resolve cross-references are dropped once this returns.
pub fn load(dir: &Path, name: impl Into<String>) -> Result<CallGraph> {
    let mut graph = DiGraph::new();
    let mut by_qualified_name = HashMap::new();

    let methods_by_id = load_methods(dir, &mut graph, &mut by_qualified_name)?;
    let (mut invokes, invokes_by_id) = load_invokes(dir, &methods_by_id)?;
    load_targets(dir, &mut invokes, &methods_by_id, &invokes_by_id)?;

    Ok(CallGraph::new(name.into(), graph, by_qualified_name, invokes))
}

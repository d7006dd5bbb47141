//! Invoke sites: one per call site in a caller method.

use petgraph::graph::NodeIndex;

/// A single call site, with its nominal/static target and the (possibly
/// larger) set of resolved targets filled in from the targets table.
#[derive(Debug, Clone)]
pub struct InvokeSite {
    pub id: i64,
    /// The caller.
    pub method: NodeIndex,
    /// The nominal/static target named directly on the invoke row.
    pub target: NodeIndex,
    /// Opaque bytecode index.
    pub bci: String,
    pub is_direct: bool,
    /// Resolved targets, in targets-table file order.
    pub targets: Vec<NodeIndex>,
}

impl InvokeSite {
    pub fn new(id: i64, method: NodeIndex, target: NodeIndex, bci: String, is_direct: bool) -> Self {
        InvokeSite {
            id,
            method,
            target,
            bci,
            is_direct,
            targets: Vec::new(),
        }
    }

    pub fn add_target(&mut self, target: NodeIndex) {
        self.targets.push(target);
    }
}

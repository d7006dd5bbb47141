//! Method entity and the reachability lattice.

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Three-valued reachability lattice, `Unreachable < SpuriouslyReachable < TrulyReachable`.
///
/// Declaration order doubles as the lattice order: the derived `Ord`
/// compares variants by discriminant, so `Unreachable (0) < SpuriouslyReachable (1)
/// < TrulyReachable (2)` falls out of `#[derive(PartialOrd, Ord)]` without a
/// hand-written comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Reachability {
    Unreachable,
    SpuriouslyReachable,
    TrulyReachable,
}

impl Default for Reachability {
    fn default() -> Self {
        Reachability::Unreachable
    }
}

impl Reachability {
    pub fn is_reachable(self) -> bool {
        self != Reachability::Unreachable
    }
}

/// One method in a call graph, addressed by its owning graph's `NodeIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    /// Id from the input file; unique within the graph, used only to
    /// resolve cross-references during loading and to key the edge
    /// dedup set.
    pub id: i64,
    pub name: String,
    pub declared_type: String,
    pub params: String,
    pub return_type: String,
    pub display: String,
    pub flags: String,
    /// Deterministic equivalence key: `"{declared_type}.{name}({params}):{flags}:{return_type}"`.
    pub qualified_name: String,
    pub is_entry_point: bool,
    pub reachability: Reachability,
    pub value: f64,
    /// Index of the corresponding method in the *other* graph, if any.
    /// Only valid while both graphs are alive.
    #[serde(skip)]
    pub equivalent: Option<NodeIndex>,
}

impl Method {
    pub fn new(
        id: i64,
        name: String,
        declared_type: String,
        params: String,
        return_type: String,
        display: String,
        flags: String,
        is_entry_point: bool,
    ) -> Self {
        let qualified_name = qualified_name(&declared_type, &name, &params, &flags, &return_type);
        Method {
            id,
            name,
            declared_type,
            params,
            return_type,
            display,
            flags,
            qualified_name,
            is_entry_point,
            reachability: if is_entry_point {
                Reachability::TrulyReachable
            } else {
                Reachability::Unreachable
            },
            value: 0.0,
            equivalent: None,
        }
    }

    /// Short form used in console output and the ranker:
    /// `Type.name(params)`.
    pub fn short_form(&self) -> String {
        format!("{}.{}({})", self.declared_type, self.name, self.params)
    }
}

/// Builds the canonical equivalence key. Must be produced identically by
/// any implementation — this is the string two graphs' methods are matched
/// on.
pub fn qualified_name(
    declared_type: &str,
    name: &str,
    params: &str,
    flags: &str,
    return_type: &str,
) -> String {
    format!("{declared_type}.{name}({params}):{flags}:{return_type}")
}

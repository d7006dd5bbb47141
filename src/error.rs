//! Typed error kinds for the loader and CLI boundary.

use thiserror::Error;

/// Errors that can abort a run.
///
/// The core diff algorithm itself cannot fail once data is loaded — the
/// fixed-point iterations always terminate — so every variant here
/// originates either at the CLI boundary or during loading.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Missing/extra CLI arguments, or an argument that parses but is out
    /// of the domain described in the usage message.
    #[error("usage error: {0}")]
    Usage(String),

    /// A tabular input file was missing, unreadable, or a row had the
    /// wrong number of fields.
    #[error("failed to load {file} (row {row}): {reason}")]
    Load {
        file: String,
        row: usize,
        reason: String,
    },

    /// A row referenced a method/invoke id that does not resolve within
    /// the same graph.
    #[error("inconsistent graph in {file} (row {row}): {reason}")]
    InconsistentGraph {
        file: String,
        row: usize,
        reason: String,
    },

    /// Surfaced only if the platform reports allocation failure; not a
    /// reachable path under Rust's default global allocator, kept for
    /// parity with the original error taxonomy.
    #[error("allocation failure: {0}")]
    Allocation(String),
}

pub type Result<T> = std::result::Result<T, DiffError>;

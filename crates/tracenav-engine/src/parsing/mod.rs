//! # Transaction Parsing
//!
//! Two-phase, edge-based parsing of a flat trace buffer into a forest of
//! nested transactions.
//!
//! ## Parsing Phases
//!
//! 1. **Edge Classification** (`edges`): one combined regex scan yields start,
//!    end and discard-end edges in document order
//!
//! 2. **Pairing** (`builder`): a `TransactionBuilder` keeps a stack of open
//!    transactions and pairs each end edge with the innermost open start
//!
//! ## Modules
//!
//! - **`types`**: Core types (`Transaction`, `Edge`, `EdgeKind`)
//! - **`edges`**: `BoundaryPattern` classifying boundary matches
//! - **`builder`**: `TransactionBuilder` stack machine
//! - **`view`**: `TransactionView`, derived metadata recomputed on every read
//! - **`snapshot`**: outline rendering and invariant checks for tests
//!
//! ## Key Invariants
//!
//! - Children lie inside their parent's `[start, end)` whenever all bounds are set
//! - Roots are in document order
//! - Unbalanced edges never fail a parse; they produce half-open roots
//! - The forest is rebuilt in full on every call

pub mod builder;
pub mod edges;
pub mod snapshot;
pub mod types;
pub mod view;

#[cfg(test)]
mod tests;

pub use builder::TransactionBuilder;
pub use edges::BoundaryPattern;
pub use types::{Edge, EdgeKind, Transaction};
pub use view::{MISSING_TIMESTAMP, TransactionView};

use crate::host::LineOffsets;

/// Builds the transaction forest for `text`.
///
/// `lines` resolves the line bounds of each edge and must describe the same
/// text.
pub fn build_transactions<L: LineOffsets + ?Sized>(
    text: &str,
    lines: &L,
    boundaries: &BoundaryPattern,
) -> Vec<Transaction> {
    let mut builder = TransactionBuilder::new(lines);
    for edge in boundaries.edges(text) {
        builder.push(edge);
    }
    let forest = builder.finish(text.len());
    log::debug!(
        "Built {} root transactions from {} bytes",
        forest.len(),
        text.len()
    );
    forest
}

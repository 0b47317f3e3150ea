//! # Snapshot Testing Support
//!
//! Utilities for testing the builder via snapshot assertions and invariant
//! checks.
//!
//! - **`normalize`**: renders a forest as a stable, indented outline for
//!   `insta` snapshots
//! - **`invariants`**: runtime checks for builder correctness (bounds inside
//!   the document, children contained in parents, roots in order)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::outline;

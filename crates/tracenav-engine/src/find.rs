//! Literal text search for the highlight overlay.

use std::ops::Range;

use crate::error::TraceError;
use crate::patterns::Pattern;

/// Every occurrence of a search term, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindResults {
    pub term: String,
    pub ranges: Vec<Range<usize>>,
}

impl FindResults {
    pub fn count(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True when `offset` lies inside one of the highlighted ranges.
    pub fn highlights(&self, offset: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(&offset))
    }
}

/// Finds `term` verbatim; regex metacharacters in it match themselves.
///
/// An empty term finds nothing.
pub fn find_literal(text: &str, term: &str) -> Result<FindResults, TraceError> {
    let ranges = if term.is_empty() {
        Vec::new()
    } else {
        Pattern::literal(term)?
            .find_all(text)
            .map(|m| m.range())
            .collect()
    };
    Ok(FindResults {
        term: term.to_string(),
        ranges,
    })
}

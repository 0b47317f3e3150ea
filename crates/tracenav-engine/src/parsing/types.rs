use std::ops::Range;

/// The role a boundary match plays in pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Opens a transaction.
    Start,
    /// Closes the innermost open transaction.
    End,
    /// Closes the innermost open transaction that was discarded.
    DiscardEnd,
}

/// A classified boundary match at a byte offset of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub kind: EdgeKind,
    pub index: usize,
}

/// A span of trace text bounded by a start and an end edge.
///
/// Offsets are half-open `[start, end)` byte offsets. Either bound may be unset
/// when the matching edge lies outside the document (an unterminated or
/// unstarted transaction).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub start: Option<usize>,
    pub end: Option<usize>,
    /// Nested transactions, in document order.
    pub children: Vec<Transaction>,
}

impl Transaction {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self {
            start,
            end,
            children: Vec::new(),
        }
    }

    /// Both bounds, when both are known.
    pub fn span(&self) -> Option<Range<usize>> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(start..end),
            _ => None,
        }
    }

    /// True when `position` lies strictly between both bounds.
    ///
    /// A position exactly on either bound is outside.
    pub fn strictly_contains(&self, position: usize) -> bool {
        matches!(
            (self.start, self.end),
            (Some(start), Some(end)) if start < position && position < end
        )
    }

    /// Transactions are rebuilt on every derivation, so identity is the pair
    /// of bounds.
    pub fn same_span(&self, other: &Transaction) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Nesting depth of this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Transaction::depth).max().unwrap_or(0)
    }

    /// Number of transactions in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Transaction::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::inside(5, true)]
    #[case::on_start(0, false)]
    #[case::on_end(10, false)]
    #[case::outside(11, false)]
    fn strict_containment(#[case] position: usize, #[case] expected: bool) {
        let tx = Transaction::new(Some(0), Some(10));
        assert_eq!(tx.strictly_contains(position), expected);
    }

    #[test]
    fn half_open_transactions_contain_nothing() {
        assert!(!Transaction::new(None, Some(10)).strictly_contains(5));
        assert!(!Transaction::new(Some(0), None).strictly_contains(5));
        assert_eq!(Transaction::new(Some(0), None).span(), None);
    }

    #[test]
    fn depth_and_count() {
        let mut outer = Transaction::new(Some(0), Some(20));
        let mut middle = Transaction::new(Some(1), Some(15));
        middle.children.push(Transaction::new(Some(2), Some(5)));
        outer.children.push(middle);
        outer.children.push(Transaction::new(Some(16), Some(19)));

        assert_eq!(outer.depth(), 3);
        assert_eq!(outer.count(), 4);
    }

    #[test]
    fn same_span_ignores_children() {
        let mut a = Transaction::new(Some(0), Some(10));
        a.children.push(Transaction::new(Some(1), Some(2)));
        let b = Transaction::new(Some(0), Some(10));
        assert!(a.same_span(&b));
        assert_ne!(a, b);
    }
}

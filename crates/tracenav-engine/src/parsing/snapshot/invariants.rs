use crate::parsing::types::Transaction;

/// Validates builder output invariants.
///
/// Asserts that:
/// - Every set bound lies within the document
/// - Children are contained within their parent when all bounds are set
/// - Roots and siblings with known starts appear in document order
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(document_len: usize, forest: &[Transaction]) {
    check_siblings(document_len, forest);
}

fn check_siblings(document_len: usize, siblings: &[Transaction]) {
    let mut previous_start = None;
    for t in siblings {
        for bound in [t.start, t.end].into_iter().flatten() {
            assert!(
                bound <= document_len,
                "transaction bound {bound} out of bounds (document len: {document_len})"
            );
        }
        if let (Some(start), Some(end)) = (t.start, t.end) {
            assert!(start <= end, "transaction starts after it ends: {start}..{end}");
        }
        if let Some(start) = t.start {
            if let Some(previous) = previous_start {
                assert!(
                    previous <= start,
                    "siblings out of order: {previous} before {start}"
                );
            }
            previous_start = Some(start);
        }
        for child in &t.children {
            if let (Some(ps), Some(pe), Some(cs), Some(ce)) = (t.start, t.end, child.start, child.end)
            {
                assert!(
                    ps <= cs && ce <= pe,
                    "child {cs}..{ce} not contained in parent {ps}..{pe}"
                );
            }
        }
        check_siblings(document_len, &t.children);
    }
}

//! Builder tests over real trace text.
//!
//! Outlines are asserted with inline `insta` snapshots; structural properties
//! are checked with `snapshot::invariants` on every forest.

use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::parsing::{BoundaryPattern, Transaction, build_transactions, snapshot};

fn boundaries() -> BoundaryPattern {
    BoundaryPattern::new(
        "Start transaction",
        "End transaction",
        Some("Discard transaction"),
    )
    .unwrap()
}

fn parse(text: &str) -> Vec<Transaction> {
    let rope = Rope::from(text);
    let forest = build_transactions(text, &rope, &boundaries());
    snapshot::invariants(text.len(), &forest);
    forest
}

const NESTED: &str = "\
End transaction
[21/03/24 10:00:00.000] Start transaction
[21/03/24 10:00:00.100] Start transaction
[21/03/24 10:00:00.200] End transaction
[21/03/24 10:00:00.300] Start transaction
[21/03/24 10:00:00.400] Discard transaction
[21/03/24 10:00:00.500] End transaction
[21/03/24 10:00:01.000] Start transaction
trailing line";

#[test]
fn single_transaction_spans_start_line_to_end_line() {
    let text = "Start transaction\nfoo\nEnd transaction\n";
    let forest = parse(text);

    assert_eq!(forest, vec![Transaction::new(Some(0), Some(37))]);
    assert_eq!(&text[0..37], "Start transaction\nfoo\nEnd transaction");
}

#[test]
fn nested_trace_outline() {
    let forest = parse(NESTED);

    insta::assert_snapshot!(snapshot::outline(NESTED, &forest), @r#"
    0..15 "End transaction"
    16..265 "[21/03/24 10:00:00.000] Start transaction"
      58..139 "[21/03/24 10:00:00.100] Start transaction"
      140..225 "[21/03/24 10:00:00.300] Start transaction"
    266..320 "[21/03/24 10:00:01.000] Start transaction"
    "#);
}

#[test]
fn dangling_edges_are_bounded_by_the_document() {
    let text = "End transaction\nmiddle\nStart transaction\ntail";
    let forest = parse(text);

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].start, Some(0));
    assert_eq!(forest[1].end, Some(text.len() - 1));
}

#[test]
fn lone_unterminated_transaction_stays_open() {
    let forest = parse("Start transaction\nstill running");
    assert_eq!(forest, vec![Transaction::new(Some(0), None)]);
}

#[rstest]
#[case::flat(1, 4)]
#[case::two_deep(2, 3)]
#[case::five_deep(5, 2)]
fn balanced_edges_round_trip(#[case] depth: usize, #[case] roots: usize) {
    let mut text = String::new();
    let mut expected_starts = Vec::new();
    for r in 0..roots {
        for d in 0..depth {
            expected_starts.push((r, d, text.len()));
            text.push_str(&format!("{}Start transaction {r}.{d}\n", "  ".repeat(d)));
            text.push_str("payload line\n");
        }
        for d in (0..depth).rev() {
            text.push_str(&format!("{}End transaction {r}.{d}\n", "  ".repeat(d)));
        }
    }

    let forest = parse(&text);

    assert_eq!(forest.len(), roots);
    for root in &forest {
        assert_eq!(root.depth(), depth);
        assert_eq!(root.count(), depth);
    }

    // Each node starts at its start line and ends at the end of its end line
    for (r, d, line_start) in expected_starts {
        let mut node = &forest[r];
        for _ in 0..d {
            node = &node.children[0];
        }
        assert_eq!(node.start, Some(line_start));
        let end = node.end.unwrap();
        let end_line = text[..end].rsplit('\n').next().unwrap();
        assert_eq!(end_line, format!("{}End transaction {r}.{d}", "  ".repeat(d)));
        assert_eq!(&text[end..end + 1], "\n");
    }
}

#[rstest]
#[case::empty("")]
#[case::no_edges("just\nsome\nlines\n")]
#[case::only_ends("End transaction\nEnd transaction\nEnd transaction")]
#[case::only_starts("Start transaction\nStart transaction\n")]
#[case::interleaved_noise("Start transaction\nEnd transaction\nEnd transaction\nStart transaction\nStart transaction\nEnd transaction")]
#[case::nested(NESTED)]
fn nesting_invariant_holds(#[case] text: &str) {
    // invariants are asserted inside parse
    let forest = parse(text);
    for root in &forest {
        assert!(root.start.is_some() || root.end.is_some());
    }
}

#[test]
fn crlf_lines_end_before_carriage_return() {
    let text = "Start transaction\r\nbody\r\nEnd transaction\r\n";
    let forest = parse(text);

    let end = forest[0].end.unwrap();
    assert_eq!(&text[..end], "Start transaction\r\nbody\r\nEnd transaction");
}

#[test]
fn edges_mid_line_snap_to_line_bounds() {
    let text = "[t0] Start transaction ok\n[t1] End transaction ok\n";
    let forest = parse(text);
    assert_eq!(forest, vec![Transaction::new(Some(0), Some(49))]);
}

use std::fmt::Write;

use crate::parsing::types::Transaction;

/// Renders a forest as one line per transaction, indented by depth.
///
/// Each line shows the bounds (`?` when unset) and the first line of the
/// transaction's text, truncated to 60 bytes.
pub fn outline(document: &str, forest: &[Transaction]) -> String {
    let mut out = String::new();
    write_level(&mut out, document, forest, 0);
    out
}

fn write_level(out: &mut String, document: &str, level: &[Transaction], depth: usize) {
    for t in level {
        let _ = writeln!(
            out,
            "{}{}..{} {:?}",
            "  ".repeat(depth),
            bound(t.start),
            bound(t.end),
            first_line(document, t, 60)
        );
        write_level(out, document, &t.children, depth + 1);
    }
}

fn bound(b: Option<usize>) -> String {
    b.map_or_else(|| "?".to_string(), |b| b.to_string())
}

fn first_line(document: &str, t: &Transaction, max: usize) -> String {
    let start = t.start.unwrap_or(0).min(document.len());
    let end = t.end.unwrap_or(document.len()).min(document.len()).max(start);
    let text = document.get(start..end).unwrap_or_default();
    let mut line = text.lines().next().unwrap_or_default().to_string();
    if line.len() > max {
        let cut = (0..=max).rev().find(|&i| line.is_char_boundary(i)).unwrap_or(0);
        line.truncate(cut);
        line.push_str("...");
    }
    line
}

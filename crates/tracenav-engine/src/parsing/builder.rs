use crate::host::LineOffsets;

use super::types::{Edge, EdgeKind, Transaction};

/// Stack machine pairing boundary edges into a transaction forest.
///
/// A start edge opens a transaction at the start of its line; an end edge
/// closes the innermost open transaction at the end of its line. An end edge
/// with nothing open becomes a root that only has an end.
pub struct TransactionBuilder<'l, L: LineOffsets + ?Sized> {
    lines: &'l L,
    open: Vec<Transaction>,
    out: Vec<Transaction>,
}

impl<'l, L: LineOffsets + ?Sized> TransactionBuilder<'l, L> {
    pub fn new(lines: &'l L) -> Self {
        Self {
            lines,
            open: vec![],
            out: vec![],
        }
    }

    pub fn push(&mut self, edge: Edge) {
        match edge.kind {
            EdgeKind::Start => self.open_transaction(edge.index),
            EdgeKind::End | EdgeKind::DiscardEnd => self.close_transaction(edge.index),
        }
    }

    /// Flushes transactions still open at EOF and bounds the outermost
    /// half-open roots by the document itself.
    pub fn finish(mut self, document_len: usize) -> Vec<Transaction> {
        // EOF flush: unterminated transactions keep an unset end
        while let Some(transaction) = self.open.pop() {
            self.attach(transaction);
        }
        bound_by_document(&mut self.out, document_len);
        self.out
    }

    fn open_transaction(&mut self, index: usize) {
        let start = self.lines.line_start(index);
        self.open.push(Transaction::new(Some(start), None));
    }

    fn close_transaction(&mut self, index: usize) {
        let end = self.lines.line_end(index);
        match self.open.pop() {
            Some(mut transaction) => {
                transaction.end = Some(end);
                self.attach(transaction);
            }
            // End without a start: the trace was cut before the start edge
            None => self.out.push(Transaction::new(None, Some(end))),
        }
    }

    /// Hands a closed transaction to its parent, or to the roots.
    ///
    /// Siblings close in the order they opened, so attaching on close keeps
    /// children in document order.
    fn attach(&mut self, transaction: Transaction) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(transaction),
            None => self.out.push(transaction),
        }
    }
}

/// With two or more roots, a missing start on the first root becomes the
/// document start and a missing end on the last root becomes the last byte.
///
/// The last root never ends before its last child, which may close on a final
/// line without a trailing newline.
fn bound_by_document(roots: &mut [Transaction], document_len: usize) {
    if roots.len() < 2 {
        return;
    }
    if let Some(first) = roots.first_mut() {
        first.start.get_or_insert(0);
    }
    if let Some(last) = roots.last_mut() {
        let last_child_end = last.children.iter().filter_map(|c| c.end).max();
        let end = document_len
            .saturating_sub(1)
            .max(last_child_end.unwrap_or(0));
        last.end.get_or_insert(end);
    }
}

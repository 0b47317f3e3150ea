use crate::settings::TracePatterns;

use super::types::Transaction;

/// Shown in place of a timestamp when a transaction's text carries none.
pub const MISSING_TIMESTAMP: &str = "xx/xx/xx xx:xx:xx.xxx";

/// Derived metadata of a [`Transaction`] over the current document text.
///
/// Nothing is cached: every accessor rescans the transaction's text, so a view
/// must be rebuilt from fresh text after the document changes.
#[derive(Debug, Clone, Copy)]
pub struct TransactionView<'a> {
    transaction: &'a Transaction,
    document: Option<&'a str>,
    patterns: &'a TracePatterns,
}

impl<'a> TransactionView<'a> {
    /// `document` is `None` when the host has no active document.
    pub fn new(
        transaction: &'a Transaction,
        document: Option<&'a str>,
        patterns: &'a TracePatterns,
    ) -> Self {
        Self {
            transaction,
            document,
            patterns,
        }
    }

    pub fn transaction(&self) -> &'a Transaction {
        self.transaction
    }

    pub fn children(self) -> impl Iterator<Item = TransactionView<'a>> {
        let Self {
            transaction,
            document,
            patterns,
        } = self;
        transaction
            .children
            .iter()
            .map(move |child| TransactionView::new(child, document, patterns))
    }

    /// Document text between the bounds; empty when either bound is unset.
    pub fn text(&self) -> &'a str {
        match (self.document, self.transaction.start, self.transaction.end) {
            (Some(document), Some(start), Some(end)) => {
                let end = end.min(document.len());
                let start = start.min(end);
                document.get(start..end).unwrap_or_default()
            }
            _ => "",
        }
    }

    /// The first embedded XML block in the text, parsed.
    ///
    /// A block that matches the pattern but is not well-formed XML yields
    /// `None`.
    pub fn structured_payload(&self) -> Option<roxmltree::Document<'a>> {
        let block = self.patterns.embedded_xml.first(self.text())?;
        match roxmltree::Document::parse(block.matched) {
            Ok(document) => Some(document),
            Err(err) => {
                log::warn!(
                    "Ignoring malformed payload in transaction {:?}: {err}",
                    self.transaction.span()
                );
                None
            }
        }
    }

    /// Tag names of the payload root's element children.
    pub fn event_types(&self) -> Vec<String> {
        self.structured_payload()
            .map(|payload| {
                payload
                    .root_element()
                    .children()
                    .filter(|node| node.is_element())
                    .map(|node| node.tag_name().name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unique policy names applied inside this transaction, in order of first
    /// application.
    pub fn policies(&self) -> Vec<String> {
        self.patterns.policy_name.unique_capture_values(self.text(), 1)
    }

    pub fn start_timestamp(&self) -> &'a str {
        self.patterns
            .timestamp
            .first(self.text())
            .map_or(MISSING_TIMESTAMP, |m| m.group(1).unwrap_or(m.matched))
    }

    pub fn end_timestamp(&self) -> &'a str {
        self.patterns
            .timestamp
            .last(self.text())
            .map_or(MISSING_TIMESTAMP, |m| m.group(1).unwrap_or(m.matched))
    }
}

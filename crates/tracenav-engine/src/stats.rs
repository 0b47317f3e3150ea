//! Trace statistics: the date range of the trace and error counts for the
//! whole trace and for the current transaction.

use crate::error::TraceError;
use crate::host::Editor;
use crate::parsing::Transaction;
use crate::patterns::Match;
use crate::session::Session;
use crate::settings::{Settings, keys, require_pattern};

/// Shown in place of a trace date when the trace carries none.
pub const NO_INFORMATION: &str = "No information";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStats {
    pub start_date: String,
    pub end_date: String,
    pub total_errors: usize,
    pub transaction_errors: usize,
}

impl TraceStats {
    /// Statistics of `text`, with `current_text` as the current transaction's
    /// text (empty when there is none).
    pub fn compute(
        text: &str,
        current_text: &str,
        settings: &dyn Settings,
    ) -> Result<Self, TraceError> {
        let date = require_pattern(settings, keys::TRACE_DATE)?;
        let error = require_pattern(settings, keys::ERROR)?;

        let date_of = |m: Match<'_>| m.group(1).unwrap_or(m.matched).to_string();
        let start_date = date.first(text).map(date_of);
        let end_date = date.last(text).map(date_of);

        Ok(Self {
            start_date: start_date.unwrap_or_else(|| NO_INFORMATION.to_string()),
            end_date: end_date.unwrap_or_else(|| NO_INFORMATION.to_string()),
            total_errors: error.count(text),
            transaction_errors: error.count(current_text),
        })
    }

    /// Statistics of the session's document.
    ///
    /// `None` without a document or after reporting a configuration error.
    pub fn for_session<E: Editor>(session: &Session<E>) -> Option<Self> {
        if !session.editor().has_active_document() {
            return None;
        }
        let text = session.editor().full_text();
        let text: &str = &text;
        let current_text = session
            .current_transaction()
            .and_then(Transaction::span)
            .and_then(|span| text.get(span))
            .unwrap_or_default();
        Self::compute(text, current_text, session.settings())
            .map_err(|err| session.report(&err))
            .ok()
    }
}

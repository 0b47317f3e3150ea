//! # Session State
//!
//! The single source of truth for the cursor position and the transaction
//! enclosing it. A host builds one [`Session`] at startup and hands it by
//! reference to every consumer (navigator, tree views, statistics).
//!
//! Nothing is cached across document versions: the transaction forest is
//! rebuilt from the editor's current text on every derivation.

use crate::error::TraceError;
use crate::host::Editor;
use crate::parsing::{BoundaryPattern, Transaction, build_transactions};
use crate::settings::{Settings, TracePatterns};

type PositionListener = Box<dyn FnMut()>;
type TransactionListener = Box<dyn FnMut(Option<&Transaction>)>;

pub struct Session<E: Editor> {
    editor: E,
    settings: Box<dyn Settings>,
    position: usize,
    current: Option<Transaction>,
    position_listeners: Vec<PositionListener>,
    transaction_listeners: Vec<TransactionListener>,
}

impl<E: Editor> Session<E> {
    pub fn new(editor: E, settings: impl Settings + 'static) -> Self {
        Self {
            editor,
            settings: Box::new(settings),
            position: 0,
            current: None,
            position_listeners: Vec::new(),
            transaction_listeners: Vec::new(),
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Selection and reveal only; text changes go through [`Session::edit`].
    pub(crate) fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Applies a document change, then recomputes the current transaction.
    pub fn edit<R>(&mut self, change: impl FnOnce(&mut E) -> R) -> R {
        let result = change(&mut self.editor);
        self.refresh();
        result
    }

    pub fn settings(&self) -> &dyn Settings {
        self.settings.as_ref()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor anchor.
    ///
    /// Position listeners fire on every change. Transaction listeners fire only
    /// when the recomputed current transaction differs from the previous one.
    pub fn set_position(&mut self, position: usize) {
        if position == self.position {
            return;
        }
        self.position = position;
        for listener in &mut self.position_listeners {
            listener();
        }
        self.refresh();
    }

    /// Recomputes the current transaction from the current text.
    pub fn refresh(&mut self) {
        let next = self.find_current_transaction();
        let changed = match (&self.current, &next) {
            (Some(previous), Some(next)) => !previous.same_span(next),
            (None, None) => false,
            _ => true,
        };
        self.current = next;
        if changed {
            log::debug!(
                "Current transaction changed to {:?}",
                self.current.as_ref().and_then(Transaction::span)
            );
            for listener in &mut self.transaction_listeners {
                listener(self.current.as_ref());
            }
        }
    }

    /// The transaction found by the last position change or refresh.
    pub fn current_transaction(&self) -> Option<&Transaction> {
        self.current.as_ref()
    }

    /// The last root transaction strictly enclosing the position.
    ///
    /// Only roots are searched; callers drill into `children` for finer
    /// granularity. A position exactly on a bound belongs to neither side.
    pub fn find_current_transaction(&self) -> Option<Transaction> {
        let position = self.position;
        self.all_transactions()
            .into_iter()
            .filter(|transaction| transaction.strictly_contains(position))
            .last()
    }

    /// Fresh transaction forest of the active document.
    ///
    /// Empty without a document. Configuration errors are reported to the
    /// user and also yield an empty forest.
    pub fn all_transactions(&self) -> Vec<Transaction> {
        if !self.editor.has_active_document() {
            return Vec::new();
        }
        self.try_all_transactions().unwrap_or_else(|err| {
            self.report(&err);
            Vec::new()
        })
    }

    pub fn try_all_transactions(&self) -> Result<Vec<Transaction>, TraceError> {
        let boundaries = BoundaryPattern::from_settings(self.settings())?;
        let text = self.editor.full_text();
        Ok(build_transactions(&text, &self.editor, &boundaries))
    }

    /// Metadata patterns, or `None` after reporting a configuration error.
    pub fn trace_patterns(&self) -> Option<TracePatterns> {
        TracePatterns::from_settings(self.settings())
            .map_err(|err| self.report(&err))
            .ok()
    }

    /// Surfaces an error to the user through the editor.
    pub fn report(&self, err: &TraceError) {
        log::warn!("{err}");
        self.editor.show_error(&err.to_string());
    }

    pub fn on_position_changed(&mut self, listener: impl FnMut() + 'static) {
        self.position_listeners.push(Box::new(listener));
    }

    pub fn on_transaction_changed(
        &mut self,
        listener: impl FnMut(Option<&Transaction>) + 'static,
    ) {
        self.transaction_listeners.push(Box::new(listener));
    }
}

impl<E: Editor + std::fmt::Debug> std::fmt::Debug for Session<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("editor", &self.editor)
            .field("position", &self.position)
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

//! # Tree Views
//!
//! One generic [`TreeProvider`] renders every tree panel. Each panel differs
//! only in the children-builder function it is created with:
//!
//! - [`navigation_markers`]: the configured marker patterns to jump between
//! - [`transaction_policies`]: policies applied in the current transaction
//! - [`transaction_list`]: the transaction forest, labelled by timestamp

use std::cell::Cell;
use std::rc::Rc;

use crate::host::Editor;
use crate::parsing::{MISSING_TIMESTAMP, Transaction, TransactionView};
use crate::session::Session;
use crate::settings::{keys, require};

/// A row in a tree panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    pub label: String,
    pub description: Option<String>,
    /// Regex the navigator searches for when this row is activated.
    pub search_pattern: Option<String>,
    pub transaction: Option<Transaction>,
}

impl TreeItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            search_pattern: None,
            transaction: None,
        }
    }

    pub fn with_search(mut self, pattern: impl Into<String>) -> Self {
        self.search_pattern = Some(pattern.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_transaction(mut self, transaction: Transaction) -> Self {
        self.transaction = Some(transaction);
        self
    }

    /// Rows backed by a transaction with children render expanded.
    pub fn is_expanded(&self) -> bool {
        self.transaction
            .as_ref()
            .is_some_and(Transaction::has_children)
    }
}

type ChildrenBuilder<E> = Box<dyn Fn(&Session<E>, Option<&TreeItem>) -> Vec<TreeItem>>;

/// A tree panel parameterized by its children builder.
///
/// `parent` is `None` for the top-level rows.
pub struct TreeProvider<E: Editor> {
    build: ChildrenBuilder<E>,
    refresh_on_changes: bool,
    dirty: Rc<Cell<bool>>,
}

impl<E: Editor + 'static> TreeProvider<E> {
    pub fn new(
        build: impl Fn(&Session<E>, Option<&TreeItem>) -> Vec<TreeItem> + 'static,
        refresh_on_changes: bool,
    ) -> Self {
        Self {
            build: Box::new(build),
            refresh_on_changes,
            dirty: Rc::new(Cell::new(true)),
        }
    }

    pub fn navigation_markers() -> Self {
        Self::new(navigation_markers, false)
    }

    pub fn transaction_policies() -> Self {
        Self::new(transaction_policies, true)
    }

    pub fn transaction_list() -> Self {
        Self::new(transaction_list, true)
    }

    /// Marks the tree dirty whenever the session's current transaction
    /// changes.
    pub fn subscribe(&self, session: &mut Session<E>) {
        if !self.refresh_on_changes {
            return;
        }
        let dirty = self.dirty.clone();
        session.on_transaction_changed(move |_| dirty.set(true));
    }

    /// Builds the rows under `parent`. Building the top level clears the
    /// dirty flag.
    pub fn children(&self, session: &Session<E>, parent: Option<&TreeItem>) -> Vec<TreeItem> {
        if parent.is_none() {
            self.dirty.set(false);
        }
        (self.build)(session, parent)
    }

    pub fn needs_refresh(&self) -> bool {
        self.dirty.get()
    }

    /// Requests a rebuild after the document or the active editor changed.
    /// Ignored by trees that do not refresh on changes.
    pub fn refresh(&self) {
        if self.refresh_on_changes {
            self.dirty.set(true);
        }
    }
}

const MARKERS: [(&str, &str); 5] = [
    ("Start transaction", keys::TRANSACTION_START),
    ("Applying policy", keys::APPLYING_POLICY),
    ("Applying rule", keys::APPLYING_RULE),
    ("Query result", keys::QUERY_RESULT),
    ("Subscriber result", keys::SUBSCRIBER_RESULT),
];

/// The five marker patterns, in a fixed order. Any missing key is reported
/// and yields no rows.
pub fn navigation_markers<E: Editor>(
    session: &Session<E>,
    parent: Option<&TreeItem>,
) -> Vec<TreeItem> {
    if parent.is_some() {
        return Vec::new();
    }
    let items: Result<Vec<_>, _> = MARKERS
        .iter()
        .map(|&(label, key)| {
            require(session.settings(), key).map(|pattern| TreeItem::new(label).with_search(pattern))
        })
        .collect();
    items.unwrap_or_else(|err| {
        session.report(&err);
        Vec::new()
    })
}

/// Unique policies of the current transaction.
pub fn transaction_policies<E: Editor>(
    session: &Session<E>,
    parent: Option<&TreeItem>,
) -> Vec<TreeItem> {
    if parent.is_some() {
        return Vec::new();
    }
    if !session.editor().has_active_document() {
        return vec![TreeItem::new("No active editor")];
    }
    let Some(current) = session.current_transaction() else {
        return vec![TreeItem::new("No current transaction")];
    };
    let Some(patterns) = session.trace_patterns() else {
        return Vec::new();
    };

    let text = session.editor().full_text();
    let text: &str = &text;
    TransactionView::new(current, Some(text), &patterns)
        .policies()
        .into_iter()
        .map(|policy| {
            let search = format!(r"(%\+C%14C)({})(%-C)", regex::escape(&policy));
            TreeItem::new(policy).with_search(search)
        })
        .collect()
}

/// Root transactions at the top level, a row's child transactions below it.
pub fn transaction_list<E: Editor>(
    session: &Session<E>,
    parent: Option<&TreeItem>,
) -> Vec<TreeItem> {
    let transactions = match parent {
        Some(item) => match &item.transaction {
            Some(transaction) => transaction.children.clone(),
            None => return Vec::new(),
        },
        None => session.all_transactions(),
    };
    if transactions.is_empty() {
        return Vec::new();
    }
    let Some(patterns) = session.trace_patterns() else {
        return Vec::new();
    };

    let text = session.editor().full_text();
    let text: &str = &text;
    transactions
        .into_iter()
        .map(|transaction| {
            let view = TransactionView::new(&transaction, Some(text), &patterns);
            let timestamp = view.start_timestamp().to_string();
            let description = view.event_types().join(" ");

            let mut item = TreeItem::new(timestamp.as_str()).with_description(description);
            if timestamp != MISSING_TIMESTAMP {
                item = item.with_search(regex::escape(&timestamp));
            }
            item.with_transaction(transaction)
        })
        .collect()
}

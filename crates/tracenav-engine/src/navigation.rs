//! # Navigator
//!
//! Cursor-relative occurrence search. A hit is revealed (and selected when
//! `navigation.select_match` is set) and the session position moves to the
//! last byte of the match, so the next scan in the same direction advances
//! instead of finding the same occurrence again.

use std::ops::Range;

use crate::error::TraceError;
use crate::host::{Editor, RevealMode};
use crate::patterns::{Pattern, next_char_boundary};
use crate::session::Session;
use crate::settings::{keys, require_flag};

/// What a navigation command did.
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// `range` was revealed and the position moved to `position`.
    Moved {
        range: Range<usize>,
        position: usize,
    },
    /// Nothing found; the user was told and nothing changed.
    NoMatch,
    /// The command could not run; the error was reported to the user.
    Failed(TraceError),
}

impl NavOutcome {
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            NavOutcome::Moved { range, .. } => Some(range.clone()),
            _ => None,
        }
    }
}

/// A landing remembered so the next forward scan can step past it.
#[derive(Debug, Clone)]
struct Landing {
    pattern: String,
    range: Range<usize>,
    left_at: usize,
}

/// Directional search commands over a [`Session`].
#[derive(Debug, Default)]
pub struct Navigator {
    last: Option<Landing>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last match lying entirely before the position.
    pub fn previous_occurrence<E: Editor>(
        &mut self,
        session: &mut Session<E>,
        pattern: &str,
    ) -> NavOutcome {
        let (pattern, select) = match prepare(session, pattern) {
            Ok(prepared) => prepared,
            Err(err) => return fail(session, err),
        };
        let found = {
            let text = session.editor().full_text();
            pattern.previous(&text, session.position()).map(|m| m.range())
        };
        self.land(session, &pattern, found, select)
    }

    /// First match starting at or after the position.
    pub fn next_occurrence<E: Editor>(
        &mut self,
        session: &mut Session<E>,
        pattern: &str,
    ) -> NavOutcome {
        let (pattern, select) = match prepare(session, pattern) {
            Ok(prepared) => prepared,
            Err(err) => return fail(session, err),
        };
        let found = {
            let text = session.editor().full_text();
            let position = session.position();
            match (&self.last, pattern.next(&text, position).map(|m| m.range())) {
                (Some(last), Some(range)) if last.repeats(pattern.as_str(), position, &range) => {
                    let resume = next_char_boundary(&text, last.range.start);
                    if resume > last.range.start {
                        pattern.next(&text, resume).map(|m| m.range())
                    } else {
                        None
                    }
                }
                (_, found) => found,
            }
        };
        self.land(session, &pattern, found, select)
    }

    /// Final match in the whole document, regardless of position.
    pub fn last_occurrence<E: Editor>(
        &mut self,
        session: &mut Session<E>,
        pattern: &str,
    ) -> NavOutcome {
        let (pattern, select) = match prepare(session, pattern) {
            Ok(prepared) => prepared,
            Err(err) => return fail(session, err),
        };
        let found = {
            let text = session.editor().full_text();
            pattern.last(&text).map(|m| m.range())
        };
        self.land(session, &pattern, found, select)
    }

    /// Reveals the current transaction at the top of the viewport.
    ///
    /// The position stays where it is, so the transaction remains current.
    pub fn reveal_current_transaction<E: Editor>(&mut self, session: &mut Session<E>) -> NavOutcome {
        if !session.editor().has_active_document() {
            return fail(session, TraceError::NoActiveDocument);
        }
        let select = match require_flag(session.settings(), keys::SELECT_MATCH) {
            Ok(select) => select,
            Err(err) => return fail(session, err),
        };
        let Some(range) = session.current_transaction().and_then(|t| t.span()) else {
            session.editor().show_info("No current transaction");
            return NavOutcome::NoMatch;
        };

        let editor = session.editor_mut();
        if select {
            editor.select(range.clone());
        }
        editor.reveal(range.clone(), RevealMode::Top);
        NavOutcome::Moved {
            range,
            position: session.position(),
        }
    }

    fn land<E: Editor>(
        &mut self,
        session: &mut Session<E>,
        pattern: &Pattern,
        found: Option<Range<usize>>,
        select: bool,
    ) -> NavOutcome {
        let Some(range) = found else {
            session
                .editor()
                .show_info(&format!("No match for '{}'", pattern.as_str()));
            return NavOutcome::NoMatch;
        };

        let editor = session.editor_mut();
        if select {
            editor.select(range.clone());
        }
        editor.reveal(range.clone(), RevealMode::Center);

        let position = range.end.saturating_sub(1);
        session.set_position(position);
        self.last = Some(Landing {
            pattern: pattern.as_str().to_string(),
            range: range.clone(),
            left_at: position,
        });
        NavOutcome::Moved { range, position }
    }
}

impl Landing {
    /// True when a forward scan by the same pattern from the position this
    /// landing left behind came back to it.
    ///
    /// One-character matches are found again at their own start. An empty
    /// match leaves the position one byte before it, so the scan can also
    /// stop at an earlier empty match.
    fn repeats(&self, pattern: &str, position: usize, found: &Range<usize>) -> bool {
        self.pattern == pattern
            && self.left_at == position
            && (*found == self.range || (self.range.is_empty() && found.start < self.range.start))
    }
}

fn prepare<E: Editor>(session: &Session<E>, pattern: &str) -> Result<(Pattern, bool), TraceError> {
    if !session.editor().has_active_document() {
        return Err(TraceError::NoActiveDocument);
    }
    let select = require_flag(session.settings(), keys::SELECT_MATCH)?;
    Ok((Pattern::new(pattern)?, select))
}

fn fail<E: Editor>(session: &Session<E>, err: TraceError) -> NavOutcome {
    session.report(&err);
    NavOutcome::Failed(err)
}

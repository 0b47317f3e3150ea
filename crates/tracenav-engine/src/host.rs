//! # Host Editor Surface
//!
//! The engine never owns the trace text. It reads it through [`Editor`], which
//! a host (terminal UI, editor plugin, tests) implements. [`BufferEditor`] is
//! the in-memory implementation backed by an `xi_rope::Rope`.

use std::borrow::Cow;
use std::cell::RefCell;
use std::ops::Range;

use xi_rope::Rope;

/// Converts linear byte offsets to the bounds of the line containing them.
pub trait LineOffsets {
    /// Offset of the first byte of the line containing `offset`.
    fn line_start(&self, offset: usize) -> usize;
    /// Offset just past the line's content, excluding `\n` or `\r\n`.
    fn line_end(&self, offset: usize) -> usize;
}

impl LineOffsets for Rope {
    fn line_start(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        self.offset_of_line(self.line_of_offset(offset))
    }

    fn line_end(&self, offset: usize) -> usize {
        let offset = offset.min(self.len());
        let next_line = self.offset_of_line(self.line_of_offset(offset) + 1);
        let rest = self.slice_to_cow(offset..next_line);
        let rest: &str = &rest;
        let content = rest.strip_suffix('\n').unwrap_or(rest);
        let content = content.strip_suffix('\r').unwrap_or(content);
        offset + content.len()
    }
}

/// Where a revealed range should land in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealMode {
    Center,
    Top,
}

/// The host text surface the engine reads from and reports to.
pub trait Editor: LineOffsets {
    fn has_active_document(&self) -> bool;

    /// Full text of the active document, or empty when there is none.
    fn full_text(&self) -> Cow<'_, str>;

    fn select(&mut self, range: Range<usize>);

    fn reveal(&mut self, range: Range<usize>, mode: RevealMode);

    fn show_info(&self, message: &str);

    fn show_error(&self, message: &str);
}

/// A user-facing message emitted through [`Editor::show_info`] or
/// [`Editor::show_error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Info(String),
    Error(String),
}

impl Message {
    pub fn text(&self) -> &str {
        match self {
            Message::Info(text) | Message::Error(text) => text,
        }
    }
}

/// In-memory editor surface over an xi-rope buffer.
///
/// Records selection, reveal requests and messages so hosts can render them
/// and tests can assert on them.
#[derive(Default)]
pub struct BufferEditor {
    buffer: Option<Rope>,
    selection: Option<Range<usize>>,
    revealed: Option<(Range<usize>, RevealMode)>,
    messages: RefCell<Vec<Message>>,
}

impl BufferEditor {
    /// An editor with no open document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut editor = Self::new();
        editor.open(text);
        editor
    }

    pub fn open(&mut self, text: &str) {
        self.buffer = Some(Rope::from(text));
        self.selection = None;
        self.revealed = None;
    }

    pub fn close(&mut self) {
        self.buffer = None;
        self.selection = None;
        self.revealed = None;
    }

    /// Replace `range` with `text`. No-op without an open document.
    pub fn edit(&mut self, range: Range<usize>, text: &str) {
        if let Some(buffer) = self.buffer.as_mut() {
            let end = range.end.min(buffer.len());
            let start = range.start.min(end);
            buffer.edit(start..end, text);
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.as_ref().map_or(0, Rope::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    pub fn revealed(&self) -> Option<(Range<usize>, RevealMode)> {
        self.revealed.clone()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.messages.borrow().last().cloned()
    }

    pub fn take_messages(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    /// Zero-based line number containing `offset`.
    pub fn line_of_offset(&self, offset: usize) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| buffer.line_of_offset(offset.min(buffer.len())))
    }

    /// Offset of the start of `line`, clamped to the document end.
    pub fn offset_of_line(&self, line: usize) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| buffer.offset_of_line(line))
    }
}

impl std::fmt::Debug for BufferEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferEditor")
            .field("open", &self.buffer.is_some())
            .field("len", &self.len())
            .field("selection", &self.selection)
            .field("revealed", &self.revealed)
            .finish_non_exhaustive()
    }
}

impl LineOffsets for BufferEditor {
    fn line_start(&self, offset: usize) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| buffer.line_start(offset))
    }

    fn line_end(&self, offset: usize) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |buffer| buffer.line_end(offset))
    }
}

impl Editor for BufferEditor {
    fn has_active_document(&self) -> bool {
        self.buffer.is_some()
    }

    fn full_text(&self) -> Cow<'_, str> {
        match &self.buffer {
            Some(buffer) => buffer.slice_to_cow(..),
            None => Cow::Borrowed(""),
        }
    }

    fn select(&mut self, range: Range<usize>) {
        self.selection = Some(range);
    }

    fn reveal(&mut self, range: Range<usize>, mode: RevealMode) {
        self.revealed = Some((range, mode));
    }

    fn show_info(&self, message: &str) {
        log::info!("{message}");
        self.messages
            .borrow_mut()
            .push(Message::Info(message.to_string()));
    }

    fn show_error(&self, message: &str) {
        log::error!("{message}");
        self.messages
            .borrow_mut()
            .push(Message::Error(message.to_string()));
    }
}

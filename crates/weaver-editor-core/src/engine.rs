//! Content engine interface and a plain in-process implementation.
//!
//! The `ContentEngine` trait is the only surface the sync layer uses to
//! read and replace the live document. Browser hosts wrap their rich-text
//! engine in it; `PlainEngine` backs native hosts and tests.

use std::ops::Range;

use crate::error::EngineError;
use crate::text::{EditorRope, TextBuffer};
use crate::types::Selection;
use crate::undo::UndoableBuffer;

/// Default undo depth for `PlainEngine`.
pub const DEFAULT_UNDO_STEPS: usize = 100;

/// A live document that content can be read from and pushed into.
///
/// Offsets are in whatever unit the engine uses for positions; the sync
/// layer only compares them against `document_len()`.
pub trait ContentEngine {
    /// Serialize the current document.
    fn serialized_content(&self) -> String;

    /// Replace the whole document.
    ///
    /// When `record_history` is false the replacement must not become an
    /// undo step.
    fn set_content(&mut self, content: &str, record_history: bool) -> Result<(), EngineError>;

    /// Current selection.
    fn selection(&self) -> Selection;

    /// Move the selection. Offsets past the document are an error.
    fn set_selection(&mut self, selection: Selection) -> Result<(), EngineError>;

    /// Document size in position units.
    fn document_len(&self) -> usize;

    /// Whether the engine has been torn down.
    fn is_disposed(&self) -> bool;
}

impl<E: ContentEngine + ?Sized> ContentEngine for Box<E> {
    fn serialized_content(&self) -> String {
        (**self).serialized_content()
    }

    fn set_content(&mut self, content: &str, record_history: bool) -> Result<(), EngineError> {
        (**self).set_content(content, record_history)
    }

    fn selection(&self) -> Selection {
        (**self).selection()
    }

    fn set_selection(&mut self, selection: Selection) -> Result<(), EngineError> {
        (**self).set_selection(selection)
    }

    fn document_len(&self) -> usize {
        (**self).document_len()
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

/// Simple rope-backed engine.
///
/// Content is stored verbatim, so the serialized form is the buffer text
/// and positions are char offsets into it. Local edits go through
/// `insert`/`delete`/`replace` and can be undone.
#[derive(Clone)]
pub struct PlainEngine<T: TextBuffer = EditorRope> {
    buffer: UndoableBuffer<T>,
    selection: Selection,
    disposed: bool,
}

impl Default for PlainEngine {
    fn default() -> Self {
        Self::new(EditorRope::new())
    }
}

impl PlainEngine {
    /// Create an engine holding `content`, cursor at the start.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        Self::new(EditorRope::from_str(content))
    }
}

impl<T: TextBuffer> PlainEngine<T> {
    pub fn new(buffer: T) -> Self {
        Self {
            buffer: UndoableBuffer::new(buffer, DEFAULT_UNDO_STEPS),
            selection: Selection::default(),
            disposed: false,
        }
    }

    /// Tear the engine down. Every later mutation fails with `Disposed`.
    pub fn dispose(&mut self) {
        tracing::debug!("plain engine disposed");
        self.disposed = true;
    }

    /// Insert text at a char offset, moving the cursor after it.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), EngineError> {
        self.replace(offset..offset, text)
    }

    /// Delete a char range, collapsing the cursor at its start.
    pub fn delete(&mut self, range: Range<usize>) -> Result<(), EngineError> {
        self.replace(range, "")
    }

    /// Replace a char range with `text`, moving the cursor after it.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.check_range(&range)?;

        let start = range.start;
        if range.is_empty() {
            self.buffer.insert(start, text);
        } else if text.is_empty() {
            self.buffer.delete(range);
        } else {
            self.buffer.replace(range, text);
        }
        self.selection = Selection::collapsed(start + text.chars().count());
        Ok(())
    }

    /// Type text at the cursor, replacing any selected text.
    pub fn type_text(&mut self, text: &str) -> Result<(), EngineError> {
        self.replace(self.selection.to_range(), text)
    }

    /// Revert the last recorded edit. The cursor moves to the start.
    pub fn undo(&mut self) -> bool {
        if self.disposed || !self.buffer.undo() {
            return false;
        }
        self.selection = Selection::default();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    fn ensure_live(&self) -> Result<(), EngineError> {
        if self.disposed {
            return Err(EngineError::Disposed);
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<(), EngineError> {
        let len = self.buffer.len_chars();
        if offset > len {
            return Err(EngineError::SelectionOutOfRange { offset, len });
        }
        Ok(())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), EngineError> {
        let len = self.buffer.len_chars();
        if range.start > range.end || range.end > len {
            return Err(EngineError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }
}

impl<T: TextBuffer> ContentEngine for PlainEngine<T> {
    fn serialized_content(&self) -> String {
        self.buffer.to_string()
    }

    fn set_content(&mut self, content: &str, record_history: bool) -> Result<(), EngineError> {
        self.ensure_live()?;

        if record_history {
            self.buffer.replace_all(content);
        } else {
            // Recorded positions refer to the old text.
            self.buffer.untracked().replace_all(content);
            self.buffer.clear_history();
        }
        self.selection = Selection::default();
        Ok(())
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, selection: Selection) -> Result<(), EngineError> {
        self.ensure_live()?;
        self.check_offset(selection.end())?;
        self.selection = selection;
        Ok(())
    }

    fn document_len(&self) -> usize {
        self.buffer.len_chars()
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_text_moves_cursor() {
        let mut engine = PlainEngine::from_str("<p>Hello</p>");
        engine.set_selection(Selection::collapsed(8)).unwrap();

        engine.type_text("!").unwrap();
        assert_eq!(engine.serialized_content(), "<p>Hello!</p>");
        assert_eq!(engine.selection(), Selection::collapsed(9));
        assert_eq!(engine.document_len(), 13);
    }

    #[test]
    fn test_type_text_replaces_selection() {
        let mut engine = PlainEngine::from_str("<p>Hello</p>");
        engine.set_selection(Selection::new(3, 8)).unwrap();

        engine.type_text("Bye").unwrap();
        assert_eq!(engine.serialized_content(), "<p>Bye</p>");
        assert_eq!(engine.selection(), Selection::collapsed(6));
    }

    #[test]
    fn test_set_content_without_history() {
        let mut engine = PlainEngine::from_str("<p>a</p>");
        engine.insert(4, "b").unwrap();
        assert!(engine.can_undo());

        engine.set_content("<p>remote</p>", false).unwrap();
        assert_eq!(engine.serialized_content(), "<p>remote</p>");
        assert!(!engine.can_undo());
        assert_eq!(engine.selection(), Selection::collapsed(0));
    }

    #[test]
    fn test_set_content_with_history() {
        let mut engine = PlainEngine::from_str("<p>a</p>");
        engine.set_content("<p>b</p>", true).unwrap();
        assert!(engine.undo());
        assert_eq!(engine.serialized_content(), "<p>a</p>");
    }

    #[test]
    fn test_selection_out_of_range() {
        let mut engine = PlainEngine::from_str("abc");
        let err = engine.set_selection(Selection::collapsed(9)).unwrap_err();
        assert_eq!(err, EngineError::SelectionOutOfRange { offset: 9, len: 3 });
        insta::assert_snapshot!(
            err.to_string(),
            @"selection offset 9 out of range for document of length 3"
        );
    }

    #[test]
    fn test_disposed_engine_rejects_mutation() {
        let mut engine = PlainEngine::from_str("abc");
        engine.dispose();

        assert!(engine.is_disposed());
        assert_eq!(engine.set_content("x", false), Err(EngineError::Disposed));
        assert!(engine.insert(0, "x").is_err());
        assert_eq!(engine.serialized_content(), "abc");
    }

    #[test]
    fn test_bad_edit_ranges_are_errors() {
        let mut engine = PlainEngine::from_str("<p>abc</p>");

        assert_eq!(
            engine.delete(5..3),
            Err(EngineError::InvalidRange { start: 5, end: 3, len: 10 })
        );
        assert_eq!(
            engine.replace(8..12, "x"),
            Err(EngineError::InvalidRange { start: 8, end: 12, len: 10 })
        );
        assert!(engine.insert(11, "x").is_err());
        assert_eq!(engine.serialized_content(), "<p>abc</p>");
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_undo_reverts_local_edit() {
        let mut engine = PlainEngine::from_str("<p>abc</p>");
        engine.delete(4..5).unwrap();
        assert_eq!(engine.serialized_content(), "<p>ac</p>");
        assert_eq!(engine.selection(), Selection::collapsed(4));

        assert!(engine.undo());
        assert_eq!(engine.serialized_content(), "<p>abc</p>");
        assert!(!engine.undo());
    }
}

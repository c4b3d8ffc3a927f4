//! Undo history for local edits.

use std::ops::Range;

use smol_str::SmolStr;

use crate::text::TextBuffer;

/// One reversible change: `removed` was replaced by `inserted` at `at`.
#[derive(Debug, Clone)]
struct Step {
    at: usize,
    removed: SmolStr,
    inserted: SmolStr,
}

impl Step {
    fn inserted_range(&self) -> Range<usize> {
        self.at..self.at + self.inserted.chars().count()
    }
}

/// A [`TextBuffer`] that records every edit made through it.
///
/// Edits through [`UndoableBuffer::untracked`] leave no step behind, so
/// callers that use it should usually [`clear_history`](Self::clear_history)
/// as well.
#[derive(Clone)]
pub struct UndoableBuffer<T> {
    buffer: T,
    steps: Vec<Step>,
    max_steps: usize,
}

impl<T: TextBuffer> UndoableBuffer<T> {
    pub fn new(buffer: T, max_steps: usize) -> Self {
        Self {
            buffer,
            steps: Vec::new(),
            max_steps,
        }
    }

    /// The wrapped buffer, for edits that must not be undoable.
    pub fn untracked(&mut self) -> &mut T {
        &mut self.buffer
    }

    pub fn can_undo(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Revert the most recent step. Returns false with nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(step) = self.steps.pop() else {
            return false;
        };
        self.buffer.replace(step.inserted_range(), &step.removed);
        true
    }

    pub fn clear_history(&mut self) {
        self.steps.clear();
    }

    fn push(&mut self, char_range: &Range<usize>, inserted: &str) {
        let removed = self.buffer.slice(char_range.clone()).unwrap_or_default();
        self.steps.push(Step {
            at: char_range.start,
            removed,
            inserted: inserted.into(),
        });
        if self.steps.len() > self.max_steps {
            self.steps.remove(0);
        }
    }
}

impl<T: TextBuffer> TextBuffer for UndoableBuffer<T> {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.push(&(char_offset..char_offset), text);
        self.buffer.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.push(&char_range, "");
        self.buffer.delete(char_range);
    }

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        self.push(&char_range, text);
        self.buffer.replace(char_range, text);
    }

    fn replace_all(&mut self, text: &str) {
        let len = self.buffer.len_chars();
        self.push(&(0..len), text);
        self.buffer.replace_all(text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        self.buffer.slice(char_range)
    }

    fn to_string(&self) -> String {
        self.buffer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorRope;

    fn buffer(content: &str) -> UndoableBuffer<EditorRope> {
        UndoableBuffer::new(EditorRope::from_str(content), 100)
    }

    #[test]
    fn test_undo_reverts_in_reverse_order() {
        let mut buf = buffer("<p>Hello</p>");
        buf.insert(8, "!");
        buf.delete(3..4);
        assert_eq!(buf.to_string(), "<p>ello!</p>");

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "<p>Hello!</p>");
        assert!(buf.undo());
        assert_eq!(buf.to_string(), "<p>Hello</p>");
        assert!(!buf.undo());
    }

    #[test]
    fn test_whole_document_swap_is_one_step() {
        let mut buf = buffer("<p>one</p>");
        buf.replace_all("<p>two and three</p>");

        assert!(buf.undo());
        assert_eq!(buf.to_string(), "<p>one</p>");
        assert!(!buf.can_undo());
    }

    #[test]
    fn test_untracked_edits_leave_no_step() {
        let mut buf = buffer("abc");
        buf.untracked().replace_all("xyz");
        assert_eq!(buf.to_string(), "xyz");
        assert!(!buf.can_undo());
    }

    #[test]
    fn test_oldest_steps_fall_off() {
        let mut buf = UndoableBuffer::new(EditorRope::new(), 2);
        buf.insert(0, "a");
        buf.insert(1, "b");
        buf.insert(2, "c");

        assert!(buf.undo());
        assert!(buf.undo());
        assert!(!buf.undo());
        assert_eq!(buf.to_string(), "a");
    }
}

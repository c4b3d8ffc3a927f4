//! Document text storage.
//!
//! Offsets throughout are char offsets (Unicode scalar values).

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// Editable text storage behind an engine.
///
/// Callers validate ranges first; implementations may panic on ranges
/// outside the buffer.
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn insert(&mut self, char_offset: usize, text: &str);

    fn delete(&mut self, char_range: Range<usize>);

    fn replace(&mut self, char_range: Range<usize>, text: &str) {
        let start = char_range.start;
        self.delete(char_range);
        self.insert(start, text);
    }

    /// Swap out the entire contents.
    fn replace_all(&mut self, text: &str) {
        let len = self.len_chars();
        self.replace(0..len, text);
    }

    /// Copy of `char_range`, or `None` when it is reversed or out of bounds.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    fn to_string(&self) -> String;
}

/// [`TextBuffer`] over a `ropey::Rope`.
#[derive(Clone, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(text),
        }
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn insert(&mut self, char_offset: usize, text: &str) {
        self.rope.insert(char_offset, text);
    }

    fn delete(&mut self, char_range: Range<usize>) {
        self.rope.remove(char_range);
    }

    fn replace_all(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        let Range { start, end } = char_range;
        (start <= end && end <= self.rope.len_chars())
            .then(|| self.rope.slice(start..end).to_smolstr())
    }

    fn to_string(&self) -> String {
        self.rope.to_string()
    }
}

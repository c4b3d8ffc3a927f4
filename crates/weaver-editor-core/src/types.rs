//! Selection type shared by engines and the sync layer.

use std::ops::Range;

/// A selection in engine position units.
///
/// `anchor` stays where the selection began and `head` follows the cursor,
/// so `head < anchor` for a selection made backwards.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A bare cursor at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Covered positions, lowest first.
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    /// Apply `f` to anchor and head independently.
    pub fn map(self, mut f: impl FnMut(usize) -> usize) -> Self {
        Self::new(f(self.anchor), f(self.head))
    }
}

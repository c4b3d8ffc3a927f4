//! Error types for engine operations.

use thiserror::Error;

/// Errors a content engine can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    /// The engine was torn down and no longer accepts operations.
    #[error("engine has been disposed")]
    Disposed,

    /// A selection endpoint fell outside the document.
    #[error("selection offset {offset} out of range for document of length {len}")]
    SelectionOutOfRange {
        /// The offending offset.
        offset: usize,
        /// Document length at the time of the call.
        len: usize,
    },

    /// An edit range that is reversed or runs past the document.
    #[error("edit range {start}..{end} invalid for document of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}

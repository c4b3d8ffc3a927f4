//! weaver-editor-core: Pure Rust editor primitives without framework dependencies.
//!
//! This crate provides:
//! - `ContentEngine` trait, the interface sync code uses to read and replace the live document
//! - `PlainEngine` - rope-backed engine with undo support
//! - `TextBuffer` trait for text storage abstraction, with `EditorRope` as the ropey implementation
//! - `Selection`, shared between engines and sync code

pub mod engine;
pub mod error;
pub mod text;
pub mod types;
pub mod undo;

pub use engine::{ContentEngine, DEFAULT_UNDO_STEPS, PlainEngine};
pub use error::EngineError;
pub use text::{EditorRope, TextBuffer};
pub use types::Selection;
pub use undo::UndoableBuffer;

//! Reconciles externally supplied document content with a live editor.
//!
//! A host hands the editor content whenever it likes (loaded from storage,
//! replaced by another process, or echoed back from our own change
//! callback). This crate decides whether that content may replace what the
//! user is editing, and whether the user's cursor survives the swap.
//!
//! - `Reconciler`: owns the engine, the flags and the timers
//! - `evaluate`: the pure guard chain behind every same-document update
//! - `heuristic`: document-switch detection and cursor clamping
//! - `driver` (feature `tokio`): runs a reconciler's timers on tokio

pub mod config;
pub mod decision;
pub mod heuristic;
pub mod reconciler;
pub mod state;
pub mod timers;

#[cfg(all(
    feature = "tokio",
    not(all(target_family = "wasm", target_os = "unknown"))
))]
pub mod driver;

pub use config::ReconcilerConfig;
pub use decision::{Decision, evaluate};
pub use heuristic::{clamp_offset, clamp_selection, fingerprint, is_note_switch};
pub use reconciler::{ChangeListener, Reconciler};
pub use state::{DocumentId, ExternalUpdate, ReconcileState};
pub use timers::{TimerKind, TimerSet};

pub use weaver_editor_core;

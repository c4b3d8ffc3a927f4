//! Guard evaluation for same-document external updates.

use std::fmt;

use crate::state::ReconcileState;

/// What the reconciler did with an external update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Document identity changed; the engine was reloaded and all state dropped.
    HardReset,
    /// User is typing.
    SkipTyping,
    /// A local edit is still on its way to the host.
    SkipInFlight,
    /// Content is our own emission coming back.
    SkipEcho,
    /// Content matches what we already accepted.
    SkipUnchanged,
    /// Live document already holds this content.
    SkipInSync,
    /// Live document was replaced.
    Replace {
        /// Whether a cursor restore was scheduled.
        restore_cursor: bool,
    },
    /// Engine or reconciler is torn down, or the engine refused the content.
    Unavailable,
}

impl Decision {
    pub fn is_replace(&self) -> bool {
        matches!(self, Decision::Replace { .. })
    }

    /// Whether the live document was (re)loaded.
    pub fn touched_document(&self) -> bool {
        matches!(self, Decision::HardReset | Decision::Replace { .. })
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::HardReset => f.write_str("hard-reset"),
            Decision::SkipTyping => f.write_str("skip: typing"),
            Decision::SkipInFlight => f.write_str("skip: in-flight"),
            Decision::SkipEcho => f.write_str("skip: echo"),
            Decision::SkipUnchanged => f.write_str("skip: unchanged"),
            Decision::SkipInSync => f.write_str("skip: in-sync"),
            Decision::Replace { restore_cursor: true } => f.write_str("replace (restore cursor)"),
            Decision::Replace {
                restore_cursor: false,
            } => f.write_str("replace"),
            Decision::Unavailable => f.write_str("unavailable"),
        }
    }
}

/// Run the ordered guards against `external`; the first match wins.
///
/// `live` is the engine's current serialization. A `Replace` result here
/// always carries `restore_cursor: false`; the reconciler decides the
/// cursor policy once it knows the replacement succeeded.
pub fn evaluate(state: &ReconcileState, external: &str, live: &str) -> Decision {
    if state.typing {
        return Decision::SkipTyping;
    }
    if state.internal_update {
        return Decision::SkipInFlight;
    }
    if state.last_sent.as_deref() == Some(external) {
        return Decision::SkipEcho;
    }
    if state.last_known.as_deref() == Some(external) {
        return Decision::SkipUnchanged;
    }
    if live == external {
        return Decision::SkipInSync;
    }
    Decision::Replace {
        restore_cursor: false,
    }
}

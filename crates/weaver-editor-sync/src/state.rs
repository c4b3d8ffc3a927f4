//! Per-editor reconciliation state.

use std::fmt;

use smol_str::SmolStr;
use weaver_editor_core::Selection;

/// Opaque identity of the document bound to an editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId(SmolStr);

impl DocumentId {
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Content pushed in by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalUpdate {
    pub document_id: DocumentId,
    /// `None` is treated as empty content.
    pub content: Option<String>,
    /// Caller asserts the content did not come from this session's typing.
    pub is_external_update: bool,
}

impl ExternalUpdate {
    pub fn new(document_id: impl Into<DocumentId>, content: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            content: Some(content.into()),
            is_external_update: false,
        }
    }

    /// Update with absent content.
    pub fn empty(document_id: impl Into<DocumentId>) -> Self {
        Self {
            document_id: document_id.into(),
            content: None,
            is_external_update: false,
        }
    }

    pub fn external(mut self, is_external_update: bool) -> Self {
        self.is_external_update = is_external_update;
        self
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// Flags and snapshots that decide whether external content may land.
///
/// Everything here belongs to one bound document; `reset` wipes it when the
/// document changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileState {
    pub document_id: Option<DocumentId>,
    /// Last content accepted in either direction.
    pub last_known: Option<String>,
    /// Last content emitted to the change listener.
    pub last_sent: Option<String>,
    /// User is mid-keystroke.
    pub typing: bool,
    /// A local edit hasn't made the round trip to the host yet.
    pub internal_update: bool,
    /// Last observed selection.
    pub cursor: Option<Selection>,
}

impl ReconcileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every flag and snapshot and bind to `document_id`.
    pub fn reset(&mut self, document_id: DocumentId) {
        *self = Self {
            document_id: Some(document_id),
            ..Self::default()
        };
    }

    pub fn is_bound_to(&self, document_id: &DocumentId) -> bool {
        self.document_id.as_ref() == Some(document_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_everything() {
        let mut state = ReconcileState {
            document_id: Some("note-1".into()),
            last_known: Some("<p>a</p>".into()),
            last_sent: Some("<p>a</p>".into()),
            typing: true,
            internal_update: true,
            cursor: Some(Selection::collapsed(4)),
        };

        state.reset("note-2".into());

        assert!(state.is_bound_to(&"note-2".into()));
        assert_eq!(state.last_known, None);
        assert_eq!(state.last_sent, None);
        assert!(!state.typing);
        assert!(!state.internal_update);
        assert_eq!(state.cursor, None);
    }

    #[test]
    fn test_absent_content_is_empty() {
        let update = ExternalUpdate::empty("note-1");
        assert_eq!(update.content(), "");
        assert!(!update.is_external_update);
    }
}

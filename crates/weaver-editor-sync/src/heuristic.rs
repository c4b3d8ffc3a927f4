//! Document-switch detection and cursor clamping.
//!
//! A replacement is treated as loading a different document, rather than
//! patching the current one, when the length jumps by more than the
//! configured delta or the fingerprints differ. The fingerprint is the first
//! `prefix` chars followed by the total length, so any length change also
//! changes it.

use weaver_editor_core::Selection;

use crate::config::ReconcilerConfig;

/// Cheap, non-cryptographic content summary: leading chars plus length.
pub fn fingerprint(content: &str, prefix: usize) -> String {
    let len = content.chars().count();
    let mut out: String = content.chars().take(prefix).collect();
    out.push_str(&len.to_string());
    out
}

/// Whether replacing `old` with `new` looks like switching documents.
pub fn is_note_switch(old: &str, new: &str, config: &ReconcilerConfig) -> bool {
    let old_len = old.chars().count();
    let new_len = new.chars().count();
    if old_len.abs_diff(new_len) > config.note_switch_len_delta {
        return true;
    }

    let prefix = config.fingerprint_prefix_chars;
    fingerprint(old, prefix) != fingerprint(new, prefix)
}

/// Clamp one offset into `[1, document_len - 1]`.
///
/// Documents shorter than two positions have no such interior, so the
/// result falls back to 1.
pub fn clamp_offset(offset: usize, document_len: usize) -> usize {
    offset.min(document_len.saturating_sub(1)).max(1)
}

/// Clamp both ends of a selection into the new document.
pub fn clamp_selection(selection: Selection, document_len: usize) -> Selection {
    selection.map(|offset| clamp_offset(offset, document_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_uses_prefix_and_length() {
        assert_eq!(fingerprint("<p>abc</p>", 3), "<p>10");
        assert_eq!(fingerprint("", 100), "0");
    }

    #[test]
    fn test_same_length_same_prefix_is_not_switch() {
        let config = ReconcilerConfig::default();
        let head = "x".repeat(120);
        let old = format!("{head}aaa");
        let new = format!("{head}bbb");
        assert!(!is_note_switch(&old, &new, &config));
    }

    #[test]
    fn test_small_edit_changes_fingerprint() {
        let config = ReconcilerConfig::default();
        // Three extra chars: under the delta, but the length is part of the fingerprint.
        assert!(is_note_switch("<p>Hello</p>", "<p>Hello!!!</p>", &config));
    }

    #[test]
    fn test_large_length_delta_is_switch() {
        let config = ReconcilerConfig::default();
        let old = "a".repeat(10);
        let new = "a".repeat(61);
        assert!(is_note_switch(&old, &new, &config));
    }

    #[test]
    fn test_prefix_change_is_switch() {
        let config = ReconcilerConfig::default();
        assert!(is_note_switch("<p>Note one</p>", "<p>Note two</p>", &config));
    }

    #[test]
    fn test_identical_is_not_switch() {
        let config = ReconcilerConfig::default();
        assert!(!is_note_switch("<p>same</p>", "<p>same</p>", &config));
    }

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset(10, 8), 7);
        assert_eq!(clamp_offset(3, 8), 3);
        assert_eq!(clamp_offset(0, 8), 1);
        assert_eq!(clamp_offset(5, 0), 1);
        assert_eq!(clamp_offset(5, 1), 1);
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(
            clamp_selection(Selection::new(2, 40), 12),
            Selection::new(2, 11)
        );
    }
}

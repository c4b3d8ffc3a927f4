//! Reconciler tuning.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Quiet period before a local edit is emitted (ms).
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Keystroke inactivity after which the user is no longer typing (ms).
pub const DEFAULT_TYPING_IDLE_MS: u64 = 2000;

/// Delay after an emission before the in-flight flag drops (ms).
pub const DEFAULT_INTERNAL_CLEAR_MS: u64 = 1000;

/// Length change above which a replacement counts as a document switch.
pub const DEFAULT_NOTE_SWITCH_LEN_DELTA: usize = 50;

/// Prefix length used by the content fingerprint.
pub const DEFAULT_FINGERPRINT_PREFIX_CHARS: usize = 100;

/// Animation frames to wait before restoring the cursor.
pub const DEFAULT_RESTORE_FRAMES: u8 = 2;

/// Shortest interval any timer is armed with (ms).
pub const MIN_INTERVAL_MS: u64 = 1;

/// Timing and heuristic settings for a `Reconciler`.
///
/// Every field has a default, so partial settings documents deserialize.
/// Intervals below [`MIN_INTERVAL_MS`] are raised to it by the accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub debounce_ms: u64,
    pub typing_idle_ms: u64,
    pub internal_clear_ms: u64,
    pub note_switch_len_delta: usize,
    pub fingerprint_prefix_chars: usize,
    pub restore_frames: u8,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            typing_idle_ms: DEFAULT_TYPING_IDLE_MS,
            internal_clear_ms: DEFAULT_INTERNAL_CLEAR_MS,
            note_switch_len_delta: DEFAULT_NOTE_SWITCH_LEN_DELTA,
            fingerprint_prefix_chars: DEFAULT_FINGERPRINT_PREFIX_CHARS,
            restore_frames: DEFAULT_RESTORE_FRAMES,
        }
    }
}

impl ReconcilerConfig {
    pub fn debounce(&self) -> Duration {
        interval(self.debounce_ms)
    }

    pub fn typing_idle(&self) -> Duration {
        interval(self.typing_idle_ms)
    }

    pub fn internal_clear(&self) -> Duration {
        interval(self.internal_clear_ms)
    }
}

fn interval(ms: u64) -> Duration {
    Duration::from_millis(ms.max(MIN_INTERVAL_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_keep_defaults() {
        let config: ReconcilerConfig =
            serde_json::from_str(r#"{ "debounce_ms": 500, "restore_frames": 1 }"#).unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.restore_frames, 1);
        assert_eq!(config.typing_idle(), Duration::from_millis(2000));
        assert_eq!(config.internal_clear(), Duration::from_millis(1000));
        assert_eq!(config.note_switch_len_delta, 50);
        assert_eq!(config.fingerprint_prefix_chars, 100);
    }

    #[test]
    fn test_empty_settings_are_default() {
        let config: ReconcilerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReconcilerConfig::default());
    }

    #[test]
    fn test_zero_intervals_are_raised() {
        let config: ReconcilerConfig =
            serde_json::from_str(r#"{ "debounce_ms": 0, "internal_clear_ms": 0 }"#).unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(1));
        assert_eq!(config.internal_clear(), Duration::from_millis(1));
        assert_eq!(config.typing_idle(), Duration::from_millis(2000));
    }
}

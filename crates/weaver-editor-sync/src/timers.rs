//! Cancellable deadlines owned by the reconciler.

use std::fmt;

use web_time::Instant;

/// The reconciler's deferred actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Trailing-edge emission of local edits.
    Debounce,
    /// Typing flag expiry.
    TypingIdle,
    /// In-flight flag expiry after an emission.
    InternalClear,
}

impl TimerKind {
    const ALL: [TimerKind; 3] = [
        TimerKind::Debounce,
        TimerKind::TypingIdle,
        TimerKind::InternalClear,
    ];

    fn index(self) -> usize {
        match self {
            TimerKind::Debounce => 0,
            TimerKind::TypingIdle => 1,
            TimerKind::InternalClear => 2,
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerKind::Debounce => "debounce",
            TimerKind::TypingIdle => "typing-idle",
            TimerKind::InternalClear => "internal-clear",
        };
        f.write_str(name)
    }
}

/// One optional deadline per timer kind.
///
/// Arming a kind replaces its previous deadline, which is how debounce
/// and inactivity windows restart.
#[derive(Debug, Clone, Default)]
pub struct TimerSet {
    deadlines: [Option<Instant>; 3],
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, kind: TimerKind, deadline: Instant) {
        self.deadlines[kind.index()] = Some(deadline);
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.deadlines[kind.index()] = None;
    }

    pub fn cancel_all(&mut self) {
        self.deadlines = [None; 3];
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Instant> {
        self.deadlines[kind.index()]
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadline(kind).is_some()
    }

    /// Earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().flatten().min().copied()
    }

    /// Disarm and return the earliest timer due at `now`.
    ///
    /// Ties go to the kind declared first.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerKind, Instant)> {
        let (kind, deadline) = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|d| (kind, d)))
            .filter(|(_, d)| *d <= now)
            .min_by_key(|(_, d)| *d)?;
        self.cancel(kind);
        Some((kind, deadline))
    }
}

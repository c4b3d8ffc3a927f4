//! The content reconciler.
//!
//! Sits between a host that pushes content in (`update`) and a live engine
//! the user is typing into. External content only lands when the guards in
//! [`evaluate`](crate::evaluate) allow it; local edits flow out through a
//! trailing debounce to the [`ChangeListener`].
//!
//! Nothing here sleeps. Every entry point that needs the clock takes `now`,
//! timers are deadlines polled with [`Reconciler::poll_timers`], and the
//! post-replace cursor restore waits for [`Reconciler::on_animation_frame`].

use tracing::{debug, trace, warn};
use web_time::Instant;
use weaver_editor_core::{ContentEngine, Selection};

use crate::config::ReconcilerConfig;
use crate::decision::{Decision, evaluate};
use crate::heuristic::{clamp_selection, is_note_switch};
use crate::state::{ExternalUpdate, ReconcileState};
use crate::timers::{TimerKind, TimerSet};

/// Receives debounced local edits.
pub trait ChangeListener {
    fn on_change(&mut self, content: &str);
}

impl<F> ChangeListener for F
where
    F: FnMut(&str),
{
    fn on_change(&mut self, content: &str) {
        self(content)
    }
}

/// Cursor restore waiting on animation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRestore {
    selection: Selection,
    frames_remaining: u8,
}

/// Reconciles host-supplied content with a live engine.
pub struct Reconciler<E, L> {
    engine: E,
    listener: L,
    config: ReconcilerConfig,
    state: ReconcileState,
    timers: TimerSet,
    /// Latest local serialization waiting on the debounce.
    pending_emit: Option<String>,
    pending_restore: Option<PendingRestore>,
    last_external: Option<ExternalUpdate>,
    disposed: bool,
}

impl<E, L> Reconciler<E, L>
where
    E: ContentEngine,
    L: ChangeListener,
{
    pub fn new(engine: E, listener: L) -> Self {
        Self::with_config(engine, listener, ReconcilerConfig::default())
    }

    pub fn with_config(engine: E, listener: L, config: ReconcilerConfig) -> Self {
        Self {
            engine,
            listener,
            config,
            state: ReconcileState::new(),
            timers: TimerSet::new(),
            pending_emit: None,
            pending_restore: None,
            last_external: None,
            disposed: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Engine access for the host's own input handling.
    ///
    /// Report mutations made through this with `on_local_edit`.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn state(&self) -> &ReconcileState {
        &self.state
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn has_pending_restore(&self) -> bool {
        self.pending_restore.is_some()
    }

    pub fn has_pending_emit(&self) -> bool {
        self.pending_emit.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Neither side has been torn down.
    pub fn is_live(&self) -> bool {
        !self.disposed && !self.engine.is_disposed()
    }

    pub fn into_parts(self) -> (E, L) {
        (self.engine, self.listener)
    }

    /// Handle content supplied by the host.
    ///
    /// A new document identity triggers a hard reset; otherwise the guards
    /// decide whether the live document is replaced.
    pub fn update(&mut self, update: ExternalUpdate) -> Decision {
        if !self.is_live() {
            debug!(document_id = %update.document_id, "update on disposed editor ignored");
            return Decision::Unavailable;
        }

        let decision = if self.state.is_bound_to(&update.document_id) {
            self.reconcile(&update)
        } else {
            self.hard_reset(&update)
        };

        debug!(
            document_id = %update.document_id,
            external = update.is_external_update,
            %decision,
            "reconciled external content"
        );
        self.last_external = Some(update);
        decision
    }

    /// Run the guards again against the most recent external update.
    ///
    /// Hosts call this once typing settles to pick up content that was
    /// held back.
    pub fn reevaluate(&mut self) -> Option<Decision> {
        let update = self.last_external.clone()?;
        Some(self.update(update))
    }

    /// A key event that can mutate content reached the document.
    pub fn on_key_down(&mut self, now: Instant) {
        if !self.is_live() {
            return;
        }
        self.state.typing = true;
        self.timers
            .arm(TimerKind::TypingIdle, now + self.config.typing_idle());
    }

    /// The engine's document changed through local input.
    pub fn on_local_edit(&mut self, now: Instant) {
        if !self.is_live() {
            return;
        }

        let content = self.engine.serialized_content();
        self.state.internal_update = true;
        self.state.last_known = Some(content.clone());
        self.state.cursor = Some(self.engine.selection());

        // The user has moved on; an older snapshot would yank the cursor back.
        self.pending_restore = None;
        // Re-armed after the next emission.
        self.timers.cancel(TimerKind::InternalClear);

        self.pending_emit = Some(content);
        self.timers
            .arm(TimerKind::Debounce, now + self.config.debounce());
    }

    pub fn on_selection_change(&mut self, selection: Selection) {
        if !self.is_live() {
            return;
        }
        self.state.cursor = Some(selection);
    }

    /// Advance a pending cursor restore by one frame.
    ///
    /// Returns the selection that was applied, if this frame applied one.
    pub fn on_animation_frame(&mut self) -> Option<Selection> {
        let pending = self.pending_restore.as_mut()?;
        pending.frames_remaining = pending.frames_remaining.saturating_sub(1);
        if pending.frames_remaining > 0 {
            return None;
        }

        let selection = pending.selection;
        self.pending_restore = None;
        self.restore_cursor(selection)
    }

    /// Earliest time `poll_timers` has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.disposed {
            return None;
        }
        self.timers.next_deadline()
    }

    /// Fire every timer due at `now`, in deadline order.
    ///
    /// Returns how many fired.
    pub fn poll_timers(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((kind, deadline)) = self.timers.pop_due(now) {
            if !self.is_live() {
                trace!(timer = %kind, "engine gone, dropping pending work");
                self.cancel_pending();
                break;
            }
            fired += 1;
            trace!(timer = %kind, "timer fired");

            match kind {
                TimerKind::Debounce => self.emit(deadline),
                TimerKind::TypingIdle => self.state.typing = false,
                TimerKind::InternalClear => {
                    if self.state.typing {
                        self.timers.arm(
                            TimerKind::InternalClear,
                            deadline + self.config.internal_clear(),
                        );
                    } else {
                        self.state.internal_update = false;
                    }
                }
            }
        }
        fired
    }

    /// Tear down: cancel everything and ignore all later calls.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        debug!(
            dropped_emission = self.pending_emit.is_some(),
            "reconciler disposed"
        );
        self.cancel_pending();
        self.disposed = true;
    }

    fn hard_reset(&mut self, update: &ExternalUpdate) -> Decision {
        if let Some(previous) = &self.state.document_id {
            debug!(
                from = %previous,
                to = %update.document_id,
                dropped_emission = self.pending_emit.is_some(),
                "switching document"
            );
        }

        self.cancel_pending();
        self.state.reset(update.document_id.clone());

        let content = update.content();
        if let Err(err) = self.engine.set_content(content, false) {
            warn!(document_id = %update.document_id, %err, "failed to load document");
            return Decision::Unavailable;
        }

        self.state.last_known = Some(content.to_owned());
        self.state.last_sent = Some(content.to_owned());
        Decision::HardReset
    }

    fn reconcile(&mut self, update: &ExternalUpdate) -> Decision {
        let external = update.content();
        let live = self.engine.serialized_content();

        match evaluate(&self.state, external, &live) {
            decision @ (Decision::SkipEcho | Decision::SkipInSync) => {
                self.state.last_known = Some(external.to_owned());
                decision
            }
            Decision::Replace { .. } => self.replace(external, &live, update.is_external_update),
            decision => decision,
        }
    }

    fn replace(&mut self, content: &str, previous: &str, is_external_update: bool) -> Decision {
        if let Err(err) = self.engine.set_content(content, false) {
            warn!(%err, "failed to replace document content");
            return Decision::Unavailable;
        }
        self.state.last_known = Some(content.to_owned());

        let note_switch = is_note_switch(previous, content, &self.config);
        let restore = if is_external_update || !note_switch {
            self.state.cursor
        } else {
            None
        };
        trace!(note_switch, restore = restore.is_some(), "content replaced");

        self.pending_restore = None;
        let Some(selection) = restore else {
            // The old snapshot points into content that is gone.
            self.state.cursor = Some(self.engine.selection());
            return Decision::Replace {
                restore_cursor: false,
            };
        };

        if self.config.restore_frames == 0 {
            self.restore_cursor(selection);
        } else {
            self.pending_restore = Some(PendingRestore {
                selection,
                frames_remaining: self.config.restore_frames,
            });
        }
        Decision::Replace {
            restore_cursor: true,
        }
    }

    fn restore_cursor(&mut self, selection: Selection) -> Option<Selection> {
        if !self.is_live() {
            return None;
        }

        let clamped = clamp_selection(selection, self.engine.document_len());
        if let Err(err) = self.engine.set_selection(clamped) {
            warn!(%err, "cursor restore failed");
            return None;
        }
        self.state.cursor = Some(clamped);
        Some(clamped)
    }

    fn emit(&mut self, fired_at: Instant) {
        let Some(content) = self.pending_emit.take() else {
            return;
        };
        self.listener.on_change(&content);
        trace!(len = content.len(), "emitted local change");

        self.state.last_sent = Some(content);
        self.timers.arm(
            TimerKind::InternalClear,
            fired_at + self.config.internal_clear(),
        );
    }

    fn cancel_pending(&mut self) {
        self.timers.cancel_all();
        self.pending_emit = None;
        self.pending_restore = None;
    }
}

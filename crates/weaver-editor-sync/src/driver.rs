//! Async driver for native hosts.
//!
//! Runs a [`Reconciler`] on a tokio runtime: host events arrive over a
//! channel and the loop sleeps until the reconciler's next deadline in
//! between. Browser hosts schedule `poll_timers` through their own timer
//! APIs instead.

use tokio::sync::mpsc::UnboundedReceiver;
use web_time::Instant;
use weaver_editor_core::{ContentEngine, Selection};

use crate::reconciler::{ChangeListener, Reconciler};
use crate::state::ExternalUpdate;

/// Something the host wants the reconciler to know about.
pub enum HostEvent<E> {
    /// New content (and possibly a new document) from the host.
    Update(ExternalUpdate),
    /// A keystroke that edits the document. The closure applies the edit.
    Edit(Box<dyn FnOnce(&mut E) + Send>),
    /// A keystroke that reached the document without changing it.
    KeyDown,
    SelectionChanged(Selection),
    AnimationFrame,
    /// Re-run the guards against the last update.
    Reevaluate,
    /// Unmount. Ends the loop.
    Dispose,
}

impl<E> std::fmt::Debug for HostEvent<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostEvent::Update(update) => f.debug_tuple("Update").field(update).finish(),
            HostEvent::Edit(_) => f.write_str("Edit"),
            HostEvent::KeyDown => f.write_str("KeyDown"),
            HostEvent::SelectionChanged(sel) => f.debug_tuple("SelectionChanged").field(sel).finish(),
            HostEvent::AnimationFrame => f.write_str("AnimationFrame"),
            HostEvent::Reevaluate => f.write_str("Reevaluate"),
            HostEvent::Dispose => f.write_str("Dispose"),
        }
    }
}

/// Drive `reconciler` until the channel closes or a `Dispose` arrives.
///
/// Timers still pending when the channel closes are dropped with the loop.
pub async fn drive<E, L>(
    mut reconciler: Reconciler<E, L>,
    mut events: UnboundedReceiver<HostEvent<E>>,
) -> Reconciler<E, L>
where
    E: ContentEngine,
    L: ChangeListener,
{
    loop {
        let deadline = reconciler.next_deadline();
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::debug!("host channel closed, stopping driver");
                    break;
                };
                if !handle(&mut reconciler, event, now()) {
                    break;
                }
            }
            _ = sleep_until(deadline) => {
                reconciler.poll_timers(now());
            }
        }
    }
    reconciler
}

/// Apply one event. Returns false when the loop should stop.
fn handle<E, L>(reconciler: &mut Reconciler<E, L>, event: HostEvent<E>, now: Instant) -> bool
where
    E: ContentEngine,
    L: ChangeListener,
{
    tracing::trace!(?event, "host event");
    match event {
        HostEvent::Update(update) => {
            reconciler.update(update);
        }
        HostEvent::Edit(edit) => {
            reconciler.on_key_down(now);
            edit(reconciler.engine_mut());
            reconciler.on_local_edit(now);
        }
        HostEvent::KeyDown => reconciler.on_key_down(now),
        HostEvent::SelectionChanged(selection) => reconciler.on_selection_change(selection),
        HostEvent::AnimationFrame => {
            reconciler.on_animation_frame();
        }
        HostEvent::Reevaluate => {
            reconciler.reevaluate();
        }
        HostEvent::Dispose => {
            reconciler.dispose();
            return false;
        }
    }
    true
}

// tokio's clock, so paused test runtimes stay consistent.
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

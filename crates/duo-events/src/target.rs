//! Event Target & Dispatch Engine
//!
//! Synchronous, reentrant-safe dispatch. The listener list is snapshotted at
//! pass start and the registry borrow is released before any callback runs,
//! so callbacks are free to add or remove listeners, or dispatch again, on
//! this or any other target.

use std::cell::RefCell;
use std::rc::Rc;

use crate::listener::{ListenerCallback, ListenerEntry, ListenerMap};
use crate::{Event, ScriptError};

/// Where a convenience (`onX`) handler runs relative to registry listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotOrder {
    /// Legacy slot position: before registry listeners.
    #[default]
    First,
    /// After registry listeners.
    Last,
}

/// Outcome of one dispatch pass.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// True iff the event was cancelable and `preventDefault` was invoked
    /// during this pass.
    pub canceled: bool,
    /// Callback failures, in invocation order. Never aborts the pass.
    pub failures: Vec<ScriptError>,
}

/// A capability object that listens for and receives events.
///
/// Cheap to clone; clones share the listener list. Equality is identity.
#[derive(Clone, Default)]
pub struct EventTarget {
    listeners: Rc<RefCell<ListenerMap>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener unless one with the same (type, callback) identity
    /// is already registered.
    pub fn add_event_listener(&self, event_type: &str, callback: ListenerCallback, once: bool) {
        self.listeners.borrow_mut().add(event_type, callback, once);
    }

    /// Remove the listener with the same (type, callback) identity, if any.
    pub fn remove_event_listener(&self, event_type: &str, callback: &ListenerCallback) {
        self.listeners.borrow_mut().remove(event_type, callback);
    }

    /// Drop all listeners (target teardown).
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners.borrow().count(event_type)
    }

    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listener_count(event_type) > 0
    }

    /// Dispatch `event` to this target's listeners.
    pub fn dispatch(&self, event: &Event) -> Dispatch {
        self.dispatch_with_slot(event, None, SlotOrder::First)
    }

    /// Dispatch with an implicit convenience handler joining the pass in the
    /// given position. The slot behaves as one non-`once` listener.
    pub fn dispatch_with_slot(
        &self,
        event: &Event,
        slot: Option<&ListenerCallback>,
        order: SlotOrder,
    ) -> Dispatch {
        let snapshot = self.listeners.borrow().snapshot(event.event_type());
        let previous_target = event.begin_dispatch(self.clone());
        let mut failures = Vec::new();

        if order == SlotOrder::First {
            self.invoke_slot(event, slot, &mut failures);
        }
        for entry in &snapshot {
            if event.propagation_stopped() {
                break;
            }
            if entry.removed.get() {
                continue;
            }
            if entry.once {
                self.unregister(event.event_type(), entry);
            }
            if let Err(err) = (entry.callback)(event) {
                failures.push(err);
            }
        }
        if order == SlotOrder::Last {
            self.invoke_slot(event, slot, &mut failures);
        }

        event.end_dispatch(previous_target);
        Dispatch {
            canceled: event.cancelable() && event.default_prevented(),
            failures,
        }
    }

    /// Script-facing `dispatchEvent`: returns `true` unless the event was
    /// canceled. Failures are logged; embedders wanting to escalate them use
    /// [`EventTarget::dispatch`].
    pub fn dispatch_event(&self, event: &Event) -> bool {
        let outcome = self.dispatch(event);
        for failure in &outcome.failures {
            tracing::warn!(event_type = event.event_type(), %failure, "listener failed");
        }
        !outcome.canceled
    }

    fn invoke_slot(
        &self,
        event: &Event,
        slot: Option<&ListenerCallback>,
        failures: &mut Vec<ScriptError>,
    ) {
        if event.propagation_stopped() {
            return;
        }
        if let Some(callback) = slot {
            if let Err(err) = callback(event) {
                failures.push(err);
            }
        }
    }

    fn unregister(&self, event_type: &str, entry: &Rc<ListenerEntry>) {
        self.listeners.borrow_mut().remove_entry(event_type, entry);
    }

    /// Identity comparison; clones of the same target compare equal.
    pub fn same_target(&self, other: &EventTarget) -> bool {
        Rc::ptr_eq(&self.listeners, &other.listeners)
    }
}

impl PartialEq for EventTarget {
    fn eq(&self, other: &Self) -> bool {
        self.same_target(other)
    }
}

impl std::fmt::Debug for EventTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventTarget({:p})", Rc::as_ptr(&self.listeners))
    }
}

//! Global Scope
//!
//! The process-wide event target scripts see as the global object, plus the
//! `onX` convenience handler slots. One instance is created at startup and
//! passed explicitly to whatever needs to dispatch against it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use duo_events::{Dispatch, Event, EventTarget, ListenerCallback, SlotOrder, types};

/// Event types driven by hardware sampling. The event loop keeps running
/// while any of these has a listener.
pub const DEPENDENT_EVENTS: [&str; 8] = [
    types::VBLANK,
    types::BUTTON_DOWN,
    types::BUTTON_UP,
    types::TOUCH_START,
    types::TOUCH_MOVE,
    types::TOUCH_END,
    types::KEY_DOWN,
    types::KEY_UP,
];

/// The global scope: one ordinary [`EventTarget`] plus a convenience slot
/// per event type. A slot behaves as one implicit non-`once` listener.
pub struct GlobalScope {
    target: EventTarget,
    slots: RefCell<HashMap<&'static str, ListenerCallback>>,
    slot_order: Cell<SlotOrder>,
}

/// Slot names are restricted to the fixed `onX` attribute set.
const SLOT_TYPES: [&str; 12] = [
    types::VBLANK,
    types::SLEEP,
    types::WAKE,
    types::ERROR,
    types::UNHANDLED_REJECTION,
    types::KEY_DOWN,
    types::KEY_UP,
    types::BUTTON_DOWN,
    types::BUTTON_UP,
    types::TOUCH_START,
    types::TOUCH_MOVE,
    types::TOUCH_END,
];

impl GlobalScope {
    pub fn new() -> Self {
        Self {
            target: EventTarget::new(),
            slots: RefCell::new(HashMap::new()),
            slot_order: Cell::new(SlotOrder::First),
        }
    }

    pub fn target(&self) -> &EventTarget {
        &self.target
    }

    /// Register a listener. A `None` callback registers nothing, mirroring
    /// the permissive host API.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        callback: Option<ListenerCallback>,
        once: bool,
    ) {
        if let Some(callback) = callback {
            self.target.add_event_listener(event_type, callback, once);
        }
    }

    pub fn remove_event_listener(&self, event_type: &str, callback: &ListenerCallback) {
        self.target.remove_event_listener(event_type, callback);
    }

    /// Assign an `onX` convenience handler; `None` clears the slot.
    /// Unknown types are ignored (there is no `onfoo` attribute to assign).
    pub fn set_handler(&self, event_type: &str, callback: Option<ListenerCallback>) {
        let Some(name) = SLOT_TYPES.iter().copied().find(|ty| *ty == event_type) else {
            return;
        };
        let mut slots = self.slots.borrow_mut();
        match callback {
            Some(callback) => {
                slots.insert(name, callback);
            }
            None => {
                slots.remove(name);
            }
        }
    }

    pub fn handler(&self, event_type: &str) -> Option<ListenerCallback> {
        self.slots.borrow().get(event_type).cloned()
    }

    /// Where convenience handlers run relative to registry listeners. Not
    /// load-bearing; defaults to first.
    pub fn set_slot_order(&self, order: SlotOrder) {
        self.slot_order.set(order);
    }

    /// True when anything (listener or slot) would observe `event_type`.
    pub fn wants(&self, event_type: &str) -> bool {
        self.target.has_listeners(event_type) || self.slots.borrow().contains_key(event_type)
    }

    /// True while any hardware-driven event type is observed.
    pub fn has_dependents(&self) -> bool {
        DEPENDENT_EVENTS.iter().any(|ty| self.wants(ty))
    }

    /// Dispatch on the global target with the convenience slot joining the
    /// pass.
    pub fn dispatch(&self, event: &Event) -> Dispatch {
        let slot = self.handler(event.event_type());
        self.target
            .dispatch_with_slot(event, slot.as_ref(), self.slot_order.get())
    }

    /// Script-facing `dispatchEvent` against the global scope.
    pub fn dispatch_event(&self, event: &Event) -> bool {
        let outcome = self.dispatch(event);
        for failure in &outcome.failures {
            tracing::warn!(event_type = event.event_type(), %failure, "listener failed");
        }
        !outcome.canceled
    }
}

impl Default for GlobalScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> ListenerCallback {
        let log = log.clone();
        Rc::new(move |_| {
            log.borrow_mut().push(tag);
            Ok(())
        })
    }

    #[test]
    fn test_null_callback_is_noop() {
        let scope = GlobalScope::new();
        scope.add_event_listener("vblank", None, false);
        assert!(!scope.wants("vblank"));
    }

    #[test]
    fn test_slot_counts_as_listener_for_wants() {
        let scope = GlobalScope::new();
        assert!(!scope.has_dependents());
        scope.set_handler("vblank", Some(Rc::new(|_| Ok(()))));
        assert!(scope.wants("vblank"));
        assert!(scope.has_dependents());
        scope.set_handler("vblank", None);
        assert!(!scope.has_dependents());
    }

    #[test]
    fn test_sleep_slot_is_not_a_dependent() {
        let scope = GlobalScope::new();
        scope.set_handler("sleep", Some(Rc::new(|_| Ok(()))));
        assert!(scope.wants("sleep"));
        assert!(!scope.has_dependents());
    }

    #[test]
    fn test_unknown_slot_name_ignored() {
        let scope = GlobalScope::new();
        scope.set_handler("load", Some(Rc::new(|_| Ok(()))));
        assert!(!scope.wants("load"));
    }

    #[test]
    fn test_slot_runs_before_listeners_by_default() {
        let scope = GlobalScope::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scope.add_event_listener("buttondown", Some(recorder(&log, "listener")), false);
        scope.set_handler("buttondown", Some(recorder(&log, "slot")));

        scope.dispatch(&Event::simple("buttondown"));
        assert_eq!(*log.borrow(), vec!["slot", "listener"]);

        log.borrow_mut().clear();
        scope.set_slot_order(SlotOrder::Last);
        scope.dispatch(&Event::simple("buttondown"));
        assert_eq!(*log.borrow(), vec!["listener", "slot"]);
    }

    #[test]
    fn test_reassigned_slot_replaces_old_handler() {
        let scope = GlobalScope::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        scope.set_handler("wake", Some(recorder(&log, "old")));
        scope.set_handler("wake", Some(recorder(&log, "new")));

        scope.dispatch(&Event::simple("wake"));
        assert_eq!(*log.borrow(), vec!["new"]);
    }
}

//! Listener Registry
//!
//! Per-type, insertion-ordered listener storage. Listener identity is `Rc`
//! pointer identity of the callback, matching the host API rule that a
//! (type, callback) pair registers at most once.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{Event, ScriptError};

/// A script callback. Receives the event being dispatched; a returned error
/// is collected by the dispatch engine, never propagated into the pass.
pub type ListenerCallback = Rc<dyn Fn(&Event) -> Result<(), ScriptError>>;

pub(crate) struct ListenerEntry {
    pub(crate) callback: ListenerCallback,
    pub(crate) once: bool,
    /// Set when the entry leaves the registry so an in-flight snapshot
    /// skips it.
    pub(crate) removed: Cell<bool>,
}

pub(crate) fn same_callback(a: &ListenerCallback, b: &ListenerCallback) -> bool {
    Rc::ptr_eq(a, b)
}

/// Map of event type -> ordered listener list. All operations are total.
#[derive(Default)]
pub(crate) struct ListenerMap {
    lists: HashMap<Rc<str>, Vec<Rc<ListenerEntry>>>,
}

impl ListenerMap {
    /// Append unless a listener with the same callback identity is already
    /// registered for `event_type`.
    pub(crate) fn add(&mut self, event_type: &str, callback: ListenerCallback, once: bool) {
        let list = self.lists.entry(Rc::from(event_type)).or_default();
        if list.iter().any(|entry| same_callback(&entry.callback, &callback)) {
            return;
        }
        list.push(Rc::new(ListenerEntry {
            callback,
            once,
            removed: Cell::new(false),
        }));
    }

    /// Remove the first entry matching the callback identity; no-op if absent.
    pub(crate) fn remove(&mut self, event_type: &str, callback: &ListenerCallback) {
        if let Some(list) = self.lists.get_mut(event_type) {
            if let Some(pos) = list
                .iter()
                .position(|entry| same_callback(&entry.callback, callback))
            {
                list.remove(pos).removed.set(true);
            }
        }
    }

    /// Remove one specific entry (used by the dispatch engine for `once`).
    pub(crate) fn remove_entry(&mut self, event_type: &str, target: &Rc<ListenerEntry>) {
        if let Some(list) = self.lists.get_mut(event_type) {
            if let Some(pos) = list.iter().position(|entry| Rc::ptr_eq(entry, target)) {
                list.remove(pos);
            }
        }
        target.removed.set(true);
    }

    /// Drop every list, marking entries dead for any in-flight snapshot.
    pub(crate) fn clear(&mut self) {
        for list in self.lists.values() {
            for entry in list {
                entry.removed.set(true);
            }
        }
        self.lists.clear();
    }

    pub(crate) fn snapshot(&self, event_type: &str) -> Vec<Rc<ListenerEntry>> {
        self.lists.get(event_type).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, event_type: &str) -> usize {
        self.lists.get(event_type).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ListenerCallback {
        Rc::new(|_| Ok(()))
    }

    #[test]
    fn test_duplicate_callback_is_noop() {
        let mut map = ListenerMap::default();
        let cb = noop();
        map.add("vblank", cb.clone(), false);
        map.add("vblank", cb.clone(), true);
        assert_eq!(map.count("vblank"), 1);

        // a different closure with identical code is a different identity
        map.add("vblank", noop(), false);
        assert_eq!(map.count("vblank"), 2);
    }

    #[test]
    fn test_remove_marks_entry_dead() {
        let mut map = ListenerMap::default();
        let cb = noop();
        map.add("keydown", cb.clone(), false);
        let snapshot = map.snapshot("keydown");
        map.remove("keydown", &cb);
        assert_eq!(map.count("keydown"), 0);
        assert!(snapshot[0].removed.get());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut map = ListenerMap::default();
        map.add("keydown", noop(), false);
        map.remove("keydown", &noop());
        map.remove("buttonup", &noop());
        assert_eq!(map.count("keydown"), 1);
    }

    #[test]
    fn test_clear_kills_snapshots() {
        let mut map = ListenerMap::default();
        map.add("touchstart", noop(), false);
        map.add("touchend", noop(), false);
        let snapshot = map.snapshot("touchstart");
        map.clear();
        assert_eq!(map.count("touchstart"), 0);
        assert_eq!(map.count("touchend"), 0);
        assert!(snapshot[0].removed.get());
    }
}

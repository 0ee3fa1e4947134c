//! Timers
//!
//! Tick-decremented `setTimeout`/`setInterval` storage. Time is advanced by
//! the event loop between vertical blanks; due handlers run FIFO by id.
//! Handlers are re-entrant: they may schedule or clear timers, including
//! their own.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use duo_events::ScriptError;

/// A timer handler. A returned error escalates like a listener failure.
pub type TimerCallback = Rc<dyn Fn() -> Result<(), ScriptError>>;

/// Nested scheduling past this depth gets its delay clamped.
const NEST_CLAMP_LEVEL: u32 = 5;
const NEST_CLAMP_MIN_MS: u64 = 4;

struct TimerEntry {
    callback: TimerCallback,
    delay_ms: u64,
    remaining_ms: u64,
    repeat: bool,
    nest_level: u32,
}

#[derive(Default)]
struct TimersInner {
    entries: BTreeMap<u32, TimerEntry>,
    next_id: u32,
    nest_level: u32,
}

impl TimersInner {
    fn schedule(&mut self, callback: TimerCallback, delay_ms: u64, repeat: bool) -> u32 {
        let mut delay_ms = delay_ms;
        if self.nest_level > NEST_CLAMP_LEVEL && delay_ms < NEST_CLAMP_MIN_MS {
            delay_ms = NEST_CLAMP_MIN_MS;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.entries.insert(
            id,
            TimerEntry {
                callback,
                delay_ms,
                remaining_ms: delay_ms,
                repeat,
                nest_level: self.nest_level + 1,
            },
        );
        id
    }
}

/// Shared timer table. Clones share state.
#[derive(Clone, Default)]
pub struct Timers {
    inner: Rc<RefCell<TimersInner>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot handler. Returns its id.
    pub fn set_timeout(&self, callback: TimerCallback, delay_ms: u64) -> u32 {
        self.inner.borrow_mut().schedule(callback, delay_ms, false)
    }

    /// Schedule a repeating handler. Returns its id.
    pub fn set_interval(&self, callback: TimerCallback, delay_ms: u64) -> u32 {
        self.inner.borrow_mut().schedule(callback, delay_ms, true)
    }

    /// Remove a pending timer. No retroactive effect on a handler already
    /// mid-run; no-op for unknown ids.
    pub fn clear(&self, id: u32) {
        self.inner.borrow_mut().entries.remove(&id);
    }

    pub fn has_pending(&self) -> bool {
        !self.inner.borrow().entries.is_empty()
    }

    /// Count down every pending timer by the elapsed wall time.
    pub fn advance(&self, elapsed_ms: u64) {
        for entry in self.inner.borrow_mut().entries.values_mut() {
            entry.remaining_ms = entry.remaining_ms.saturating_sub(elapsed_ms);
        }
    }

    /// Run every handler that is due, FIFO by id. Failures go to `escalate`.
    ///
    /// Only timers due when the call starts are run; a handler scheduling a
    /// zero-delay timer does not extend the current drain.
    pub fn run_due(&self, mut escalate: impl FnMut(ScriptError)) {
        let due: Vec<u32> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, entry)| entry.remaining_ms == 0)
            .map(|(id, _)| *id)
            .collect();

        for id in due {
            // the handler may have been cleared by an earlier handler
            let Some((callback, nest_level)) = self
                .inner
                .borrow()
                .entries
                .get(&id)
                .map(|entry| (entry.callback.clone(), entry.nest_level))
            else {
                continue;
            };

            let previous_level = {
                let mut inner = self.inner.borrow_mut();
                std::mem::replace(&mut inner.nest_level, nest_level)
            };
            let result = callback();
            self.inner.borrow_mut().nest_level = previous_level;

            if let Err(err) = result {
                escalate(err);
            }

            // reschedule or retire, unless the handler cleared itself
            let mut inner = self.inner.borrow_mut();
            let retire = match inner.entries.get_mut(&id) {
                Some(entry) if entry.repeat => {
                    entry.remaining_ms = entry.delay_ms;
                    false
                }
                Some(_) => true,
                None => false,
            };
            if retire {
                inner.entries.remove(&id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter(count: &Rc<Cell<u32>>) -> TimerCallback {
        let count = count.clone();
        Rc::new(move || {
            count.set(count.get() + 1);
            Ok(())
        })
    }

    #[test]
    fn test_timeout_fires_once() {
        let timers = Timers::new();
        let count = Rc::new(Cell::new(0));
        timers.set_timeout(counter(&count), 32);

        timers.advance(16);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 0);

        timers.advance(16);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 1);
        assert!(!timers.has_pending());

        timers.advance(100);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_interval_repeats_until_cleared() {
        let timers = Timers::new();
        let count = Rc::new(Cell::new(0));
        let id = timers.set_interval(counter(&count), 10);

        for _ in 0..3 {
            timers.advance(10);
            timers.run_due(|_| {});
        }
        assert_eq!(count.get(), 3);

        timers.clear(id);
        timers.advance(10);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_clear_unknown_id_is_noop() {
        let timers = Timers::new();
        timers.clear(42);
        assert!(!timers.has_pending());
    }

    #[test]
    fn test_due_handlers_run_in_id_order() {
        let timers = Timers::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            timers.set_timeout(
                Rc::new(move || {
                    log.borrow_mut().push(tag);
                    Ok(())
                }),
                0,
            );
        }
        timers.run_due(|_| {});
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_handler_clearing_its_own_interval() {
        let timers = Timers::new();
        let count = Rc::new(Cell::new(0));
        let id_cell = Rc::new(Cell::new(0));
        let id = {
            let timers = timers.clone();
            let count = count.clone();
            let id_cell = id_cell.clone();
            timers.clone().set_interval(
                Rc::new(move || {
                    count.set(count.get() + 1);
                    timers.clear(id_cell.get());
                    Ok(())
                }),
                5,
            )
        };
        id_cell.set(id);

        timers.advance(5);
        timers.run_due(|_| {});
        timers.advance(5);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 1);
        assert!(!timers.has_pending());
    }

    #[test]
    fn test_nested_zero_delay_waits_for_next_drain() {
        let timers = Timers::new();
        let count = Rc::new(Cell::new(0));
        {
            let timers2 = timers.clone();
            let count = count.clone();
            timers.set_timeout(
                Rc::new(move || {
                    let count = count.clone();
                    timers2.set_timeout(
                        Rc::new(move || {
                            count.set(count.get() + 1);
                            Ok(())
                        }),
                        0,
                    );
                    Ok(())
                }),
                0,
            );
        }
        timers.run_due(|_| {});
        assert_eq!(count.get(), 0);
        timers.run_due(|_| {});
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_deep_nesting_clamps_delay() {
        let timers = Timers::new();
        {
            let mut inner = timers.inner.borrow_mut();
            inner.nest_level = NEST_CLAMP_LEVEL + 1;
        }
        let id = timers.set_timeout(Rc::new(|| Ok(())), 0);
        let remaining = timers.inner.borrow().entries[&id].remaining_ms;
        assert_eq!(remaining, NEST_CLAMP_MIN_MS);
    }

    #[test]
    fn test_failure_escalates() {
        let timers = Timers::new();
        timers.set_timeout(Rc::new(|| Err(ScriptError::new("Uncaught boom"))), 0);
        let mut seen = Vec::new();
        timers.run_due(|err| seen.push(err.message));
        assert_eq!(seen, vec!["Uncaught boom"]);
    }
}

//! Event Model
//!
//! The base event record plus the closed set of payload shapes the host
//! synthesizes. An event is immutable after construction except for two
//! monotonic flags (`defaultPrevented` and the stop-immediate flag) and the
//! target slot, which is only populated for the duration of a dispatch pass.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::target::EventTarget;
use crate::types;

/// Construction options for [`Event::new`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EventInit {
    pub cancelable: bool,
}

/// Type-specific payload, fixed at construction.
///
/// Handlers read payload fields after a tag check; dispatch itself only ever
/// touches the base record.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    None,
    /// A callback or timer handler failure.
    Error {
        message: String,
        filename: String,
        lineno: Option<u32>,
    },
    /// A promise rejection nothing handled.
    Rejection { reason: String },
    /// On-screen keyboard interaction.
    Keyboard {
        key: String,
        code: String,
        layout: String,
        repeat: bool,
        shifted: bool,
    },
    /// A single button edge.
    Button { button: &'static str },
    /// Touch screen interaction. `dx`/`dy` are zero except for moves.
    Touch { x: f64, y: f64, dx: f64, dy: f64 },
}

/// An event instance, dispatched against an [`EventTarget`].
pub struct Event {
    event_type: Rc<str>,
    cancelable: bool,
    payload: EventPayload,
    time_stamp: f64,
    default_prevented: Cell<bool>,
    stop_immediate: Cell<bool>,
    target: RefCell<Option<EventTarget>>,
}

impl Event {
    /// Create an event with no payload.
    pub fn new(event_type: &str, init: EventInit) -> Self {
        Self {
            event_type: Rc::from(event_type),
            cancelable: init.cancelable,
            payload: EventPayload::None,
            time_stamp: 0.0,
            default_prevented: Cell::new(false),
            stop_immediate: Cell::new(false),
            target: RefCell::new(None),
        }
    }

    /// Create a non-cancelable event with no payload.
    pub fn simple(event_type: &str) -> Self {
        Self::new(event_type, EventInit::default())
    }

    /// Create an `error` event from a script failure.
    pub fn error(err: &crate::ScriptError) -> Self {
        Self::new(types::ERROR, EventInit { cancelable: true }).with_payload(EventPayload::Error {
            message: err.message.clone(),
            filename: err.filename.clone(),
            lineno: err.lineno,
        })
    }

    /// Create an `unhandledrejection` event.
    pub fn rejection(reason: &str) -> Self {
        Self::new(types::UNHANDLED_REJECTION, EventInit { cancelable: true })
            .with_payload(EventPayload::Rejection {
                reason: reason.to_string(),
            })
    }

    /// Create a `keydown`/`keyup` event. Keyboard events are cancelable.
    pub fn keyboard(
        down: bool,
        key: &str,
        code: &str,
        layout: &str,
        repeat: bool,
        shifted: bool,
    ) -> Self {
        let ty = if down { types::KEY_DOWN } else { types::KEY_UP };
        Self::new(ty, EventInit { cancelable: true }).with_payload(EventPayload::Keyboard {
            key: key.to_string(),
            code: code.to_string(),
            layout: layout.to_string(),
            repeat,
            shifted,
        })
    }

    /// Create a `buttondown`/`buttonup` event.
    pub fn button(down: bool, button: &'static str) -> Self {
        let ty = if down {
            types::BUTTON_DOWN
        } else {
            types::BUTTON_UP
        };
        Self::simple(ty).with_payload(EventPayload::Button { button })
    }

    /// Create a `touchstart` event.
    pub fn touch_start(x: f64, y: f64) -> Self {
        Self::simple(types::TOUCH_START).with_payload(EventPayload::Touch {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        })
    }

    /// Create a `touchmove` event carrying the delta against the previous sample.
    pub fn touch_move(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::simple(types::TOUCH_MOVE).with_payload(EventPayload::Touch { x, y, dx, dy })
    }

    /// Create a `touchend` event at the last sampled position.
    pub fn touch_end(x: f64, y: f64) -> Self {
        Self::simple(types::TOUCH_END).with_payload(EventPayload::Touch {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
        })
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }

    /// Stamp the event with seconds since runtime start.
    pub fn with_time_stamp(mut self, seconds: f64) -> Self {
        self.time_stamp = seconds;
        self
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn payload(&self) -> &EventPayload {
        &self.payload
    }

    pub fn time_stamp(&self) -> f64 {
        self.time_stamp
    }

    /// The target of the in-flight dispatch, if any.
    pub fn target(&self) -> Option<EventTarget> {
        self.target.borrow().clone()
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Signal cancellation of the operation that caused this event.
    /// Silent no-op on non-cancelable events.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Stop the current pass from reaching any further listeners.
    pub fn stop_immediate_propagation(&self) {
        self.stop_immediate.set(true);
    }

    pub(crate) fn propagation_stopped(&self) -> bool {
        self.stop_immediate.get()
    }

    /// Enter a dispatch pass, returning the previously set target so nested
    /// dispatches restore it on exit.
    pub(crate) fn begin_dispatch(&self, target: EventTarget) -> Option<EventTarget> {
        self.target.replace(Some(target))
    }

    /// Leave a dispatch pass. The stop-immediate flag is per-pass state and
    /// resets here; `defaultPrevented` survives.
    pub(crate) fn end_dispatch(&self, previous: Option<EventTarget>) {
        *self.target.borrow_mut() = previous;
        self.stop_immediate.set(false);
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("type", &self.event_type)
            .field("cancelable", &self.cancelable)
            .field("default_prevented", &self.default_prevented.get())
            .field("time_stamp", &self.time_stamp)
            .field("payload", &self.payload)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptError;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let event = Event::simple(types::VBLANK);
        event.prevent_default();
        assert!(!event.default_prevented());

        let event = Event::new("sleep", EventInit { cancelable: true });
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn test_error_event_payload() {
        let err = ScriptError::new("Uncaught boom").at("app.js", 3);
        let event = Event::error(&err);
        assert_eq!(event.event_type(), "error");
        assert!(event.cancelable());
        match event.payload() {
            EventPayload::Error {
                message,
                filename,
                lineno,
            } => {
                assert_eq!(message, "Uncaught boom");
                assert_eq!(filename, "app.js");
                assert_eq!(*lineno, Some(3));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_touch_constructors() {
        let event = Event::touch_move(12.0, 34.0, 2.0, -1.0);
        assert_eq!(event.event_type(), "touchmove");
        match event.payload() {
            EventPayload::Touch { x, y, dx, dy } => {
                assert_eq!((*x, *y, *dx, *dy), (12.0, 34.0, 2.0, -1.0));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_target_empty_outside_dispatch() {
        let event = Event::simple("vblank");
        assert!(event.target().is_none());
    }
}

//! Duo Event Core
//!
//! Listener registry, dispatch engine, and event model for the Duo script
//! host. Everything here runs on the host's single cooperative thread;
//! callbacks are plain invocables and script failures are plain values.
//!
//! Features:
//! - EventTarget with insertion-ordered, identity-deduplicated listeners
//! - Copy-on-dispatch: mutation during a pass never affects that pass
//! - `once` listeners, `preventDefault`, `stopImmediatePropagation`
//! - FIFO task queue for deferred dispatches

mod error;
mod event;
mod listener;
mod target;
mod task;

pub use error::ScriptError;
pub use event::{Event, EventInit, EventPayload};
pub use listener::ListenerCallback;
pub use target::{Dispatch, EventTarget, SlotOrder};
pub use task::{QueuedEvent, TaskQueue};

/// Well-known event type names.
pub mod types {
    pub const VBLANK: &str = "vblank";
    pub const SLEEP: &str = "sleep";
    pub const WAKE: &str = "wake";
    pub const ERROR: &str = "error";
    pub const UNHANDLED_REJECTION: &str = "unhandledrejection";
    pub const KEY_DOWN: &str = "keydown";
    pub const KEY_UP: &str = "keyup";
    pub const BUTTON_DOWN: &str = "buttondown";
    pub const BUTTON_UP: &str = "buttonup";
    pub const TOUCH_START: &str = "touchstart";
    pub const TOUCH_MOVE: &str = "touchmove";
    pub const TOUCH_END: &str = "touchend";
}

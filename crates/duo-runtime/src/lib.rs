//! Duo Runtime
//!
//! The host-facing half of the Duo script engine: the global scope with its
//! convenience handler slots, tick-based timers, failure escalation, and the
//! vertical-blank event loop that samples input and drives dispatch.
//!
//! Everything runs on one cooperative thread. The scripting engine, storage,
//! and graphics subsystems stay behind the [`host::Host`] trait and plain
//! callback values; this crate never inspects them.

mod event_loop;
mod globals;
mod host;
mod report;
mod timers;

pub use event_loop::{Runtime, RuntimeConfig};
pub use globals::GlobalScope;
pub use host::Host;
pub use report::{ReportSink, TracingSink};
pub use timers::{TimerCallback, Timers};

pub use duo_events::{
    Dispatch, Event, EventInit, EventPayload, EventTarget, ListenerCallback, QueuedEvent,
    ScriptError, SlotOrder, TaskQueue, types,
};
pub use duo_input::{
    Button, ButtonSet, FrameDiff, FrameSampler, InputState, KeyTransition, KeyboardLayout,
    RawInput, SampleError, SamplerPhase, TouchPoint, TouchTransition,
};

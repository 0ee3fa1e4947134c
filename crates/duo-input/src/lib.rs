//! Duo Input Sampling
//!
//! Raw hardware readings and the per-frame state derived from them. The
//! sampler double-buffers one reading per vertical blank; button
//! pressed/held/released and touch start/active/end are pure functions of
//! the previous and current buffers, never stored.
//!
//! Samples derive `serde` traits so embedders can record and replay input
//! streams.

mod buttons;
mod keys;
mod sampler;
mod touch;

pub use buttons::{Button, ButtonSet};
pub use keys::{KeyTransition, KeyboardLayout};
pub use sampler::{FrameDiff, FrameSampler, InputState, RawInput, SampleError, SamplerPhase};
pub use touch::{TouchPoint, TouchTransition};

//! Host Boundary
//!
//! The services the console provides to the runtime. The event loop only
//! ever talks to hardware through this trait, so tests and desktop shells
//! drive it with scripted implementations.

use std::time::Duration;

use duo_input::{KeyTransition, RawInput, SampleError};

/// The console-side collaborators of the event loop.
pub trait Host {
    /// Block until the next vertical blank.
    fn wait_vblank(&mut self);

    /// Monotonic time since startup. Stamps events and drives timers.
    fn now(&self) -> Duration;

    /// Read the keypad, touch screen, and lid once.
    fn sample_input(&mut self) -> Result<RawInput, SampleError>;

    /// Take the key transitions the on-screen keyboard produced since the
    /// last tick.
    fn drain_keys(&mut self) -> Vec<KeyTransition>;

    /// Enter sleep mode. Blocks until the console wakes.
    fn suspend(&mut self);

    /// Power off. The loop stops after this returns.
    fn shutdown(&mut self);
}

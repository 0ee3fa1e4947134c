//! Frame Sampler
//!
//! Double-buffered input state and the per-tick state machine that feeds the
//! event loop. One raw reading is taken per vertical blank; every derived
//! flag (pressed/held/released, touch start/active/end) compares the two
//! buffers and is never stored.

use serde::{Deserialize, Serialize};

use crate::buttons::ButtonSet;
use crate::touch::{TouchPoint, TouchTransition};

/// One raw hardware reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawInput {
    pub buttons: ButtonSet,
    /// Current touch sample, `None` while the screen is untouched.
    pub touch: Option<TouchPoint>,
    /// True while the lid is closed.
    pub lid_closed: bool,
}

/// A failed hardware reading. Fatal to the tick it occurred in, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("keypad read failed: {0}")]
    Keypad(String),
    #[error("touch controller read failed: {0}")]
    Touch(String),
}

/// The two most recent raw readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    previous: RawInput,
    current: RawInput,
}

impl InputState {
    /// Rotate in a new reading.
    pub fn advance(&mut self, sample: RawInput) {
        self.previous = self.current;
        self.current = sample;
    }

    pub fn current(&self) -> RawInput {
        self.current
    }

    /// Buttons that went down this tick.
    pub fn pressed(&self) -> ButtonSet {
        self.current.buttons.minus(self.previous.buttons)
    }

    /// Buttons currently down.
    pub fn held(&self) -> ButtonSet {
        self.current.buttons
    }

    /// Buttons that went up this tick.
    pub fn released(&self) -> ButtonSet {
        self.previous.buttons.minus(self.current.buttons)
    }

    pub fn touch(&self) -> TouchTransition {
        TouchTransition::derive(self.previous.touch, self.current.touch)
    }

    pub fn touch_active(&self) -> bool {
        self.current.touch.is_some()
    }

    /// Current touch position; both coordinates are NaN while untouched.
    pub fn touch_position(&self) -> (f64, f64) {
        match self.current.touch {
            Some(point) => (point.x as f64, point.y as f64),
            None => (f64::NAN, f64::NAN),
        }
    }

    pub fn lid_closed_edge(&self) -> bool {
        self.current.lid_closed && !self.previous.lid_closed
    }

    pub fn lid_opened_edge(&self) -> bool {
        !self.current.lid_closed && self.previous.lid_closed
    }
}

/// Everything the event loop needs to synthesize one tick's input events.
#[derive(Debug, Clone, Copy)]
pub struct FrameDiff {
    pub pressed: ButtonSet,
    pub held: ButtonSet,
    pub released: ButtonSet,
    pub touch: TouchTransition,
    pub lid_closed: bool,
    pub lid_opened: bool,
}

/// Sampler state, advanced once per vertical blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerPhase {
    /// Between ticks.
    #[default]
    Idle,
    /// Reading hardware.
    Sampling,
    /// Computing edge transitions.
    Diffing,
    /// Tick produced a diff; events are being synthesized.
    Dispatching,
    /// Halted by an uncancelled `sleep` until the host resumes.
    Suspended,
}

/// The per-frame input sampler.
#[derive(Debug, Default)]
pub struct FrameSampler {
    state: InputState,
    phase: SamplerPhase,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SamplerPhase {
        self.phase
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Run one tick against a hardware reading.
    ///
    /// A failed reading is logged and skipped; the buffers are left alone so
    /// the next tick diffs against the last good sample. Returns `None` when
    /// suspended or when the reading failed.
    pub fn tick(&mut self, sample: Result<RawInput, SampleError>) -> Option<FrameDiff> {
        if self.phase == SamplerPhase::Suspended {
            return None;
        }
        self.phase = SamplerPhase::Sampling;
        let sample = match sample {
            Ok(sample) => sample,
            Err(err) => {
                tracing::warn!(%err, "input sample failed, skipping tick");
                self.phase = SamplerPhase::Idle;
                return None;
            }
        };

        self.phase = SamplerPhase::Diffing;
        self.state.advance(sample);
        let diff = FrameDiff {
            pressed: self.state.pressed(),
            held: self.state.held(),
            released: self.state.released(),
            touch: self.state.touch(),
            lid_closed: self.state.lid_closed_edge(),
            lid_opened: self.state.lid_opened_edge(),
        };

        self.phase = SamplerPhase::Dispatching;
        Some(diff)
    }

    /// Return to `Idle` once the tick's events have been synthesized.
    pub fn end_tick(&mut self) {
        if self.phase == SamplerPhase::Dispatching {
            self.phase = SamplerPhase::Idle;
        }
    }

    /// Halt ticking for an uncancelled `sleep`.
    pub fn suspend(&mut self) {
        self.phase = SamplerPhase::Suspended;
    }

    /// Resume ticking after the host wakes.
    pub fn resume(&mut self) {
        if self.phase == SamplerPhase::Suspended {
            self.phase = SamplerPhase::Idle;
        }
    }
}

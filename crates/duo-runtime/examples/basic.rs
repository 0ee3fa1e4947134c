//! Example: Basic usage of the Duo runtime
//!
//! Drives the event loop with a desktop stand-in host that replays a short
//! burst of simulated input, the way a console shell would after loading a
//! script.

use duo_runtime::{
    Button, Event, EventPayload, Host, KeyTransition, RawInput, Runtime, SampleError, TouchPoint,
    types,
};
use std::rc::Rc;
use std::time::Duration;

/// Desktop stand-in for the console: a canned input recording on a 60 Hz
/// clock.
struct DemoHost {
    frames: Vec<RawInput>,
    cursor: usize,
    ticks: u64,
}

impl DemoHost {
    fn new(frames: Vec<RawInput>) -> Self {
        Self {
            frames,
            cursor: 0,
            ticks: 0,
        }
    }
}

impl Host for DemoHost {
    fn wait_vblank(&mut self) {
        self.ticks += 1;
    }

    fn now(&self) -> Duration {
        Duration::from_micros(self.ticks * 16_667)
    }

    fn sample_input(&mut self) -> Result<RawInput, SampleError> {
        let frame = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        Ok(frame)
    }

    fn drain_keys(&mut self) -> Vec<KeyTransition> {
        Vec::new()
    }

    fn suspend(&mut self) {
        println!("(host) entering sleep mode");
    }

    fn shutdown(&mut self) {
        println!("(host) powering off");
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let pressed = |button: Button| RawInput {
        buttons: [button].into_iter().collect(),
        ..RawInput::default()
    };
    let touched = |x, y| RawInput {
        touch: Some(TouchPoint::new(x, y)),
        ..RawInput::default()
    };

    let host = DemoHost::new(vec![
        RawInput::default(),
        pressed(Button::A),
        RawInput::default(),
        touched(120, 80),
        touched(124, 78),
        RawInput::default(),
    ]);
    let mut runtime = Runtime::new(host);

    // What a loaded script would have registered.
    runtime.scope().add_event_listener(
        types::BUTTON_DOWN,
        Some(Rc::new(|event: &Event| {
            if let EventPayload::Button { button } = event.payload() {
                println!("[{:.3}s] button {button} pressed", event.time_stamp());
            }
            Ok(())
        })),
        false,
    );
    runtime.scope().add_event_listener(
        types::TOUCH_MOVE,
        Some(Rc::new(|event: &Event| {
            if let EventPayload::Touch { x, y, dx, dy } = event.payload() {
                println!("stylus at ({x}, {y}), moved ({dx}, {dy})");
            }
            Ok(())
        })),
        false,
    );

    let timers = runtime.timers();
    timers.set_timeout(
        Rc::new(|| {
            println!("one-shot timer fired");
            Ok(())
        }),
        50,
    );

    // Stop sampling once the recording is exhausted.
    let scope = runtime.scope().clone();
    timers.set_timeout(
        Rc::new(move || {
            scope.target().clear_listeners();
            Ok(())
        }),
        120,
    );

    runtime.run();
    println!("no work left, runtime exited");
    Ok(())
}

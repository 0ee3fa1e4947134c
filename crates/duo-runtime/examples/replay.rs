//! Example: Replaying a recorded input stream
//!
//! Input samples derive serde traits, so a capture taken on hardware can be
//! replayed against the runtime off-device. The recording here is inline
//! JSON; a real harness would read it from a file.

use duo_runtime::{Event, EventPayload, Host, KeyTransition, RawInput, Runtime, SampleError, types};
use std::rc::Rc;
use std::time::Duration;

const RECORDING: &str = r#"[
    {"buttons": 0, "touch": null, "lid_closed": false},
    {"buttons": 1, "touch": null, "lid_closed": false},
    {"buttons": 1, "touch": null, "lid_closed": false},
    {"buttons": 0, "touch": null, "lid_closed": false},
    {"buttons": 0, "touch": {"x": 96, "y": 64}, "lid_closed": false},
    {"buttons": 0, "touch": null, "lid_closed": false}
]"#;

struct RecordedHost {
    frames: Vec<RawInput>,
    cursor: usize,
    ticks: u64,
}

impl Host for RecordedHost {
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

    fn suspend(&mut self) {}

    fn shutdown(&mut self) {}
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let frames: Vec<RawInput> = serde_json::from_str(RECORDING)?;
    let frame_count = frames.len();
    let host = RecordedHost {
        frames,
        cursor: 0,
        ticks: 0,
    };
    let mut runtime = Runtime::new(host);

    for ty in [
        types::BUTTON_DOWN,
        types::BUTTON_UP,
        types::TOUCH_START,
        types::TOUCH_END,
    ] {
        runtime.scope().add_event_listener(
            ty,
            Some(Rc::new(|event: &Event| {
                match event.payload() {
                    EventPayload::Button { button } => {
                        println!("{}: {button}", event.event_type())
                    }
                    EventPayload::Touch { x, y, .. } => {
                        println!("{}: ({x}, {y})", event.event_type())
                    }
                    _ => {}
                }
                Ok(())
            })),
            false,
        );
    }

    for _ in 0..frame_count {
        runtime.step();
    }
    Ok(())
}

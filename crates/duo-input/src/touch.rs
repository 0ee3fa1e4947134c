//! Touch Screen
//!
//! Raw touch points and the per-tick transition derived from consecutive
//! samples. Position reads as NaN while the screen is untouched.

use serde::{Deserialize, Serialize};

/// One raw touch sample, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

impl TouchPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What the touch screen did between two consecutive samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchTransition {
    /// Untouched on both ticks.
    #[default]
    Inactive,
    /// Touch began this tick.
    Started { x: f64, y: f64 },
    /// Touch continued and the position changed.
    Moved { x: f64, y: f64, dx: f64, dy: f64 },
    /// Touch continued without moving.
    Held { x: f64, y: f64 },
    /// Touch ended this tick; position is the last active sample.
    Ended { x: f64, y: f64 },
}

impl TouchTransition {
    /// Derive the transition from the previous and current samples.
    pub fn derive(previous: Option<TouchPoint>, current: Option<TouchPoint>) -> Self {
        match (previous, current) {
            (None, None) => TouchTransition::Inactive,
            (None, Some(point)) => TouchTransition::Started {
                x: point.x as f64,
                y: point.y as f64,
            },
            (Some(prev), Some(point)) if prev != point => TouchTransition::Moved {
                x: point.x as f64,
                y: point.y as f64,
                dx: (point.x - prev.x) as f64,
                dy: (point.y - prev.y) as f64,
            },
            (Some(_), Some(point)) => TouchTransition::Held {
                x: point.x as f64,
                y: point.y as f64,
            },
            (Some(prev), None) => TouchTransition::Ended {
                x: prev.x as f64,
                y: prev.y as f64,
            },
        }
    }

    /// True only on the tick where the screen went from untouched to touched.
    pub fn started(self) -> bool {
        matches!(self, TouchTransition::Started { .. })
    }

    /// True only on the tick where the screen went from touched to untouched.
    pub fn ended(self) -> bool {
        matches!(self, TouchTransition::Ended { .. })
    }
}

//! Gesture detection
//!
//! Turns raw accelerometer samples and pointer-down events into
//! [`InteractionEvent`]s. Shakes and single taps toggle recording, a double
//! tap resets the application.

mod detector;
mod shake;
mod tap;

pub use detector::{GestureConfig, GestureDetector};
pub use shake::ShakeDetector;
pub use tap::TapClassifier;

use serde::{Deserialize, Serialize};

/// Raw accelerometer sample (acceleration including gravity)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    SingleTap,
    DoubleTap,
    Shake,
}

/// What an interaction asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Toggle recording
    Trigger,
    /// Abort everything and restart
    Reset,
}

/// Classified interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub kind: InteractionKind,
    pub timestamp_ms: u64,
}

impl InteractionEvent {
    pub fn new(kind: InteractionKind, timestamp_ms: u64) -> Self {
        Self { kind, timestamp_ms }
    }

    pub fn signal(&self) -> Signal {
        match self.kind {
            InteractionKind::SingleTap | InteractionKind::Shake => Signal::Trigger,
            InteractionKind::DoubleTap => Signal::Reset,
        }
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::DeviceError;

/// Fire-and-forget haptic feedback
///
/// Implementations must not block and must swallow their own failures.
pub trait Haptics: Send + Sync {
    fn vibrate(&self, duration: Duration);
}

/// Decoded audio ready for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// A playback in progress
pub trait Playback: Send + Sync {
    /// Stop playback and rewind
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Audio output device
#[async_trait::async_trait]
pub trait AudioSink: Send + Sync {
    /// Start playing a clip
    async fn play(&self, clip: AudioClip) -> Result<Box<dyn Playback>, DeviceError>;
}

/// Opens navigation targets
pub trait UrlOpener: Send + Sync {
    /// Navigate the current context to `url` (native scheme redirect)
    fn open_in_place(&self, url: &str);

    /// Open `url` in a new context
    fn open_new_context(&self, url: &str);
}

/// Which visual the camera area shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraView {
    Live,
    Fallback,
}

/// UI affordances
pub trait UiHooks: Send + Sync {
    fn set_recording_indicator(&self, recording: bool);

    fn set_camera_view(&self, view: CameraView);

    /// Show the startup error panel with its reload action
    fn show_startup_error(&self, message: &str);

    /// Spoken or logged feedback for per-session failures
    fn announce(&self, message: &str);
}

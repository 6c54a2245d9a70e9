use base64::Engine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::devices::{AudioClip, AudioSink, Playback};
use crate::error::PipelineError;

const DEFAULT_MIME: &str = "audio/mpeg";

/// Decode a base64 payload, optionally wrapped in a `data:` URL
pub fn decode_clip(payload: &str) -> Result<AudioClip, base64::DecodeError> {
    let payload = payload.trim();

    let (mime_type, data) = match payload
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime, data)) if !mime.is_empty() => (mime.to_string(), data),
        Some((_, data)) => (DEFAULT_MIME.to_string(), data),
        None => (DEFAULT_MIME.to_string(), payload),
    };

    let bytes = base64::engine::general_purpose::STANDARD.decode(data)?;
    Ok(AudioClip { bytes, mime_type })
}

/// Plays response audio, at most one clip at a time
///
/// Once `alive` is cleared no new clip starts. Teardown clears the flag
/// before calling [`ResponsePlayer::stop`], so a clip either starts before
/// the stop and gets stopped, or sees the flag and never starts.
pub struct ResponsePlayer {
    sink: Arc<dyn AudioSink>,
    current: Mutex<Option<Box<dyn Playback>>>,
    alive: Arc<AtomicBool>,
}

impl ResponsePlayer {
    pub fn new(sink: Arc<dyn AudioSink>, alive: Arc<AtomicBool>) -> Self {
        Self {
            sink,
            current: Mutex::new(None),
            alive,
        }
    }

    /// Decode and play, stopping whatever is playing first
    ///
    /// Returns `false` without touching the sink when the owning instance
    /// has been torn down.
    pub async fn play(&self, audio_base64: &str) -> Result<bool, PipelineError> {
        let clip = decode_clip(audio_base64)?;

        let mut current = self.current.lock().await;
        if !self.alive.load(Ordering::SeqCst) {
            info!("Application was reset, not playing response audio");
            return Ok(false);
        }
        if let Some(mut previous) = current.take() {
            if previous.is_active() {
                debug!("Stopping previous playback");
                previous.stop();
            }
        }

        info!("Playing response audio ({} bytes)", clip.bytes.len());
        let playback = self.sink.play(clip).await.map_err(PipelineError::Playback)?;
        *current = Some(playback);

        Ok(true)
    }

    /// Stop the active playback, if any
    pub async fn stop(&self) {
        if let Some(mut playback) = self.current.lock().await.take() {
            playback.stop();
            info!("Playback stopped");
        }
    }
}

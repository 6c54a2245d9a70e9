use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::audio::{encode_wav, AudioFrame};
use crate::devices::FrameGrabber;
use crate::error::PipelineError;

/// What to do when the camera frame cannot be grabbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrameFailurePolicy {
    /// Abort the request and tell the user
    #[default]
    Abort,
    /// Send the audio with an empty image
    Proceed,
}

/// Audio and image of one completed session
#[derive(Debug, Clone)]
pub struct CaptureBundle {
    /// WAV-encoded recording
    pub audio: Vec<u8>,
    /// JPEG frame, empty if the grab failed under `Proceed`
    pub image: Vec<u8>,
}

impl CaptureBundle {
    /// Encode the recording and grab the current frame
    pub async fn assemble(
        frames: &[AudioFrame],
        camera: &dyn FrameGrabber,
        policy: FrameFailurePolicy,
    ) -> Result<Self, PipelineError> {
        let audio = encode_wav(frames)?;

        let image = match camera.grab_frame().await {
            Ok(image) => image,
            Err(e) => match policy {
                FrameFailurePolicy::Abort => return Err(PipelineError::FrameCapture(e)),
                FrameFailurePolicy::Proceed => {
                    warn!("Frame capture failed, sending without image: {}", e);
                    Vec::new()
                }
            },
        };

        Ok(Self { audio, image })
    }
}

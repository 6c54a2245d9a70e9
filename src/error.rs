use thiserror::Error;

use crate::devices::Capability;

/// Failure reported by a device collaborator
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("access not allowed: {0}")]
    NotAllowed(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("device not found: {0}")]
    NotFound(String),

    #[error("stream unavailable: {0}")]
    Unavailable(String),

    #[error("device I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Failure that prevents the application from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("permission for {0} was denied")]
    PermissionDenied(Capability),

    #[error("failed to resolve current position: {0}")]
    Geolocation(DeviceError),
}

const STARTUP_PREFIX: &str = "An error occurred while starting the app. ";

impl StartupError {
    /// Message rendered in the error panel, next to the reload action
    pub fn user_message(&self) -> String {
        let suffix = match self {
            StartupError::PermissionDenied(_)
            | StartupError::Geolocation(DeviceError::NotAllowed(_)) => {
                "Please grant the necessary permissions and reload the page."
            }
            StartupError::Geolocation(DeviceError::NotSupported(_)) => {
                "Your device may not support all required features. Please try using a different device or browser."
            }
            StartupError::Geolocation(DeviceError::NotFound(_)) => {
                "Required hardware (camera or microphone) not found. Please check your device settings."
            }
            StartupError::Geolocation(_) => {
                "Please check your device settings and try again. If the problem persists, try reloading the page."
            }
        };
        format!("{}{}", STARTUP_PREFIX, suffix)
    }
}

/// Failure of a single capture round trip
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("frame capture failed: {0}")]
    FrameCapture(DeviceError),

    #[error("failed to encode recording: {0}")]
    Encode(#[from] hound::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned status {status}")]
    Status { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response does not contain audio data")]
    MissingAudio,

    #[error("failed to decode audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("playback failed: {0}")]
    Playback(DeviceError),
}

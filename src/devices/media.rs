use crate::audio::AudioBackend;
use crate::error::DeviceError;

/// Source of fresh microphone handles
#[async_trait::async_trait]
pub trait Microphone: Send + Sync {
    /// Acquire a new, not yet started, capture handle
    async fn acquire(&self) -> Result<Box<dyn AudioBackend>, DeviceError>;
}

/// Live camera feed that can produce still frames
#[async_trait::async_trait]
pub trait FrameGrabber: Send + Sync {
    /// Open the video stream
    async fn open(&self) -> Result<(), DeviceError>;

    /// Grab the current frame as JPEG bytes
    async fn grab_frame(&self) -> Result<Vec<u8>, DeviceError>;

    /// Stop the video stream and release the device
    async fn release(&self);
}

/// Accelerometer availability
///
/// Samples themselves are delivered to the controller as input events.
pub trait MotionSource: Send + Sync {
    fn is_supported(&self) -> bool;
}

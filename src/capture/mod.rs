//! Capture-and-dispatch pipeline
//!
//! Runs once per finalized recording: encode the audio, grab a camera frame,
//! POST both to the backend and route the validated response to the player
//! and the navigation dispatcher.

mod bundle;
mod client;
mod pipeline;

pub use bundle::{CaptureBundle, FrameFailurePolicy};
pub use client::{BackendClient, BackendConfig, ResponseBody, ResponseIntent, ServerResponse};
pub use pipeline::{CaptureConfig, CapturePipeline, PipelineOutcome};

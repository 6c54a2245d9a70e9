pub mod app;
pub mod audio;
pub mod capture;
pub mod config;
pub mod devices;
pub mod error;
pub mod gesture;
pub mod http;
pub mod recording;
pub mod response;

pub use app::{AppPhase, Collaborators, ControlEvent, RunOutcome, StatusSnapshot};
pub use audio::{AudioBackend, AudioBackendConfig, AudioFile, AudioFrame};
pub use capture::{BackendClient, CaptureBundle, CapturePipeline, PipelineOutcome};
pub use config::Config;
pub use error::{DeviceError, PipelineError, StartupError};
pub use gesture::{GestureDetector, GestureSample, InteractionEvent, InteractionKind};
pub use http::{create_router, AppState};
pub use recording::{RecordingManager, RecordingState};
pub use response::{NavigationDispatcher, Platform, ResponsePlayer};

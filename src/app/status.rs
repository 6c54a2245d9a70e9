use serde::{Deserialize, Serialize};

use crate::devices::CameraView;
use crate::recording::RecordingState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppPhase {
    #[default]
    Starting,
    Running,
    /// Waiting for an explicit reload
    StartupFailed,
    Stopped,
}

/// Observable application state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusSnapshot {
    /// Incremented on every (re)start
    pub instance: u64,
    pub phase: AppPhase,
    pub recording: RecordingState,
    pub description: String,
    pub active_session: Option<u64>,
    pub completed_sessions: u64,
    pub pipelines_in_flight: usize,
    pub responses_rendered: u64,
    pub camera_view: Option<CameraView>,
    pub motion_enabled: bool,
    pub startup_error: Option<String>,
}

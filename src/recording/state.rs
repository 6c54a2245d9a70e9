use serde::{Deserialize, Serialize};

/// Recording lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    /// No session, ready for a trigger
    #[default]
    Idle,
    /// Microphone open, fragments being buffered
    Recording,
    /// Microphone released, waiting for the buffered data to flush
    Finalizing,
}

impl RecordingState {
    /// Returns a human-readable description of the state
    pub fn description(&self) -> &'static str {
        match self {
            RecordingState::Idle => "Waiting for a gesture",
            RecordingState::Recording => "Recording",
            RecordingState::Finalizing => "Finishing recording",
        }
    }

    /// Whether a trigger has any effect in this state
    pub fn accepts_trigger(&self) -> bool {
        !matches!(self, RecordingState::Finalizing)
    }
}

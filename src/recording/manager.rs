use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::session::{FinalizedRecording, RecordingSession};
use super::state::RecordingState;
use crate::audio::{AudioBackend, AudioFrame};
use crate::devices::{Microphone, UiHooks};

/// Result of a toggle request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new session started recording
    Started { session_id: u64 },
    /// The active session is now finalizing
    Stopping { session_id: u64 },
    /// Nothing changed (finalizing)
    Ignored,
    /// The microphone could not be opened; still idle
    Failed,
}

/// Owns the recording lifecycle
///
/// At most one session is ever outside `Idle`. Completed buffers arrive on the
/// `completions` channel and must be passed back through [`complete`], which
/// accepts each session's buffer exactly once.
///
/// [`complete`]: RecordingManager::complete
pub struct RecordingManager {
    microphone: Arc<dyn Microphone>,
    ui: Arc<dyn UiHooks>,
    completions: mpsc::UnboundedSender<FinalizedRecording>,
    active: Option<RecordingSession>,
    stale_handle: Option<Box<dyn AudioBackend>>,
    last_session_id: u64,
    completed_sessions: u64,
}

impl RecordingManager {
    pub fn new(
        microphone: Arc<dyn Microphone>,
        ui: Arc<dyn UiHooks>,
        completions: mpsc::UnboundedSender<FinalizedRecording>,
    ) -> Self {
        Self {
            microphone,
            ui,
            completions,
            active: None,
            stale_handle: None,
            last_session_id: 0,
            completed_sessions: 0,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.active
            .as_ref()
            .map(|s| s.state())
            .unwrap_or(RecordingState::Idle)
    }

    /// Id of the session outside `Idle`, if any
    pub fn active_session_id(&self) -> Option<u64> {
        self.active.as_ref().map(|s| s.id())
    }

    /// Number of sessions whose buffer was handed off
    pub fn completed_sessions(&self) -> u64 {
        self.completed_sessions
    }

    /// Start or stop recording depending on the current state
    pub async fn toggle(&mut self) -> ToggleOutcome {
        let state = self.state();
        if !state.accepts_trigger() {
            debug!("Trigger ignored while {}", state.description().to_lowercase());
            return ToggleOutcome::Ignored;
        }

        if state == RecordingState::Recording {
            self.stop().await
        } else {
            self.start().await
        }
    }

    async fn start(&mut self) -> ToggleOutcome {
        if let Some(mut stale) = self.stale_handle.take() {
            warn!("Releasing stale microphone handle ({})", stale.name());
            if let Err(e) = stale.stop().await {
                warn!("Stale handle could not be stopped: {}", e);
            }
        }

        let backend = match self.microphone.acquire().await {
            Ok(backend) => backend,
            Err(e) => {
                error!("Error starting recording: {}", e);
                self.ui.announce("I couldn't access the microphone. Please try again.");
                return ToggleOutcome::Failed;
            }
        };

        let session_id = self.last_session_id + 1;
        match RecordingSession::start(session_id, backend).await {
            Ok(session) => {
                self.last_session_id = session_id;
                self.active = Some(session);
                self.ui.set_recording_indicator(true);
                ToggleOutcome::Started { session_id }
            }
            Err(e) => {
                error!("Error starting recording: {}", e);
                self.ui.announce("I couldn't start recording. Please try again.");
                ToggleOutcome::Failed
            }
        }
    }

    async fn stop(&mut self) -> ToggleOutcome {
        let Some(session) = self.active.as_mut() else {
            return ToggleOutcome::Ignored;
        };

        if let Some(stale) = session.release_microphone().await {
            self.stale_handle = Some(stale);
        }
        self.ui.set_recording_indicator(false);

        session.finalize(self.completions.clone());
        info!("Recording session {} stopping", session.id());

        ToggleOutcome::Stopping {
            session_id: session.id(),
        }
    }

    /// Accept a finalized buffer
    ///
    /// Returns the fragments only for the session currently finalizing; stale
    /// or duplicate completions yield `None`.
    pub fn complete(&mut self, finalized: FinalizedRecording) -> Option<Vec<AudioFrame>> {
        match &self.active {
            Some(session)
                if session.id() == finalized.session_id
                    && session.state() == RecordingState::Finalizing =>
            {
                self.active = None;
                self.completed_sessions += 1;
                Some(finalized.frames)
            }
            _ => {
                debug!("Ignoring completion for session {}", finalized.session_id);
                None
            }
        }
    }

    /// Discard any session without handing off its buffer
    pub async fn reset(&mut self) {
        if let Some(session) = self.active.take() {
            let was_recording = session.state() == RecordingState::Recording;
            session.abort().await;
            if was_recording {
                self.ui.set_recording_indicator(false);
            }
        }

        if let Some(mut stale) = self.stale_handle.take() {
            if let Err(e) = stale.stop().await {
                warn!("Stale handle could not be stopped: {}", e);
            }
        }
    }
}

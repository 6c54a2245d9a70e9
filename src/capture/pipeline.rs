use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use super::bundle::{CaptureBundle, FrameFailurePolicy};
use super::client::{BackendClient, ResponseIntent};
use crate::audio::AudioFrame;
use crate::devices::{FrameGrabber, UiHooks};
use crate::error::PipelineError;
use crate::response::{NavigationDispatcher, ResponsePlayer};

const FRAME_FAILURE_MESSAGE: &str = "I'm sorry, but I couldn't capture an image. Please try again.";
const REQUEST_FAILURE_MESSAGE: &str =
    "I'm sorry, but there was an error processing your request. Please try again.";

/// Capture settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub frame_failure_policy: FrameFailurePolicy,
}

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Response audio played
    Played,
    /// Response audio played and navigation dispatched
    Navigated { location: String },
    /// The application was reset meanwhile; nothing rendered
    Discarded,
}

/// One capture round trip per finalized recording
pub struct CapturePipeline {
    camera: Arc<dyn FrameGrabber>,
    client: BackendClient,
    player: Arc<ResponsePlayer>,
    navigator: Arc<NavigationDispatcher>,
    ui: Arc<dyn UiHooks>,
    frame_policy: FrameFailurePolicy,
    alive: Arc<AtomicBool>,
}

impl CapturePipeline {
    pub fn new(
        camera: Arc<dyn FrameGrabber>,
        client: BackendClient,
        player: Arc<ResponsePlayer>,
        navigator: Arc<NavigationDispatcher>,
        ui: Arc<dyn UiHooks>,
        config: &CaptureConfig,
        alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            camera,
            client,
            player,
            navigator,
            ui,
            frame_policy: config.frame_failure_policy,
            alive,
        }
    }

    /// Run the round trip, reporting failures to the user
    ///
    /// Failures never escape: they are logged and announced, and the caller
    /// only sees the outcome.
    pub async fn process(&self, session_id: u64, frames: Vec<AudioFrame>) -> Option<PipelineOutcome> {
        match self.run(frames).await {
            Ok(outcome) => {
                info!("Session {} round trip complete: {:?}", session_id, outcome);
                Some(outcome)
            }
            Err(e) => {
                error!("Error processing session {}: {}", session_id, e);
                if self.is_alive() {
                    let message = match e {
                        PipelineError::FrameCapture(_) => FRAME_FAILURE_MESSAGE,
                        _ => REQUEST_FAILURE_MESSAGE,
                    };
                    self.ui.announce(message);
                }
                None
            }
        }
    }

    pub async fn run(&self, frames: Vec<AudioFrame>) -> Result<PipelineOutcome, PipelineError> {
        let bundle = CaptureBundle::assemble(&frames, self.camera.as_ref(), self.frame_policy).await?;
        drop(frames);

        let response = self.client.submit(bundle).await?;

        if !self.is_alive() {
            info!("Application was reset, discarding response");
            return Ok(PipelineOutcome::Discarded);
        }

        if let Some(text) = &response.text {
            info!("Backend response: {}", text);
        }

        if !self.player.play(&response.audio).await? {
            return Ok(PipelineOutcome::Discarded);
        }

        match response.intent {
            ResponseIntent::Navigate { location } => {
                self.navigator.navigate(&location).await;
                Ok(PipelineOutcome::Navigated { location })
            }
            ResponseIntent::Search | ResponseIntent::Speak => Ok(PipelineOutcome::Played),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

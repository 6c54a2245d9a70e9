use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::collaborators::Collaborators;
use super::startup::StartupReport;
use super::status::{AppPhase, StatusSnapshot};
use crate::capture::{BackendClient, CapturePipeline, PipelineOutcome};
use crate::config::Config;
use crate::devices::{CameraView, FrameGrabber};
use crate::gesture::{GestureDetector, GestureSample, InteractionEvent, Signal};
use crate::recording::{FinalizedRecording, RecordingManager};
use crate::response::{NavigationDispatcher, ResponsePlayer};

/// Input delivered to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Accelerometer sample
    Motion(GestureSample),
    /// Touch or mouse press
    PointerDown { timestamp_ms: u64 },
    /// Restart the application (reload affordance)
    Reload,
    Shutdown,
}

/// Why an application instance ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Restart,
    Shutdown,
}

/// One application instance
///
/// Owns all mutable per-instance state and processes events strictly in
/// arrival order.
pub struct Controller {
    instance: u64,
    detector: GestureDetector,
    recordings: RecordingManager,
    completions: mpsc::UnboundedReceiver<FinalizedRecording>,
    pipeline: Arc<CapturePipeline>,
    pipelines: JoinSet<Option<PipelineOutcome>>,
    player: Arc<ResponsePlayer>,
    camera: Arc<dyn FrameGrabber>,
    camera_view: CameraView,
    alive: Arc<AtomicBool>,
    responses_rendered: u64,
    status: watch::Sender<StatusSnapshot>,
}

impl Controller {
    pub fn new(
        instance: u64,
        config: &Config,
        collaborators: &Collaborators,
        report: StartupReport,
        status: watch::Sender<StatusSnapshot>,
    ) -> Result<Self> {
        let alive = Arc::new(AtomicBool::new(true));

        let mut detector = GestureDetector::new(&config.gesture, collaborators.haptics.clone());
        if !report.motion_enabled {
            detector.disable_motion();
        }

        let (completions_tx, completions) = mpsc::unbounded_channel();
        let recordings = RecordingManager::new(
            collaborators.microphone.clone(),
            collaborators.ui.clone(),
            completions_tx,
        );

        let player = Arc::new(ResponsePlayer::new(collaborators.sink.clone(), alive.clone()));
        let navigator = Arc::new(NavigationDispatcher::new(
            config.navigation.resolve_platform(),
            collaborators.geolocator.clone(),
            collaborators.opener.clone(),
            alive.clone(),
        ));
        let client = BackendClient::new(&config.backend).context("Failed to create backend client")?;

        let pipeline = Arc::new(CapturePipeline::new(
            collaborators.camera.clone(),
            client,
            player.clone(),
            navigator,
            collaborators.ui.clone(),
            &config.capture,
            alive.clone(),
        ));

        Ok(Self {
            instance,
            detector,
            recordings,
            completions,
            pipeline,
            pipelines: JoinSet::new(),
            player,
            camera: collaborators.camera.clone(),
            camera_view: report.camera_view,
            alive,
            responses_rendered: 0,
            status,
        })
    }

    /// Process events until a reset, reload or shutdown
    pub async fn run(mut self, events: &mut mpsc::Receiver<ControlEvent>) -> RunOutcome {
        info!("Application instance {} running", self.instance);
        self.publish_status();

        let outcome = loop {
            tokio::select! {
                event = events.recv() => {
                    let outcome = match event {
                        Some(ControlEvent::Motion(sample)) => match self.detector.on_motion(sample) {
                            Some(interaction) => self.on_interaction(interaction).await,
                            None => None,
                        },
                        Some(ControlEvent::PointerDown { timestamp_ms }) => {
                            match self.detector.on_pointer_down(timestamp_ms) {
                                Some(interaction) => self.on_interaction(interaction).await,
                                None => None,
                            }
                        }
                        Some(ControlEvent::Reload) => Some(RunOutcome::Restart),
                        Some(ControlEvent::Shutdown) | None => Some(RunOutcome::Shutdown),
                    };
                    if let Some(outcome) = outcome {
                        break outcome;
                    }
                }
                Some(finalized) = self.completions.recv() => self.on_finalized(finalized),
                Some(joined) = self.pipelines.join_next() => match joined {
                    Ok(Some(PipelineOutcome::Discarded)) | Ok(None) => {}
                    Ok(Some(_)) => self.responses_rendered += 1,
                    Err(e) => error!("Pipeline task failed: {}", e),
                },
            }
            self.publish_status();
        };

        self.teardown().await;
        outcome
    }

    async fn on_interaction(&mut self, interaction: InteractionEvent) -> Option<RunOutcome> {
        match interaction.signal() {
            Signal::Trigger => {
                let outcome = self.recordings.toggle().await;
                debug!("{:?} -> {:?}", interaction.kind, outcome);
                None
            }
            Signal::Reset => {
                info!("App reset due to double tap");
                Some(RunOutcome::Restart)
            }
        }
    }

    fn on_finalized(&mut self, finalized: FinalizedRecording) {
        let session_id = finalized.session_id;
        let Some(frames) = self.recordings.complete(finalized) else {
            return;
        };

        let pipeline = self.pipeline.clone();
        self.pipelines
            .spawn(async move { pipeline.process(session_id, frames).await });
    }

    /// Stop playback, discard recording, release devices
    ///
    /// In-flight round trips are detached rather than aborted; the cleared
    /// `alive` flag keeps them from rendering anything.
    async fn teardown(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
        self.player.stop().await;
        self.recordings.reset().await;
        self.camera.release().await;
        self.pipelines.detach_all();

        self.status.send_modify(|s| {
            s.phase = AppPhase::Stopped;
            s.pipelines_in_flight = 0;
        });
        info!("Application instance {} stopped", self.instance);
    }

    fn publish_status(&self) {
        let state = self.recordings.state();
        self.status.send_replace(StatusSnapshot {
            instance: self.instance,
            phase: AppPhase::Running,
            recording: state,
            description: state.description().to_string(),
            active_session: self.recordings.active_session_id(),
            completed_sessions: self.recordings.completed_sessions(),
            pipelines_in_flight: self.pipelines.len(),
            responses_rendered: self.responses_rendered,
            camera_view: Some(self.camera_view),
            motion_enabled: self.detector.motion_enabled(),
            startup_error: None,
        });
    }
}

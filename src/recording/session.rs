use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::RecordingState;
use crate::audio::{AudioBackend, AudioFrame};

/// How long a stopped handle may take to flush before the buffer is sealed
const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Buffered audio of a session that finished finalizing
#[derive(Debug)]
pub struct FinalizedRecording {
    pub session_id: u64,
    pub frames: Vec<AudioFrame>,
}

/// One recording lifecycle
///
/// The fragment buffer lives inside the collector task, so each session owns
/// its own buffer.
pub struct RecordingSession {
    id: u64,
    state: RecordingState,
    started_at: DateTime<Utc>,
    backend: Option<Box<dyn AudioBackend>>,
    collector: Option<JoinHandle<Vec<AudioFrame>>>,
    seal_tx: Option<oneshot::Sender<()>>,
    finalizer: Option<JoinHandle<()>>,
}

impl RecordingSession {
    /// Start capturing on a freshly acquired handle
    ///
    /// On failure the handle is stopped and dropped before returning.
    pub async fn start(id: u64, mut backend: Box<dyn AudioBackend>) -> Result<Self> {
        let audio_rx = match backend.start().await {
            Ok(rx) => rx,
            Err(e) => {
                if let Err(stop_err) = backend.stop().await {
                    warn!("Failed to release microphone after start failure: {}", stop_err);
                }
                return Err(e);
            }
        };

        let (seal_tx, seal_rx) = oneshot::channel();
        let collector = tokio::spawn(collect_frames(audio_rx, seal_rx));

        info!("Recording session {} started on {}", id, backend.name());

        Ok(Self {
            id,
            state: RecordingState::Recording,
            started_at: Utc::now(),
            backend: Some(backend),
            collector: Some(collector),
            seal_tx: Some(seal_tx),
            finalizer: None,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Stop and drop the microphone handle
    ///
    /// Returns the handle back if stopping failed, so the caller can retry
    /// releasing it later.
    pub async fn release_microphone(&mut self) -> Option<Box<dyn AudioBackend>> {
        let mut backend = self.backend.take()?;
        match backend.stop().await {
            Ok(()) => {
                debug!("Microphone released for session {}", self.id);
                None
            }
            Err(e) => {
                error!("Failed to stop microphone for session {}: {}", self.id, e);
                Some(backend)
            }
        }
    }

    /// Enter `Finalizing` and hand the buffer to `completions` once flushed
    pub fn finalize(&mut self, completions: mpsc::UnboundedSender<FinalizedRecording>) {
        let (Some(mut collector), Some(seal_tx)) = (self.collector.take(), self.seal_tx.take())
        else {
            return;
        };

        self.state = RecordingState::Finalizing;
        let session_id = self.id;
        let started_at = self.started_at;

        self.finalizer = Some(tokio::spawn(async move {
            let joined = match tokio::time::timeout(FLUSH_TIMEOUT, &mut collector).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!("Session {} did not flush in time, sealing buffer", session_id);
                    let _ = seal_tx.send(());
                    collector.await
                }
            };

            let frames = match joined {
                Ok(frames) => frames,
                Err(e) => {
                    error!("Collector for session {} failed: {}", session_id, e);
                    Vec::new()
                }
            };

            let audio_ms: u64 = frames.iter().map(AudioFrame::duration_ms).sum();
            info!(
                "Session {} finalized with {} fragments ({}ms of audio, started {})",
                session_id,
                frames.len(),
                audio_ms,
                started_at.format("%H:%M:%S")
            );

            if completions
                .send(FinalizedRecording { session_id, frames })
                .is_err()
            {
                debug!("Controller gone, dropping session {}", session_id);
            }
        }));
    }

    /// Tear down without handing anything off
    pub async fn abort(mut self) {
        if let Some(mut backend) = self.backend.take() {
            if let Err(e) = backend.stop().await {
                warn!("Failed to stop microphone while aborting session {}: {}", self.id, e);
            }
        }
        if let Some(finalizer) = self.finalizer.take() {
            finalizer.abort();
        }
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
        info!("Recording session {} discarded", self.id);
    }
}

async fn collect_frames(
    mut audio_rx: mpsc::Receiver<AudioFrame>,
    mut seal_rx: oneshot::Receiver<()>,
) -> Vec<AudioFrame> {
    let mut frames = Vec::new();

    loop {
        tokio::select! {
            frame = audio_rx.recv() => match frame {
                Some(frame) => frames.push(frame),
                None => break,
            },
            _ = &mut seal_rx => {
                while let Ok(frame) = audio_rx.try_recv() {
                    frames.push(frame);
                }
                break;
            }
        }
    }

    frames
}

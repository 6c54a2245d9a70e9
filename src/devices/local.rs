//! File- and log-backed collaborators for headless runs

use anyhow::{bail, Result};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    AudioClip, AudioSink, Capability, CameraView, FrameGrabber, Geolocator, Haptics, Microphone,
    MotionSource, PermissionProvider, PermissionState, Playback, Position, UiHooks, UrlOpener,
};
use crate::audio::{AudioBackend, AudioBackendConfig, AudioFile, AudioFrame};
use crate::error::DeviceError;

// MARK: - Microphone

/// Microphone that replays a WAV file in real time
pub struct WavMicrophone {
    path: PathBuf,
    config: AudioBackendConfig,
}

impl WavMicrophone {
    pub fn new(path: impl Into<PathBuf>, config: AudioBackendConfig) -> Self {
        Self {
            path: path.into(),
            config,
        }
    }
}

#[async_trait::async_trait]
impl Microphone for WavMicrophone {
    async fn acquire(&self) -> Result<Box<dyn AudioBackend>, DeviceError> {
        if !self.path.exists() {
            return Err(DeviceError::NotFound(format!(
                "microphone source {}",
                self.path.display()
            )));
        }

        let mut file =
            AudioFile::open(&self.path).map_err(|e| DeviceError::Other(e.to_string()))?;
        if self.config.target_channels == 1 && file.channels > 1 {
            file = file.to_mono();
        }
        let frames = file.frames(self.config.buffer_duration_ms);
        if frames.is_empty() {
            return Err(DeviceError::Unavailable(format!(
                "microphone source {} has no samples",
                self.path.display()
            )));
        }

        Ok(Box::new(WavCapture {
            frames,
            frame_interval: Duration::from_millis(self.config.buffer_duration_ms.max(1)),
            stop_tx: None,
            task: None,
        }))
    }
}

/// Capture handle produced by [`WavMicrophone`]
struct WavCapture {
    frames: Vec<AudioFrame>,
    frame_interval: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

#[async_trait::async_trait]
impl AudioBackend for WavCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.task.is_some() {
            bail!("Already capturing");
        }

        let (tx, rx) = mpsc::channel(100);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let frames = self.frames.clone();
        let frame_interval = self.frame_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(frame_interval);
            let frame_ms = frame_interval.as_millis() as u64;

            // Loops over the file until stopped
            for (sequence, frame) in frames.iter().cycle().enumerate() {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let mut frame = frame.clone();
                        frame.timestamp_ms = sequence as u64 * frame_ms;
                        if tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("WAV capture task stopped");
        });

        self.stop_tx = Some(stop_tx);
        self.task = Some(task);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await?;
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.task.is_some()
    }

    fn name(&self) -> &str {
        "WAV file microphone"
    }
}

// MARK: - Camera

/// Camera that serves a JPEG from disk as its current frame
pub struct FileCamera {
    path: PathBuf,
    open: AtomicBool,
}

impl FileCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl FrameGrabber for FileCamera {
    async fn open(&self) -> Result<(), DeviceError> {
        if !self.path.exists() {
            return Err(DeviceError::NotFound(format!("camera source {}", self.path.display())));
        }
        self.open.store(true, Ordering::SeqCst);
        info!("Camera stream opened from {}", self.path.display());
        Ok(())
    }

    async fn grab_frame(&self) -> Result<Vec<u8>, DeviceError> {
        if !self.open.load(Ordering::SeqCst) {
            return Err(DeviceError::Unavailable("video stream is not available".into()));
        }

        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.is_empty() {
            return Err(DeviceError::Unavailable("captured frame is empty".into()));
        }
        Ok(bytes)
    }

    async fn release(&self) {
        if self.open.swap(false, Ordering::SeqCst) {
            info!("Camera stream released");
        }
    }
}

// MARK: - Location, motion, permissions

/// Geolocator with a configured position (or none)
pub struct FixedGeolocator {
    position: Option<Position>,
}

impl FixedGeolocator {
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

#[async_trait::async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position, DeviceError> {
        self.position
            .ok_or_else(|| DeviceError::Unavailable("position unavailable".into()))
    }
}

pub struct StaticMotion(pub bool);

impl MotionSource for StaticMotion {
    fn is_supported(&self) -> bool {
        self.0
    }
}

/// Permission answers taken from configuration
pub struct ConfiguredPermissions {
    api_available: bool,
    denied: HashSet<Capability>,
}

impl ConfiguredPermissions {
    pub fn new(api_available: bool, denied: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            api_available,
            denied: denied.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl PermissionProvider for ConfiguredPermissions {
    async fn query(&self, capability: Capability) -> Option<PermissionState> {
        if !self.api_available {
            return None;
        }
        if self.denied.contains(&capability) {
            Some(PermissionState::Denied)
        } else {
            Some(PermissionState::Granted)
        }
    }
}

// MARK: - Output

pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn vibrate(&self, duration: Duration) {
        debug!("Haptic pulse: {}ms", duration.as_millis());
    }
}

/// Rough MP3 byte rate (128 kbit/s) for clips without duration metadata
const FALLBACK_BYTES_PER_SEC: f64 = 16_000.0;

/// Audio sink that spools every clip to disk
///
/// A playback stays active for the clip's decoded duration.
pub struct SpoolAudioSink {
    dir: PathBuf,
}

impl SpoolAudioSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl AudioSink for SpoolAudioSink {
    async fn play(&self, clip: AudioClip) -> Result<Box<dyn Playback>, DeviceError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!("response-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, &clip.bytes).await?;

        let duration = clip_duration(&clip).unwrap_or_else(|| {
            warn!("Could not read clip duration, estimating from size");
            Duration::from_secs_f64(clip.bytes.len() as f64 / FALLBACK_BYTES_PER_SEC)
        });

        info!(
            "Playing {} ({} bytes, {:.1}s)",
            path.display(),
            clip.bytes.len(),
            duration.as_secs_f64()
        );

        let task = tokio::spawn(tokio::time::sleep(duration));
        Ok(Box::new(SpoolPlayback { task }))
    }
}

fn clip_duration(clip: &AudioClip) -> Option<Duration> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(clip.bytes.clone())), Default::default());
    let mut hint = Hint::new();
    hint.mime_type(&clip.mime_type);

    let detected = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .ok()?;

    let track = detected.format.default_track()?;
    let time_base = track.codec_params.time_base?;
    let n_frames = track.codec_params.n_frames?;
    let time = time_base.calc_time(n_frames);

    Some(Duration::from_secs_f64(time.seconds as f64 + time.frac))
}

struct SpoolPlayback {
    task: JoinHandle<()>,
}

impl Playback for SpoolPlayback {
    fn stop(&mut self) {
        self.task.abort();
    }

    fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

pub struct LogUrlOpener;

impl UrlOpener for LogUrlOpener {
    fn open_in_place(&self, url: &str) {
        info!("Navigating to {}", url);
    }

    fn open_new_context(&self, url: &str) {
        info!("Opening {} in a new context", url);
    }
}

/// UI hooks rendered as log lines
pub struct TracingUi;

impl UiHooks for TracingUi {
    fn set_recording_indicator(&self, recording: bool) {
        info!("Recording indicator: {}", if recording { "on" } else { "off" });
    }

    fn set_camera_view(&self, view: CameraView) {
        info!("Camera view: {:?}", view);
    }

    fn show_startup_error(&self, message: &str) {
        warn!("{} [reload: POST /app/reload]", message);
    }

    fn announce(&self, message: &str) {
        info!("Announcement: {}", message);
    }
}

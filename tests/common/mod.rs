// Shared test doubles for the integration tests
//
// Scripted device collaborators plus a mock interpretation backend served by
// axum on an ephemeral port.

#![allow(dead_code)]

use anyhow::{bail, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use eyesfree::app::Collaborators;
use eyesfree::audio::{AudioBackend, AudioFrame};
use eyesfree::devices::local::StaticMotion;
use eyesfree::devices::{
    AudioClip, AudioSink, CameraView, Capability, FrameGrabber, Geolocator, Haptics, Microphone,
    PermissionProvider, PermissionState, Playback, Position, UiHooks, UrlOpener,
};
use eyesfree::error::DeviceError;
use eyesfree::response::OpenTarget;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

pub const FRAMES_PER_SESSION: usize = 3;

pub const CENTRAL_PARK: Position = Position {
    latitude: 40.7812,
    longitude: -73.9665,
};

fn frame(marker: i16, index: usize) -> AudioFrame {
    AudioFrame {
        samples: vec![marker; 160],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: index as u64 * 10,
    }
}

// ============================================================================
// Microphone
// ============================================================================

/// Hands out handles whose fragments are filled with the acquisition number
#[derive(Default)]
pub struct ScriptedMicrophone {
    pub acquired: AtomicUsize,
    pub open_handles: Arc<AtomicUsize>,
    pub stop_calls: Arc<AtomicUsize>,
    pub fail_acquire: AtomicBool,
    /// The next handle's first stop fails
    pub fail_next_stop: AtomicBool,
}

impl ScriptedMicrophone {
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Microphone for ScriptedMicrophone {
    async fn acquire(&self) -> Result<Box<dyn AudioBackend>, DeviceError> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(DeviceError::NotAllowed("microphone".to_string()));
        }
        let marker = self.acquired.fetch_add(1, Ordering::SeqCst) as i16 + 1;

        Ok(Box::new(ScriptedBackend {
            marker,
            tx: None,
            open_handles: self.open_handles.clone(),
            stop_calls: self.stop_calls.clone(),
            fail_stop: self.fail_next_stop.swap(false, Ordering::SeqCst),
        }))
    }
}

/// Emits a few fragments on start and one final flush fragment on stop
pub struct ScriptedBackend {
    marker: i16,
    tx: Option<mpsc::Sender<AudioFrame>>,
    open_handles: Arc<AtomicUsize>,
    stop_calls: Arc<AtomicUsize>,
    fail_stop: bool,
}

#[async_trait::async_trait]
impl AudioBackend for ScriptedBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        let (tx, rx) = mpsc::channel(32);
        for i in 0..FRAMES_PER_SESSION - 1 {
            tx.send(frame(self.marker, i)).await?;
        }
        self.tx = Some(tx);
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            self.fail_stop = false;
            bail!("device busy");
        }
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(frame(self.marker, FRAMES_PER_SESSION - 1)).await;
            self.open_handles.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ============================================================================
// Camera, location, permissions, haptics
// ============================================================================

#[derive(Default)]
pub struct MockCamera {
    pub fail_open: AtomicBool,
    pub fail_grab: AtomicBool,
    pub grabs: AtomicUsize,
    pub releases: AtomicUsize,
}

#[async_trait::async_trait]
impl FrameGrabber for MockCamera {
    async fn open(&self) -> Result<(), DeviceError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(DeviceError::NotFound("camera".to_string()));
        }
        Ok(())
    }

    async fn grab_frame(&self) -> Result<Vec<u8>, DeviceError> {
        self.grabs.fetch_add(1, Ordering::SeqCst);
        if self.fail_grab.load(Ordering::SeqCst) {
            return Err(DeviceError::Unavailable("no frame".to_string()));
        }
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    async fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct MockGeolocator(pub Option<Position>);

#[async_trait::async_trait]
impl Geolocator for MockGeolocator {
    async fn current_position(&self) -> Result<Position, DeviceError> {
        self.0
            .ok_or_else(|| DeviceError::Unavailable("position unavailable".to_string()))
    }
}

/// Geolocator on a platform without location support
pub struct UnsupportedGeolocator;

#[async_trait::async_trait]
impl Geolocator for UnsupportedGeolocator {
    async fn current_position(&self) -> Result<Position, DeviceError> {
        Err(DeviceError::NotSupported("geolocation".to_string()))
    }
}

#[derive(Default)]
pub struct MockPermissions {
    pub denied: Option<Capability>,
}

#[async_trait::async_trait]
impl PermissionProvider for MockPermissions {
    async fn query(&self, capability: Capability) -> Option<PermissionState> {
        if self.denied == Some(capability) {
            Some(PermissionState::Denied)
        } else {
            Some(PermissionState::Granted)
        }
    }
}

#[derive(Default)]
pub struct CountingHaptics {
    pub pulses: AtomicUsize,
}

impl Haptics for CountingHaptics {
    fn vibrate(&self, _duration: Duration) {
        self.pulses.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Output
// ============================================================================

/// Records every clip it is asked to play
#[derive(Default)]
pub struct RecordingSink {
    pub clips: Mutex<Vec<AudioClip>>,
    pub active: Mutex<Vec<Arc<AtomicBool>>>,
}

impl RecordingSink {
    pub fn played(&self) -> usize {
        self.clips.lock().unwrap().len()
    }

    pub fn any_active(&self) -> bool {
        self.active
            .lock()
            .unwrap()
            .iter()
            .any(|a| a.load(Ordering::SeqCst))
    }
}

#[async_trait::async_trait]
impl AudioSink for RecordingSink {
    async fn play(&self, clip: AudioClip) -> Result<Box<dyn Playback>, DeviceError> {
        let active = Arc::new(AtomicBool::new(true));
        self.clips.lock().unwrap().push(clip);
        self.active.lock().unwrap().push(active.clone());
        Ok(Box::new(MockPlayback { active }))
    }
}

pub struct MockPlayback {
    active: Arc<AtomicBool>,
}

impl Playback for MockPlayback {
    fn stop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedUrl {
    pub at: Instant,
    pub url: String,
    pub target: OpenTarget,
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<OpenedUrl>>,
}

impl RecordingOpener {
    pub fn urls(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|o| o.url.clone())
            .collect()
    }

    fn record(&self, url: &str, target: OpenTarget) {
        self.opened.lock().unwrap().push(OpenedUrl {
            at: Instant::now(),
            url: url.to_string(),
            target,
        });
    }
}

impl UrlOpener for RecordingOpener {
    fn open_in_place(&self, url: &str) {
        self.record(url, OpenTarget::InPlace);
    }

    fn open_new_context(&self, url: &str) {
        self.record(url, OpenTarget::NewContext);
    }
}

#[derive(Default)]
pub struct RecordingUi {
    pub indicator: Mutex<Vec<bool>>,
    pub camera_views: Mutex<Vec<CameraView>>,
    pub startup_errors: Mutex<Vec<String>>,
    pub announcements: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn announcements(&self) -> Vec<String> {
        self.announcements.lock().unwrap().clone()
    }
}

impl UiHooks for RecordingUi {
    fn set_recording_indicator(&self, recording: bool) {
        self.indicator.lock().unwrap().push(recording);
    }

    fn set_camera_view(&self, view: CameraView) {
        self.camera_views.lock().unwrap().push(view);
    }

    fn show_startup_error(&self, message: &str) {
        self.startup_errors.lock().unwrap().push(message.to_string());
    }

    fn announce(&self, message: &str) {
        self.announcements.lock().unwrap().push(message.to_string());
    }
}

// ============================================================================
// Collaborator bundle
// ============================================================================

/// Concrete handles on every mock, plus the trait-object bundle
pub struct Mocks {
    pub permissions: Arc<MockPermissions>,
    pub microphone: Arc<ScriptedMicrophone>,
    pub camera: Arc<MockCamera>,
    pub haptics: Arc<CountingHaptics>,
    pub sink: Arc<RecordingSink>,
    pub opener: Arc<RecordingOpener>,
    pub ui: Arc<RecordingUi>,
    pub geolocator: Arc<dyn Geolocator>,
    pub motion_supported: bool,
}

impl Mocks {
    pub fn new() -> Self {
        Self {
            permissions: Arc::new(MockPermissions::default()),
            microphone: Arc::new(ScriptedMicrophone::default()),
            camera: Arc::new(MockCamera::default()),
            haptics: Arc::new(CountingHaptics::default()),
            sink: Arc::new(RecordingSink::default()),
            opener: Arc::new(RecordingOpener::default()),
            ui: Arc::new(RecordingUi::default()),
            geolocator: Arc::new(MockGeolocator(Some(CENTRAL_PARK))),
            motion_supported: true,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            permissions: self.permissions.clone(),
            microphone: self.microphone.clone(),
            camera: self.camera.clone(),
            geolocator: self.geolocator.clone(),
            motion: Arc::new(StaticMotion(self.motion_supported)),
            haptics: self.haptics.clone(),
            sink: self.sink.clone(),
            opener: self.opener.clone(),
            ui: self.ui.clone(),
        }
    }
}

// ============================================================================
// Mock interpretation backend
// ============================================================================

/// One request as seen by the mock backend
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Clone)]
enum Reply {
    Json(serde_json::Value),
    Text(&'static str),
}

#[derive(Clone)]
struct BackendState {
    status: StatusCode,
    reply: Reply,
    delay: Duration,
    requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

pub struct MockBackend {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockBackend {
    pub async fn start(status: StatusCode, body: serde_json::Value) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    /// Serve `body` with `status` after `delay` for every request
    pub async fn start_with_delay(
        status: StatusCode,
        body: serde_json::Value,
        delay: Duration,
    ) -> Self {
        Self::serve(status, Reply::Json(body), delay).await
    }

    /// Serve a body that is not JSON
    pub async fn start_text(status: StatusCode, body: &'static str) -> Self {
        Self::serve(status, Reply::Text(body), Duration::ZERO).await
    }

    async fn serve(status: StatusCode, reply: Reply, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = BackendState {
            status,
            reply,
            delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/process_audio_and_image", post(process))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn process(
    State(state): State<BackendState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state
        .requests
        .lock()
        .unwrap()
        .push(ReceivedRequest { content_type, body });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    match state.reply {
        Reply::Json(body) => (state.status, Json(body)).into_response(),
        Reply::Text(body) => (state.status, body).into_response(),
    }
}

/// Base64 of "Hello, World!"
pub const SPOKEN_AUDIO: &str = "SGVsbG8sIFdvcmxkIQ==";

pub fn spoken_response() -> serde_json::Value {
    serde_json::json!({
        "audio": SPOKEN_AUDIO,
        "response": "There is a door in front of you",
        "is_navigation": false,
    })
}

pub fn navigation_response(location: &str) -> serde_json::Value {
    serde_json::json!({
        "audio": SPOKEN_AUDIO,
        "response": format!("Navigating to {}", location),
        "is_navigation": true,
        "location": location,
    })
}

use std::sync::Arc;

use crate::audio::AudioBackendConfig;
use crate::config::Config;
use crate::devices::local::{
    ConfiguredPermissions, FileCamera, FixedGeolocator, LogHaptics, LogUrlOpener, SpoolAudioSink,
    StaticMotion, TracingUi, WavMicrophone,
};
use crate::devices::{
    AudioSink, FrameGrabber, Geolocator, Haptics, Microphone, MotionSource, PermissionProvider,
    UiHooks, UrlOpener,
};

/// Every platform collaborator the application talks to
#[derive(Clone)]
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionProvider>,
    pub microphone: Arc<dyn Microphone>,
    pub camera: Arc<dyn FrameGrabber>,
    pub geolocator: Arc<dyn Geolocator>,
    pub motion: Arc<dyn MotionSource>,
    pub haptics: Arc<dyn Haptics>,
    pub sink: Arc<dyn AudioSink>,
    pub opener: Arc<dyn UrlOpener>,
    pub ui: Arc<dyn UiHooks>,
}

impl Collaborators {
    /// File- and log-backed collaborators for headless runs
    pub fn local(config: &Config) -> Self {
        let devices = &config.devices;
        let audio_config = AudioBackendConfig {
            buffer_duration_ms: devices.frame_ms,
            ..Default::default()
        };

        Self {
            permissions: Arc::new(ConfiguredPermissions::new(
                config.permissions.api_available,
                config.permissions.denied.iter().copied(),
            )),
            microphone: Arc::new(WavMicrophone::new(&devices.microphone_wav, audio_config)),
            camera: Arc::new(FileCamera::new(&devices.camera_image)),
            geolocator: Arc::new(FixedGeolocator::new(devices.position())),
            motion: Arc::new(StaticMotion(devices.motion_supported)),
            haptics: Arc::new(LogHaptics),
            sink: Arc::new(SpoolAudioSink::new(&devices.spool_dir)),
            opener: Arc::new(LogUrlOpener),
            ui: Arc::new(TracingUi),
        }
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::{BackendConfig, CaptureConfig};
use crate::devices::{Capability, Position};
use crate::gesture::GestureConfig;
use crate::response::NavigationConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub http: HttpConfig,
    pub backend: BackendConfig,
    pub gesture: GestureConfig,
    pub capture: CaptureConfig,
    pub navigation: NavigationConfig,
    pub devices: DevicesConfig,
    pub permissions: PermissionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "eyesfree".to_string(),
        }
    }
}

/// Local control API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Sources for the file-backed device collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// WAV file replayed as the microphone
    pub microphone_wav: PathBuf,
    /// JPEG served as the camera frame
    pub camera_image: PathBuf,
    /// Where response clips are spooled
    pub spool_dir: PathBuf,
    /// Microphone fragment length
    pub frame_ms: u64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub motion_supported: bool,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            microphone_wav: PathBuf::from("fixtures/microphone.wav"),
            camera_image: PathBuf::from("fixtures/camera.jpg"),
            spool_dir: PathBuf::from("spool"),
            frame_ms: 100,
            latitude: None,
            longitude: None,
            motion_supported: true,
        }
    }
}

impl DevicesConfig {
    pub fn position(&self) -> Option<Position> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Whether the platform exposes a permission query API
    pub api_available: bool,
    /// Capabilities the user denied
    pub denied: Vec<Capability>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            api_available: true,
            denied: Vec::new(),
        }
    }
}

impl Config {
    /// Load from a config file (optional) and `EYESFREE__` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("EYESFREE").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FrameFailurePolicy;
    use crate::response::Platform;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let cfg = Config::load("/nonexistent/eyesfree").unwrap();
        assert_eq!(cfg.service.name, "eyesfree");
        assert_eq!(cfg.gesture.shake_threshold, 15.0);
        assert_eq!(cfg.gesture.min_tap_gap_ms, 50);
        assert_eq!(cfg.gesture.max_tap_gap_ms, 300);
        assert_eq!(cfg.capture.frame_failure_policy, FrameFailurePolicy::Abort);
        assert!(cfg.devices.position().is_none());
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("eyesfree.toml");
        std::fs::write(
            &path,
            r#"
[backend]
base_url = "http://backend.test:8000"

[gesture]
shake_threshold = 20.0

[capture]
frame_failure_policy = "proceed"

[navigation]
platform = "ios"

[devices]
latitude = 51.5
longitude = -0.12

[permissions]
denied = ["camera"]
"#,
        )
        .unwrap();

        let cfg = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.backend.base_url, "http://backend.test:8000");
        assert_eq!(cfg.backend.timeout_secs, 60);
        assert_eq!(cfg.gesture.shake_threshold, 20.0);
        assert_eq!(cfg.gesture.max_tap_gap_ms, 300);
        assert_eq!(cfg.capture.frame_failure_policy, FrameFailurePolicy::Proceed);
        assert_eq!(cfg.navigation.resolve_platform(), Platform::Ios);
        assert_eq!(
            cfg.devices.position(),
            Some(Position {
                latitude: 51.5,
                longitude: -0.12
            })
        );
        assert_eq!(cfg.permissions.denied, vec![Capability::Camera]);
    }
}

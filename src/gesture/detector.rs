use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::shake::{ShakeDetector, DEFAULT_SHAKE_THRESHOLD};
use super::tap::{TapClassifier, DEFAULT_MAX_TAP_GAP_MS, DEFAULT_MIN_TAP_GAP_MS};
use super::{GestureSample, InteractionEvent};
use crate::devices::Haptics;

/// Gesture tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Combined-axis acceleration delta that counts as a shake
    pub shake_threshold: f64,
    /// Taps closer than this are treated as bounce
    pub min_tap_gap_ms: u64,
    /// Taps closer than this (and above the minimum) form a double tap
    pub max_tap_gap_ms: u64,
    /// Haptic pulse length on every tap
    pub haptic_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            shake_threshold: DEFAULT_SHAKE_THRESHOLD,
            min_tap_gap_ms: DEFAULT_MIN_TAP_GAP_MS,
            max_tap_gap_ms: DEFAULT_MAX_TAP_GAP_MS,
            haptic_ms: 50,
        }
    }
}

/// Combined shake and tap detector
pub struct GestureDetector {
    shake: ShakeDetector,
    taps: TapClassifier,
    haptics: Arc<dyn Haptics>,
    haptic_pulse: Duration,
    motion_enabled: bool,
}

impl GestureDetector {
    pub fn new(config: &GestureConfig, haptics: Arc<dyn Haptics>) -> Self {
        Self {
            shake: ShakeDetector::new(config.shake_threshold),
            taps: TapClassifier::new(config.min_tap_gap_ms, config.max_tap_gap_ms),
            haptics,
            haptic_pulse: Duration::from_millis(config.haptic_ms),
            motion_enabled: true,
        }
    }

    /// Ignore motion samples from now on (device reports no motion support)
    pub fn disable_motion(&mut self) {
        self.motion_enabled = false;
    }

    pub fn motion_enabled(&self) -> bool {
        self.motion_enabled
    }

    pub fn on_motion(&mut self, sample: GestureSample) -> Option<InteractionEvent> {
        if !self.motion_enabled {
            return None;
        }
        let event = self.shake.on_sample(sample);
        if let Some(event) = &event {
            debug!(
                "Shake detected at {}ms (threshold {})",
                event.timestamp_ms,
                self.shake.threshold()
            );
            self.haptics.vibrate(self.haptic_pulse);
        }
        event
    }

    /// Classify a pointer-down (touch or mouse) and pulse the haptics
    pub fn on_pointer_down(&mut self, timestamp_ms: u64) -> Option<InteractionEvent> {
        let event = self.taps.on_pointer_down(timestamp_ms);
        self.haptics.vibrate(self.haptic_pulse);

        match &event {
            Some(event) => debug!("Tap classified as {:?}", event.kind),
            None => debug!("Tap absorbed (count={})", self.taps.tap_count()),
        }
        event
    }
}

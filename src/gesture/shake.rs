use super::{GestureSample, InteractionEvent, InteractionKind};

/// Default combined-axis delta that counts as a shake
pub const DEFAULT_SHAKE_THRESHOLD: f64 = 15.0;

/// Coarse high-pass filter on the summed acceleration of consecutive samples
#[derive(Debug, Clone)]
pub struct ShakeDetector {
    threshold: f64,
    last: (f64, f64, f64),
}

impl ShakeDetector {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last: (0.0, 0.0, 0.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one sample; returns a `Shake` event if the delta exceeds the threshold
    pub fn on_sample(&mut self, sample: GestureSample) -> Option<InteractionEvent> {
        let (last_x, last_y, last_z) = self.last;
        let delta = (sample.x + sample.y + sample.z - last_x - last_y - last_z).abs();

        self.last = (sample.x, sample.y, sample.z);

        (delta > self.threshold)
            .then(|| InteractionEvent::new(InteractionKind::Shake, sample.timestamp_ms))
    }
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SHAKE_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, z: f64, timestamp_ms: u64) -> GestureSample {
        GestureSample { x, y, z, timestamp_ms }
    }

    #[test]
    fn test_resting_device_does_not_trigger() {
        let mut detector = ShakeDetector::default();
        // Gravity alone, first sample compared against zero
        assert!(detector.on_sample(sample(0.0, 0.0, 9.81, 0)).is_none());
        for t in 1..50 {
            assert!(detector.on_sample(sample(0.1, -0.1, 9.81, t * 16)).is_none());
        }
    }

    #[test]
    fn test_delta_above_threshold_triggers() {
        let mut detector = ShakeDetector::default();
        detector.on_sample(sample(0.0, 0.0, 9.8, 0));

        let event = detector.on_sample(sample(10.0, 8.0, 9.8, 16)).unwrap();
        assert_eq!(event.kind, InteractionKind::Shake);
        assert_eq!(event.timestamp_ms, 16);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut detector = ShakeDetector::new(15.0);
        detector.on_sample(sample(0.0, 0.0, 0.0, 0));
        assert!(detector.on_sample(sample(15.0, 0.0, 0.0, 1)).is_none());
        assert!(detector.on_sample(sample(30.5, 0.0, 0.0, 2)).is_some());
    }

    #[test]
    fn test_delta_uses_signed_axis_sum() {
        let mut detector = ShakeDetector::default();
        detector.on_sample(sample(20.0, -20.0, 0.0, 0));
        // Large per-axis change but the sums match
        assert!(detector.on_sample(sample(-20.0, 20.0, 0.0, 1)).is_none());
        // Negative direction counts too
        assert!(detector.on_sample(sample(-10.0, -10.0, 0.0, 2)).is_some());
    }

    #[test]
    fn test_last_sample_updates_after_trigger() {
        let mut detector = ShakeDetector::default();
        assert!(detector.on_sample(sample(20.0, 0.0, 0.0, 0)).is_some());
        // Same reading again: no delta
        assert!(detector.on_sample(sample(20.0, 0.0, 0.0, 1)).is_none());
    }
}

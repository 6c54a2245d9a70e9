use std::collections::VecDeque;

use super::{InteractionEvent, InteractionKind};

pub const DEFAULT_MIN_TAP_GAP_MS: u64 = 50;
pub const DEFAULT_MAX_TAP_GAP_MS: u64 = 300;

/// Single/double tap disambiguation over pointer-down timestamps
///
/// Every tap arms a timer that clears the tap counter `max_gap_ms` later.
/// Timers are evaluated lazily: pending deadlines that have passed by the time
/// of the next tap clear the counter before that tap is classified.
#[derive(Debug, Clone)]
pub struct TapClassifier {
    min_gap_ms: u64,
    max_gap_ms: u64,
    last_tap_ms: Option<u64>,
    tap_count: u32,
    pending_clears: VecDeque<u64>,
}

impl TapClassifier {
    pub fn new(min_gap_ms: u64, max_gap_ms: u64) -> Self {
        Self {
            min_gap_ms,
            max_gap_ms,
            last_tap_ms: None,
            tap_count: 0,
            pending_clears: VecDeque::new(),
        }
    }

    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    /// Classify one pointer-down
    ///
    /// Returns `SingleTap` for a tap outside the double-tap window,
    /// `DoubleTap` for the second tap inside it, and `None` for an in-window
    /// tap that only advances the counter. A timestamp older than the
    /// previous tap is treated as simultaneous with it.
    pub fn on_pointer_down(&mut self, now_ms: u64) -> Option<InteractionEvent> {
        let now_ms = self.last_tap_ms.map_or(now_ms, |last| now_ms.max(last));
        self.fire_expired_timers(now_ms);

        let in_window = self.last_tap_ms.is_some_and(|last| {
            let tap_length = now_ms.saturating_sub(last);
            tap_length > self.min_gap_ms && tap_length < self.max_gap_ms
        });

        let event = if in_window {
            self.tap_count += 1;
            if self.tap_count == 2 {
                self.tap_count = 0;
                Some(InteractionEvent::new(InteractionKind::DoubleTap, now_ms))
            } else {
                None
            }
        } else {
            self.tap_count = 1;
            Some(InteractionEvent::new(InteractionKind::SingleTap, now_ms))
        };

        self.last_tap_ms = Some(now_ms);
        // Deadlines stay sorted because `now_ms` never decreases
        self.pending_clears
            .push_back(now_ms.saturating_add(self.max_gap_ms));

        event
    }

    /// Apply clear-timers whose deadline has passed
    pub fn fire_expired_timers(&mut self, now_ms: u64) {
        while let Some(&deadline) = self.pending_clears.front() {
            if deadline > now_ms {
                break;
            }
            self.pending_clears.pop_front();
            self.tap_count = 0;
        }
    }
}

impl Default for TapClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TAP_GAP_MS, DEFAULT_MAX_TAP_GAP_MS)
    }
}

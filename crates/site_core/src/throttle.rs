//! Frame-rate sampling of scroll events.
//!
//! The first scroll event after a frame schedules exactly one frame callback;
//! later events in the same frame are dropped. The callback samples the scroll
//! position when it runs, so a burst collapses to the latest position.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollState {
    pub offset_top: f64,
    pub is_throttle_pending: bool,
}

#[derive(Debug, Default)]
pub struct ScrollThrottle {
    state: ScrollState,
    ticks: u64,
}

impl ScrollThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw scroll event. Returns `true` when the caller must
    /// schedule a frame for it.
    pub fn on_scroll(&mut self) -> bool {
        if self.state.is_throttle_pending {
            return false;
        }
        self.state.is_throttle_pending = true;
        true
    }

    /// Frame callback. Returns the sampled offset if a scroll tick was
    /// pending, `None` otherwise.
    pub fn on_frame(&mut self, sampled_offset: Option<f64>) -> Option<f64> {
        if !self.state.is_throttle_pending {
            return None;
        }
        self.state.is_throttle_pending = false;
        let offset = sampled_offset?;
        self.state.offset_top = offset;
        self.ticks += 1;
        Some(offset)
    }

    /// Forgets a scheduled frame whose callback will never run.
    pub fn reset_pending(&mut self) {
        self.state.is_throttle_pending = false;
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn offset_top(&self) -> f64 {
        self.state.offset_top
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_throttle_pending
    }

    /// Number of recomputes performed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

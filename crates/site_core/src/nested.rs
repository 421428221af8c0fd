//! Wheel delegation for the scrollable About panel.
//!
//! The page container uses mandatory scroll-snap, so once the panel reaches
//! its end a downward wheel would otherwise go nowhere. At the bottom the
//! wheel is handed to the page, which advances one viewport. At the top an
//! upward wheel is left alone.

use shared::domain::{NestedScrollState, ScrollBehavior};

use crate::host::ScrollRegion;

pub const DEFAULT_BOTTOM_TOLERANCE: f64 = 10.0;
pub const DEFAULT_STEP: f64 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl PanelMetrics {
    pub fn read(region: &dyn ScrollRegion) -> Self {
        Self {
            scroll_top: region.scroll_top(),
            scroll_height: region.scroll_height(),
            client_height: region.client_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// Native nested scrolling proceeds.
    Native,
    /// Upward wheel at the top: nothing moves and nothing is delegated.
    HeldAtTop,
    /// Native scrolling was suppressed and the page advanced by `distance`.
    Delegated { distance: f64 },
}

impl WheelOutcome {
    pub fn prevent_default(self) -> bool {
        matches!(self, Self::Delegated { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepAction {
    Rewound,
    Advanced(f64),
}

#[derive(Debug, Clone)]
pub struct NestedScroll {
    state: NestedScrollState,
    bottom_tolerance: f64,
    step: f64,
}

impl Default for NestedScroll {
    fn default() -> Self {
        Self::new(DEFAULT_BOTTOM_TOLERANCE, DEFAULT_STEP)
    }
}

impl NestedScroll {
    pub fn new(bottom_tolerance: f64, step: f64) -> Self {
        Self {
            state: NestedScrollState::default(),
            bottom_tolerance,
            step,
        }
    }

    pub fn state(&self) -> NestedScrollState {
        self.state
    }

    pub fn is_at_bottom(&self, metrics: PanelMetrics) -> bool {
        metrics.scroll_height - metrics.scroll_top <= metrics.client_height + self.bottom_tolerance
    }

    pub fn is_at_top(&self, metrics: PanelMetrics) -> bool {
        metrics.scroll_top <= 0.0
    }

    /// Refreshes the boundary flags. Returns `true` if anything changed.
    pub fn observe(&mut self, metrics: PanelMetrics) -> bool {
        let next = NestedScrollState {
            scroll_top: metrics.scroll_top,
            at_top: self.is_at_top(metrics),
            at_bottom: self.is_at_bottom(metrics),
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Handles one wheel event on the panel. `parent` is the page container;
    /// without it the wheel stays native.
    pub fn on_wheel(
        &mut self,
        delta_y: f64,
        metrics: PanelMetrics,
        parent: Option<&mut dyn ScrollRegion>,
    ) -> WheelOutcome {
        self.observe(metrics);

        if delta_y < 0.0 && self.state.at_top {
            return WheelOutcome::HeldAtTop;
        }

        if delta_y > 0.0 && self.state.at_bottom {
            if let Some(parent) = parent {
                let distance = parent.client_height();
                parent.scroll_by(distance, ScrollBehavior::Smooth);
                return WheelOutcome::Delegated { distance };
            }
        }

        WheelOutcome::Native
    }

    /// Discrete advance/rewind for click or tap input.
    pub fn step(&mut self, panel: &mut dyn ScrollRegion) -> StepAction {
        let metrics = PanelMetrics::read(panel);
        self.observe(metrics);
        if self.state.at_bottom {
            panel.scroll_to(0.0, ScrollBehavior::Smooth);
            StepAction::Rewound
        } else {
            panel.scroll_by(self.step, ScrollBehavior::Smooth);
            StepAction::Advanced(self.step)
        }
    }

    pub fn reset(&mut self, panel: &mut dyn ScrollRegion) {
        panel.scroll_to(0.0, ScrollBehavior::Auto);
        self.state = NestedScrollState::default();
        self.observe(PanelMetrics::read(panel));
    }
}

#[cfg(test)]
#[path = "tests/nested_tests.rs"]
mod tests;

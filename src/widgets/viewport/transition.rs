//! Eased transition of the displayed viewport transform.
//!
//! The controller state changes instantly; what gets painted follows it
//! over a short ease-out. During a drag the display snaps so the diagram
//! stays glued to the pointer.

use eframe::egui;
use eframe::egui::emath::easing;

use super::ViewportState;

/// Default transition length (seconds)
pub const TRANSITION_SECS: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformTransition {
    from: ViewportState,
    to: ViewportState,
    start_time: f64,
    duration: f32,
}

impl Default for TransformTransition {
    fn default() -> Self {
        Self::new(ViewportState::default(), TRANSITION_SECS)
    }
}

impl TransformTransition {
    pub fn new(initial: ViewportState, duration: f32) -> Self {
        Self {
            from: initial,
            to: initial,
            start_time: 0.0,
            duration: duration.max(0.0),
        }
    }

    pub fn target(&self) -> ViewportState {
        self.to
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration.max(0.0);
    }

    /// Displayed state at `time` (seconds, same clock as `retarget`).
    pub fn sample(&self, time: f64) -> ViewportState {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((time - self.start_time) as f32 / self.duration).clamp(0.0, 1.0);
        let k = easing::cubic_out(t);
        ViewportState {
            zoom: egui::lerp(self.from.zoom..=self.to.zoom, k),
            pan: self.from.pan + (self.to.pan - self.from.pan) * k,
        }
    }

    pub fn is_animating(&self, time: f64) -> bool {
        self.from != self.to && time < self.start_time + self.duration as f64
    }

    /// Point the transition at a new target.
    ///
    /// With `animate` false (drag in progress or transitions disabled) the
    /// display jumps straight to `target`. Otherwise a new ease starts from
    /// wherever the display currently is.
    pub fn retarget(&mut self, target: ViewportState, time: f64, animate: bool) {
        if target == self.to && (animate || !self.is_animating(time)) {
            return;
        }
        if animate {
            self.from = self.sample(time);
        } else {
            self.from = target;
        }
        self.to = target;
        self.start_time = time;
    }
}

use eframe::egui;
use log::{debug, trace};

use super::gesture::{GesturePhase, PointerGesture, WheelInput};

// Zoom constants
pub const ZOOM_MIN: f32 = 0.3;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_STEP: f32 = 0.2;
/// Zoom change per unit of wheel delta when zooming via wheel
pub const WHEEL_ZOOM_SPEED: f32 = 0.01;

/// Viewport state for pan/zoom.
///
/// Every transition returns a whole new value; callers replace the state
/// instead of mutating fields in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: f32,
    /// Translation in diagram units (applied before scaling)
    pub pan: egui::Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zoom(self, zoom: f32) -> Self {
        Self {
            zoom: zoom.clamp(ZOOM_MIN, ZOOM_MAX),
            ..self
        }
    }

    pub fn with_pan(self, pan: egui::Vec2) -> Self {
        Self { pan, ..self }
    }

    pub fn zoomed_in(self) -> Self {
        self.with_zoom((self.zoom + ZOOM_STEP).min(ZOOM_MAX))
    }

    pub fn zoomed_out(self) -> Self {
        self.with_zoom((self.zoom - ZOOM_STEP).max(ZOOM_MIN))
    }

    /// Screen-space delta converted to diagram units at the current zoom.
    pub fn screen_to_diagram_delta(&self, delta: egui::Vec2) -> egui::Vec2 {
        delta / self.zoom
    }

    /// Apply a wheel event.
    ///
    /// Precise zoom (ctrl/meta or pinch) adjusts zoom by `-delta.y * 0.01`;
    /// anything else scrolls the diagram by the inverted delta.
    pub fn wheeled(self, wheel: &WheelInput) -> Self {
        if wheel.precise_zoom {
            self.with_zoom(self.zoom - wheel.delta.y * WHEEL_ZOOM_SPEED)
        } else {
            let pan = self.pan - self.screen_to_diagram_delta(wheel.delta);
            self.with_pan(pan)
        }
    }

    /// Zoom indicator value: `round(zoom * 100)`
    pub fn zoom_percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }

    /// Map a diagram-space point to screen space.
    ///
    /// Equivalent to CSS `scale(zoom) translate(pan)` with the transform
    /// origin at the viewport center, with the content centered in the viewport.
    pub fn diagram_to_screen(
        &self,
        p: egui::Pos2,
        content_center: egui::Pos2,
        viewport_center: egui::Pos2,
    ) -> egui::Pos2 {
        viewport_center + ((p - content_center) + self.pan) * self.zoom
    }

    /// Inverse of [`Self::diagram_to_screen`].
    pub fn screen_to_diagram(
        &self,
        p: egui::Pos2,
        content_center: egui::Pos2,
        viewport_center: egui::Pos2,
    ) -> egui::Pos2 {
        content_center + (p - viewport_center) / self.zoom - self.pan
    }
}

/// Ephemeral drag tracking, alive between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_start: egui::Pos2,
    pub pan_at_start: egui::Vec2,
}

impl DragSession {
    /// Pan for the current pointer position. Dividing by zoom keeps one
    /// screen pixel of movement equal to one pixel of diagram movement.
    pub fn pan_at(&self, pointer: egui::Pos2, zoom: f32) -> egui::Vec2 {
        self.pan_at_start + (pointer - self.pointer_start) / zoom
    }
}

/// Owns the viewport state and the optional drag session and turns
/// gestures into state replacements.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    state: ViewportState,
    drag: Option<DragSession>,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn zoom(&self) -> f32 {
        self.state.zoom
    }

    pub fn pan(&self) -> egui::Vec2 {
        self.state.pan
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn zoom_percent(&self) -> i32 {
        self.state.zoom_percent()
    }

    fn replace(&mut self, next: ViewportState) {
        if next != self.state {
            trace!(
                "Viewport: zoom {:.2} -> {:.2}, pan ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                self.state.zoom, next.zoom, self.state.pan.x, self.state.pan.y, next.pan.x, next.pan.y
            );
        }
        self.state = next;
    }

    pub fn zoom_in(&mut self) {
        self.replace(self.state.zoomed_in());
        debug!("Zoom in: {}%", self.zoom_percent());
    }

    pub fn zoom_out(&mut self) {
        self.replace(self.state.zoomed_out());
        debug!("Zoom out: {}%", self.zoom_percent());
    }

    /// Reset zoom and pan. An in-progress drag is left alone; its next move
    /// continues from the pan it started with.
    pub fn reset(&mut self) {
        self.replace(ViewportState::default());
        debug!("Viewport reset");
    }

    /// Start a drag session. Returns true when the press was taken (the host
    /// should suppress its default action), false if a session is already active.
    pub fn begin_drag(&mut self, pointer: egui::Pos2) -> bool {
        if self.drag.is_some() {
            return false;
        }
        self.drag = Some(DragSession {
            pointer_start: pointer,
            pan_at_start: self.state.pan,
        });
        debug!("Drag start at ({:.1}, {:.1})", pointer.x, pointer.y);
        true
    }

    /// Returns true if a session was active and pan was recomputed.
    pub fn update_drag(&mut self, pointer: egui::Pos2) -> bool {
        let Some(session) = self.drag else {
            return false;
        };
        let pan = session.pan_at(pointer, self.state.zoom);
        self.replace(self.state.with_pan(pan));
        true
    }

    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            debug!("Drag end, pan ({:.1}, {:.1})", self.state.pan.x, self.state.pan.y);
        }
    }

    /// Feed a mouse or touch gesture. Returns true if the input was consumed.
    pub fn handle_gesture(&mut self, gesture: &impl PointerGesture) -> bool {
        match gesture.phase() {
            Some(GesturePhase::Press(pos)) => self.begin_drag(pos),
            Some(GesturePhase::Move(pos)) => self.update_drag(pos),
            Some(GesturePhase::Release) => {
                let was_dragging = self.is_dragging();
                self.end_drag();
                was_dragging
            }
            None => false,
        }
    }

    /// Apply a wheel event. Always consumed: the host must never scroll
    /// or zoom anything else in response.
    pub fn handle_wheel(&mut self, wheel: &WheelInput) -> bool {
        self.replace(self.state.wheeled(wheel));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::viewport::gesture::{MouseGesture, MouseKind, TouchGesture, TouchKind};
    use eframe::egui::{pos2, vec2, PointerButton};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_zoom_stays_in_bounds() {
        let mut vc = ViewportController::new();
        for _ in 0..50 {
            vc.zoom_in();
            assert!(vc.zoom() <= ZOOM_MAX);
        }
        assert_eq!(vc.zoom(), ZOOM_MAX);
        for _ in 0..50 {
            vc.zoom_out();
            assert!(vc.zoom() >= ZOOM_MIN);
        }
        assert_eq!(vc.zoom(), ZOOM_MIN);

        // Mixed sequence
        for i in 0..100 {
            if i % 3 == 0 {
                vc.zoom_out();
            } else {
                vc.zoom_in();
            }
            assert!((ZOOM_MIN..=ZOOM_MAX).contains(&vc.zoom()));
        }
    }

    #[test]
    fn test_zoom_in_out_roundtrip() {
        let mut vc = ViewportController::new();
        vc.zoom_in();
        vc.zoom_out();
        assert!(approx(vc.zoom(), 1.0));

        let s = ViewportState::new().with_zoom(0.7);
        assert!(approx(s.zoomed_in().zoomed_out().zoom, 0.7));
    }

    #[test]
    fn test_zoom_saturation() {
        let s = ViewportState::new().with_zoom(3.0);
        assert_eq!(s.zoomed_in().zoom, 3.0);
        let s = ViewportState::new().with_zoom(0.3);
        assert_eq!(s.zoomed_out().zoom, 0.3);
        // Near the boundary the step is cut short, so the roundtrip breaks
        let s = ViewportState::new().with_zoom(2.9);
        assert_eq!(s.zoomed_in().zoom, 3.0);
        assert!(approx(s.zoomed_in().zoomed_out().zoom, 2.8));
    }

    #[test]
    fn test_reset() {
        let mut vc = ViewportController::new();
        vc.zoom_in();
        vc.handle_wheel(&WheelInput::scroll(vec2(40.0, -12.0)));
        vc.reset();
        assert_eq!(vc.state(), ViewportState { zoom: 1.0, pan: egui::Vec2::ZERO });
    }

    #[test]
    fn test_drag_at_zoom_1() {
        let mut vc = ViewportController::new();
        assert!(vc.begin_drag(pos2(100.0, 100.0)));
        vc.update_drag(pos2(150.0, 130.0));
        assert_eq!(vc.pan(), vec2(50.0, 30.0));
    }

    #[test]
    fn test_drag_at_zoom_2() {
        let mut vc = ViewportController::new();
        vc.replace(ViewportState::new().with_zoom(2.0));
        vc.begin_drag(pos2(100.0, 100.0));
        vc.update_drag(pos2(150.0, 130.0));
        assert_eq!(vc.pan(), vec2(25.0, 15.0));
    }

    #[test]
    fn test_drag_accumulates_from_start_pan() {
        let mut vc = ViewportController::new();
        vc.begin_drag(pos2(0.0, 0.0));
        vc.update_drag(pos2(10.0, 0.0));
        vc.end_drag();
        vc.begin_drag(pos2(0.0, 0.0));
        vc.update_drag(pos2(5.0, 5.0));
        assert_eq!(vc.pan(), vec2(15.0, 5.0));
    }

    #[test]
    fn test_move_after_release_is_ignored() {
        let mut vc = ViewportController::new();
        vc.begin_drag(pos2(100.0, 100.0));
        vc.update_drag(pos2(150.0, 130.0));
        vc.end_drag();
        assert!(!vc.update_drag(pos2(300.0, 300.0)));
        assert_eq!(vc.pan(), vec2(50.0, 30.0));
        // end_drag is idempotent
        vc.end_drag();
        assert!(!vc.is_dragging());
    }

    #[test]
    fn test_second_press_does_not_restart_session() {
        let mut vc = ViewportController::new();
        assert!(vc.begin_drag(pos2(0.0, 0.0)));
        assert!(!vc.begin_drag(pos2(50.0, 50.0)));
        vc.update_drag(pos2(60.0, 60.0));
        assert_eq!(vc.pan(), vec2(60.0, 60.0));
    }

    #[test]
    fn test_wheel_zoom_with_modifier() {
        let mut vc = ViewportController::new();
        assert!(vc.handle_wheel(&WheelInput::with_modifiers(vec2(0.0, -100.0), true)));
        assert!(approx(vc.zoom(), 2.0));
        vc.handle_wheel(&WheelInput::with_modifiers(vec2(0.0, -150.0), true));
        assert_eq!(vc.zoom(), ZOOM_MAX);
        vc.handle_wheel(&WheelInput::with_modifiers(vec2(0.0, 1000.0), true));
        assert_eq!(vc.zoom(), ZOOM_MIN);
        assert_eq!(vc.pan(), egui::Vec2::ZERO);
    }

    #[test]
    fn test_wheel_pan_without_modifier() {
        let mut vc = ViewportController::new();
        vc.handle_wheel(&WheelInput::with_modifiers(vec2(20.0, 0.0), false));
        assert_eq!(vc.pan(), vec2(-20.0, 0.0));
        assert_eq!(vc.zoom(), 1.0);

        vc.replace(vc.state().with_zoom(2.0));
        vc.handle_wheel(&WheelInput::scroll(vec2(0.0, 40.0)));
        assert_eq!(vc.pan(), vec2(-20.0, -20.0));
    }

    #[test]
    fn test_pinch_zooms() {
        let mut vc = ViewportController::new();
        vc.handle_wheel(&WheelInput::pinch(1.5));
        assert!(approx(vc.zoom(), 1.5));
        vc.handle_wheel(&WheelInput::pinch(0.5));
        assert!(approx(vc.zoom(), 1.0));
    }

    #[test]
    fn test_mouse_gesture_primary_only() {
        let mut vc = ViewportController::new();
        let press = MouseGesture::new(MouseKind::Down, pos2(0.0, 0.0)).with_button(PointerButton::Secondary);
        assert!(!vc.handle_gesture(&press));
        assert!(!vc.is_dragging());

        let press = MouseGesture::new(MouseKind::Down, pos2(0.0, 0.0));
        assert!(vc.handle_gesture(&press));
        vc.handle_gesture(&MouseGesture::new(MouseKind::Move, pos2(8.0, 4.0)));
        assert_eq!(vc.pan(), vec2(8.0, 4.0));

        // Leaving the viewport ends the session like a release
        assert!(vc.handle_gesture(&MouseGesture::new(MouseKind::Leave, pos2(500.0, 4.0))));
        assert!(!vc.is_dragging());
        vc.handle_gesture(&MouseGesture::new(MouseKind::Move, pos2(40.0, 40.0)));
        assert_eq!(vc.pan(), vec2(8.0, 4.0));
    }

    #[test]
    fn test_touch_gesture_single_touch_only() {
        let mut vc = ViewportController::new();
        assert!(!vc.handle_gesture(&TouchGesture::new(TouchKind::Start, pos2(0.0, 0.0), 2)));
        assert!(!vc.is_dragging());

        assert!(vc.handle_gesture(&TouchGesture::new(TouchKind::Start, pos2(10.0, 10.0), 1)));
        // A second finger joining does not move the diagram
        vc.handle_gesture(&TouchGesture::new(TouchKind::Move, pos2(90.0, 90.0), 2));
        assert_eq!(vc.pan(), egui::Vec2::ZERO);
        vc.handle_gesture(&TouchGesture::new(TouchKind::Move, pos2(20.0, 30.0), 1));
        assert_eq!(vc.pan(), vec2(10.0, 20.0));
        vc.handle_gesture(&TouchGesture::new(TouchKind::End, pos2(20.0, 30.0), 0));
        assert!(!vc.is_dragging());
    }

    #[test]
    fn test_transform_roundtrip() {
        let s = ViewportState { zoom: 2.0, pan: vec2(10.0, -5.0) };
        let content_center = pos2(100.0, 50.0);
        let viewport_center = pos2(400.0, 300.0);

        // Content center with no pan sits on the viewport center
        let at_center = ViewportState::new().diagram_to_screen(content_center, content_center, viewport_center);
        assert_eq!(at_center, viewport_center);

        let p = pos2(130.0, 70.0);
        let screen = s.diagram_to_screen(p, content_center, viewport_center);
        assert_eq!(screen, pos2(400.0 + 40.0 * 2.0, 300.0 + 15.0 * 2.0));
        let back = s.screen_to_diagram(screen, content_center, viewport_center);
        assert!(approx(back.x, p.x) && approx(back.y, p.y));
    }

    #[test]
    fn test_zoom_percent() {
        assert_eq!(ViewportState::new().zoom_percent(), 100);
        assert_eq!(ViewportState::new().zoomed_out().zoom_percent(), 80);
        assert_eq!(ViewportState::new().with_zoom(0.3).zoom_percent(), 30);
        assert_eq!(ViewportState::new().with_zoom(1.234).zoom_percent(), 123);
    }
}

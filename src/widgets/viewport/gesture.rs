//! Pointer gestures feeding the viewport controller.
//!
//! Mouse and touch both reduce to the same three phases (press, move,
//! release), so the controller carries the delta math once. Wheel input
//! is separate: it either pans or zooms, never drags.

use eframe::egui;

/// Points per line for line-based wheel deltas (mouse wheels on some platforms)
const WHEEL_LINE_HEIGHT: f32 = 50.0;

/// Unified drag phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Press(egui::Pos2),
    Move(egui::Pos2),
    Release,
}

/// Input source that can drive a drag session.
pub trait PointerGesture {
    /// Drag phase for this input, or `None` when it must be ignored.
    fn phase(&self) -> Option<GesturePhase>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down,
    Move,
    Up,
    /// Pointer left the interactive region (treated like a release)
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseGesture {
    pub kind: MouseKind,
    pub pos: egui::Pos2,
    pub button: egui::PointerButton,
}

impl MouseGesture {
    pub fn new(kind: MouseKind, pos: egui::Pos2) -> Self {
        Self {
            kind,
            pos,
            button: egui::PointerButton::Primary,
        }
    }

    pub fn with_button(self, button: egui::PointerButton) -> Self {
        Self { button, ..self }
    }
}

impl PointerGesture for MouseGesture {
    fn phase(&self) -> Option<GesturePhase> {
        match self.kind {
            MouseKind::Down if self.button == egui::PointerButton::Primary => {
                Some(GesturePhase::Press(self.pos))
            }
            MouseKind::Down => None,
            MouseKind::Move => Some(GesturePhase::Move(self.pos)),
            MouseKind::Up | MouseKind::Leave => Some(GesturePhase::Release),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchKind {
    Start,
    Move,
    End,
    Cancel,
}

impl From<egui::TouchPhase> for TouchKind {
    fn from(phase: egui::TouchPhase) -> Self {
        match phase {
            egui::TouchPhase::Start => TouchKind::Start,
            egui::TouchPhase::Move => TouchKind::Move,
            egui::TouchPhase::End => TouchKind::End,
            egui::TouchPhase::Cancel => TouchKind::Cancel,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchGesture {
    pub kind: TouchKind,
    pub pos: egui::Pos2,
    /// Touch points currently on the surface, including this one for start/move
    pub touches: usize,
}

impl TouchGesture {
    pub fn new(kind: TouchKind, pos: egui::Pos2, touches: usize) -> Self {
        Self { kind, pos, touches }
    }
}

impl PointerGesture for TouchGesture {
    fn phase(&self) -> Option<GesturePhase> {
        match self.kind {
            // Multi-touch is not a drag
            TouchKind::Start if self.touches == 1 => Some(GesturePhase::Press(self.pos)),
            TouchKind::Move if self.touches == 1 => Some(GesturePhase::Move(self.pos)),
            TouchKind::Start | TouchKind::Move => None,
            TouchKind::End | TouchKind::Cancel => Some(GesturePhase::Release),
        }
    }
}

/// Wheel input in DOM conventions: positive `delta.y` scrolls down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta: egui::Vec2,
    /// Zoom instead of pan.
    ///
    /// Set when ctrl or meta is held. Browsers and winit deliver trackpad
    /// pinch as a ctrl+wheel event, so the modifier doubles as the pinch
    /// signal; this is platform convention, not something the event itself
    /// carries.
    pub precise_zoom: bool,
}

impl WheelInput {
    pub fn scroll(delta: egui::Vec2) -> Self {
        Self::with_modifiers(delta, false)
    }

    pub fn with_modifiers(delta: egui::Vec2, zoom_modifier: bool) -> Self {
        Self {
            delta,
            precise_zoom: zoom_modifier,
        }
    }

    /// Native pinch gesture with a multiplicative `factor` (>1 = zoom in).
    /// Mapped onto an equivalent wheel delta so both paths share one rule.
    pub fn pinch(factor: f32) -> Self {
        Self {
            delta: egui::vec2(0.0, -(factor - 1.0) * 100.0),
            precise_zoom: true,
        }
    }

    /// Build from an `egui::Event::MouseWheel`.
    ///
    /// egui reports the direction content should move (positive y = content
    /// moves down), which is the opposite of DOM `deltaY`, so the delta is
    /// negated here.
    pub fn from_egui(
        unit: egui::MouseWheelUnit,
        delta: egui::Vec2,
        modifiers: egui::Modifiers,
        page_size: egui::Vec2,
    ) -> Self {
        let points = match unit {
            egui::MouseWheelUnit::Point => delta,
            egui::MouseWheelUnit::Line => delta * WHEEL_LINE_HEIGHT,
            egui::MouseWheelUnit::Page => delta * page_size,
        };
        Self::with_modifiers(-points, modifiers.ctrl || modifiers.mac_cmd || modifiers.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    #[test]
    fn test_mouse_phases() {
        let p = pos2(3.0, 4.0);
        assert_eq!(MouseGesture::new(MouseKind::Down, p).phase(), Some(GesturePhase::Press(p)));
        assert_eq!(
            MouseGesture::new(MouseKind::Down, p).with_button(egui::PointerButton::Middle).phase(),
            None
        );
        assert_eq!(MouseGesture::new(MouseKind::Move, p).phase(), Some(GesturePhase::Move(p)));
        assert_eq!(MouseGesture::new(MouseKind::Up, p).phase(), Some(GesturePhase::Release));
        assert_eq!(MouseGesture::new(MouseKind::Leave, p).phase(), Some(GesturePhase::Release));
    }

    #[test]
    fn test_touch_phases() {
        let p = pos2(1.0, 1.0);
        assert_eq!(TouchGesture::new(TouchKind::Start, p, 1).phase(), Some(GesturePhase::Press(p)));
        assert_eq!(TouchGesture::new(TouchKind::Start, p, 2).phase(), None);
        assert_eq!(TouchGesture::new(TouchKind::Move, p, 3).phase(), None);
        assert_eq!(TouchGesture::new(TouchKind::Cancel, p, 0).phase(), Some(GesturePhase::Release));
        assert_eq!(TouchKind::from(egui::TouchPhase::End), TouchKind::End);
    }

    #[test]
    fn test_wheel_from_egui_flips_sign() {
        let w = WheelInput::from_egui(
            egui::MouseWheelUnit::Point,
            vec2(0.0, 30.0),
            egui::Modifiers::NONE,
            vec2(800.0, 600.0),
        );
        assert_eq!(w.delta, vec2(0.0, -30.0));
        assert!(!w.precise_zoom);

        let w = WheelInput::from_egui(
            egui::MouseWheelUnit::Line,
            vec2(-1.0, 0.0),
            egui::Modifiers::CTRL,
            vec2(800.0, 600.0),
        );
        assert_eq!(w.delta, vec2(WHEEL_LINE_HEIGHT, 0.0));
        assert!(w.precise_zoom);

        let w = WheelInput::from_egui(
            egui::MouseWheelUnit::Page,
            vec2(0.0, 1.0),
            egui::Modifiers::NONE,
            vec2(800.0, 600.0),
        );
        assert_eq!(w.delta, vec2(0.0, -600.0));
    }

    #[test]
    fn test_pinch_maps_to_zoom_delta() {
        let w = WheelInput::pinch(1.25);
        assert!(w.precise_zoom);
        assert!((w.delta.y + 25.0).abs() < 1e-4);
    }
}

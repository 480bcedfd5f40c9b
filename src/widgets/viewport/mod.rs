//! Viewport widget - pan/zoom over the tree diagram
//!
//! Pure controller state plus an egui bridge that feeds it mouse, touch,
//! wheel and pinch input.

pub mod gesture;
pub mod transition;
mod viewport;
mod viewport_ui;
pub mod viewport_events;

pub use gesture::{GesturePhase, PointerGesture, WheelInput};
pub use transition::TransformTransition;
pub use viewport::{DragSession, ViewportController, ViewportState, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
pub use viewport_events::{ResetViewportEvent, ToggleHelpEvent, ZoomInEvent, ZoomOutEvent};
pub use viewport_ui::{TreeViewport, ViewportActions, render};

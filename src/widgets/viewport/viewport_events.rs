//! Viewport widget events.
//!
//! Emitted by the overlay controls and keyboard shortcuts, applied to the
//! controller by the app after the frame's widgets have rendered.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoomInEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoomOutEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetViewportEvent;

/// Toggle the controls help overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToggleHelpEvent;

//! Viewport widget - UI rendering and egui input bridge

use std::collections::BTreeSet;

use eframe::egui;
use log::trace;

use super::gesture::{MouseGesture, MouseKind, TouchGesture, TouchKind, WheelInput};
use super::transition::TransformTransition;
use super::viewport_events::{ResetViewportEvent, ZoomInEvent, ZoomOutEvent};
use super::ViewportController;
use crate::core::event_bus::{downcast_event, BoxedEvent};
use crate::settings::AppSettings;
use crate::widgets::actions::ActionQueue;
use crate::widgets::tree::{paint_diagram, DiagramColors, DiagramLayout, DiagramTransform};

pub type ViewportActions = ActionQueue;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(17, 24, 39);
const CONTROL_FILL: egui::Color32 = egui::Color32::from_rgb(31, 41, 55);
const CONTROL_STROKE: egui::Color32 = egui::Color32::from_rgb(75, 85, 99);
const CONTROL_SIZE: f32 = 40.0;
const OVERLAY_MARGIN: f32 = 16.0;

/// Viewport runtime: controller, display transition, and per-frame input
/// routing state. Created with the window, dropped with it.
#[derive(Debug, Default)]
pub struct TreeViewport {
    pub controller: ViewportController,
    transition: TransformTransition,
    /// Every touch point currently down, wherever it started
    touches: BTreeSet<egui::TouchId>,
    /// Touch that owns the drag session, if a touch started it
    drag_touch: Option<egui::TouchId>,
    /// Screen rects of the overlay controls from the previous frame; presses
    /// there belong to the buttons, not to the drag
    overlay_rects: Vec<egui::Rect>,
}

impl TreeViewport {
    pub fn new() -> Self {
        Self::default()
    }

    fn over_overlay(&self, pos: egui::Pos2) -> bool {
        self.overlay_rects.iter().any(|r| r.contains(pos))
    }

    /// Route one egui event into the controller. Returns true if consumed.
    ///
    /// `hover_pos` is the latest pointer position, used to decide whether
    /// wheel input targets the viewport.
    pub fn handle_event(
        &mut self,
        event: &egui::Event,
        panel_rect: egui::Rect,
        hover_pos: Option<egui::Pos2>,
    ) -> bool {
        let vc = &mut self.controller;
        match event {
            egui::Event::PointerButton {
                pos,
                button,
                pressed: true,
                ..
            } => {
                if !panel_rect.contains(*pos) || self.overlay_rects.iter().any(|r| r.contains(*pos)) {
                    return false;
                }
                vc.handle_gesture(&MouseGesture::new(MouseKind::Down, *pos).with_button(*button))
            }
            egui::Event::PointerButton {
                pos,
                button,
                pressed: false,
                ..
            } => {
                if *button != egui::PointerButton::Primary {
                    return false;
                }
                vc.handle_gesture(&MouseGesture::new(MouseKind::Up, *pos))
            }
            egui::Event::PointerMoved(pos) => {
                // Simulated pointer events from the first finger of a
                // multi-touch must not pan
                if self.touches.len() > 1 {
                    return false;
                }
                let kind = if panel_rect.contains(*pos) {
                    MouseKind::Move
                } else {
                    MouseKind::Leave
                };
                vc.handle_gesture(&MouseGesture::new(kind, *pos))
            }
            egui::Event::PointerGone => {
                vc.handle_gesture(&MouseGesture::new(MouseKind::Leave, egui::Pos2::ZERO))
            }
            egui::Event::Touch { id, phase, pos, .. } => {
                let kind = TouchKind::from(*phase);
                match kind {
                    TouchKind::Start => {
                        self.touches.insert(*id);
                        if !panel_rect.contains(*pos) || self.over_overlay(*pos) {
                            return false;
                        }
                        let gesture = TouchGesture::new(kind, *pos, self.touches.len());
                        let taken = self.controller.handle_gesture(&gesture);
                        if taken {
                            self.drag_touch = Some(*id);
                        }
                        taken
                    }
                    TouchKind::Move => {
                        // Other fingers never drive the session
                        if self.drag_touch != Some(*id) {
                            return false;
                        }
                        let gesture = TouchGesture::new(kind, *pos, self.touches.len());
                        self.controller.handle_gesture(&gesture)
                    }
                    TouchKind::End | TouchKind::Cancel => {
                        self.touches.remove(id);
                        if self.drag_touch != Some(*id) {
                            return false;
                        }
                        self.drag_touch = None;
                        let gesture = TouchGesture::new(kind, *pos, self.touches.len());
                        self.controller.handle_gesture(&gesture)
                    }
                }
            }
            egui::Event::MouseWheel {
                unit,
                delta,
                modifiers,
                ..
            } => {
                if !hover_pos.is_some_and(|p| panel_rect.contains(p)) {
                    return false;
                }
                let wheel = WheelInput::from_egui(*unit, *delta, *modifiers, panel_rect.size());
                trace!("Wheel {:?}", wheel);
                vc.handle_wheel(&wheel)
            }
            egui::Event::Zoom(factor) => {
                if !hover_pos.is_some_and(|p| panel_rect.contains(p)) {
                    return false;
                }
                vc.handle_wheel(&WheelInput::pinch(*factor))
            }
            _ => false,
        }
    }

    /// Apply a queued viewport event. Returns true if it was one of ours.
    pub fn apply_event(&mut self, event: &BoxedEvent) -> bool {
        if downcast_event::<ZoomInEvent>(event).is_some() {
            self.controller.zoom_in();
        } else if downcast_event::<ZoomOutEvent>(event).is_some() {
            self.controller.zoom_out();
        } else if downcast_event::<ResetViewportEvent>(event).is_some() {
            self.controller.reset();
        } else {
            return false;
        }
        true
    }
}

/// Render the diagram viewport inside the provided UI.
pub fn render(
    ui: &mut egui::Ui,
    viewport: &mut TreeViewport,
    layout: &DiagramLayout,
    settings: &AppSettings,
) -> ViewportActions {
    let mut actions = ViewportActions::default();
    let ctx = ui.ctx().clone();
    let panel_rect = ui.max_rect();

    ui.painter().rect_filled(panel_rect, 0.0, BACKGROUND);

    let response = ui.interact(
        panel_rect,
        ui.id().with("tree_viewport_interaction"),
        egui::Sense::click_and_drag(),
    );

    handle_viewport_input(&ctx, panel_rect, viewport);

    if response.hovered() {
        ctx.set_cursor_icon(if viewport.controller.is_dragging() {
            egui::CursorIcon::Grabbing
        } else {
            egui::CursorIcon::Grab
        });
    }

    // Ease toward the controller state, except while dragging
    let now = ctx.input(|i| i.time);
    viewport.transition.set_duration(settings.transition_secs);
    let animate = settings.smooth_transitions && !viewport.controller.is_dragging();
    viewport
        .transition
        .retarget(viewport.controller.state(), now, animate);
    let shown = viewport.transition.sample(now);
    if viewport.transition.is_animating(now) {
        ctx.request_repaint();
    }

    let painter = ui.painter_at(panel_rect);
    let xf = DiagramTransform::new(shown, layout, panel_rect);
    let drawn = paint_diagram(&painter, layout, &xf, &DiagramColors::default());
    trace!("Painted {}/{} boxes at {}%", drawn, layout.boxes.len(), viewport.controller.zoom_percent());

    viewport.overlay_rects.clear();
    let controls = render_zoom_controls(&ctx, ui.id(), panel_rect, &mut actions);
    viewport.overlay_rects.push(controls);
    let indicator = render_zoom_indicator(&ctx, ui.id(), panel_rect, viewport.controller.zoom_percent());
    viewport.overlay_rects.push(indicator);

    if settings.show_help {
        crate::help::render_viewport_help(ui, panel_rect);
    }

    actions
}

fn handle_viewport_input(ctx: &egui::Context, rect: egui::Rect, viewport: &mut TreeViewport) {
    let (events, hover_pos) = ctx.input(|i| (i.events.clone(), i.pointer.hover_pos()));
    let mut changed = false;
    for event in &events {
        changed |= viewport.handle_event(event, rect, hover_pos);
    }
    if changed {
        ctx.request_repaint();
    }
}

fn control_button(ui: &mut egui::Ui, text: &str, hover: &str) -> egui::Response {
    ui.add(
        egui::Button::new(egui::RichText::new(text).size(18.0).color(egui::Color32::WHITE))
            .min_size(egui::vec2(CONTROL_SIZE, CONTROL_SIZE))
            .fill(CONTROL_FILL)
            .stroke(egui::Stroke::new(1.0, CONTROL_STROKE))
            .corner_radius(8.0),
    )
    .on_hover_text(hover)
}

/// Zoom in / zoom out / reset column (top-right). Returns its screen rect.
fn render_zoom_controls(
    ctx: &egui::Context,
    parent_id: egui::Id,
    panel_rect: egui::Rect,
    actions: &mut ViewportActions,
) -> egui::Rect {
    egui::Area::new(parent_id.with("zoom_controls"))
        .order(egui::Order::Foreground)
        .fixed_pos(egui::pos2(
            panel_rect.max.x - OVERLAY_MARGIN - CONTROL_SIZE,
            panel_rect.min.y + OVERLAY_MARGIN,
        ))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 8.0;
            ui.vertical(|ui| {
                if control_button(ui, "+", "Zoom In").clicked() {
                    actions.send(ZoomInEvent);
                }
                if control_button(ui, "-", "Zoom Out").clicked() {
                    actions.send(ZoomOutEvent);
                }
                if control_button(ui, "⟲", "Reset View").clicked() {
                    actions.send(ResetViewportEvent);
                }
            });
        })
        .response
        .rect
}

/// Read-only `NN%` badge (top-left). Returns its screen rect.
fn render_zoom_indicator(
    ctx: &egui::Context,
    parent_id: egui::Id,
    panel_rect: egui::Rect,
    percent: i32,
) -> egui::Rect {
    egui::Area::new(parent_id.with("zoom_indicator"))
        .order(egui::Order::Foreground)
        .interactable(false)
        .fixed_pos(panel_rect.min + egui::vec2(OVERLAY_MARGIN, OVERLAY_MARGIN))
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(CONTROL_FILL)
                .stroke(egui::Stroke::new(1.0, CONTROL_STROKE))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{}%", percent))
                            .size(14.0)
                            .color(egui::Color32::WHITE),
                    );
                });
        })
        .response
        .rect
}

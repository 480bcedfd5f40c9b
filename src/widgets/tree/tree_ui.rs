//! Tree diagram painting through the viewport transform.

use eframe::egui;

use super::layout::{BOX_BORDER, BOX_ROUNDING, DiagramLayout, LINE_WIDTH};
use crate::widgets::viewport::ViewportState;

/// Label font size at zoom 1.0
const LABEL_FONT_SIZE: f32 = 16.0;
/// Below this on-screen size text is unreadable; skip it
const MIN_LABEL_FONT_SIZE: f32 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct DiagramColors {
    pub line: egui::Color32,
    pub box_stroke: egui::Color32,
    pub box_fill: egui::Color32,
    pub label: egui::Color32,
}

impl Default for DiagramColors {
    fn default() -> Self {
        Self {
            line: egui::Color32::from_rgb(209, 213, 219),
            box_stroke: egui::Color32::from_rgb(209, 213, 219),
            box_fill: egui::Color32::TRANSPARENT,
            label: egui::Color32::WHITE,
        }
    }
}

/// Maps diagram space to screen space for one frame.
#[derive(Debug, Clone, Copy)]
pub struct DiagramTransform {
    pub view: ViewportState,
    pub content_center: egui::Pos2,
    pub viewport_center: egui::Pos2,
}

impl DiagramTransform {
    pub fn new(view: ViewportState, layout: &DiagramLayout, viewport_rect: egui::Rect) -> Self {
        Self {
            view,
            content_center: layout.content_center(),
            viewport_center: viewport_rect.center(),
        }
    }

    pub fn pos(&self, p: egui::Pos2) -> egui::Pos2 {
        self.view
            .diagram_to_screen(p, self.content_center, self.viewport_center)
    }

    pub fn rect(&self, r: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.pos(r.min), self.pos(r.max))
    }

    pub fn scale(&self, v: f32) -> f32 {
        v * self.view.zoom
    }
}

/// Paint boxes and connectors. Returns the number of boxes drawn after culling.
pub fn paint_diagram(
    painter: &egui::Painter,
    layout: &DiagramLayout,
    xf: &DiagramTransform,
    colors: &DiagramColors,
) -> usize {
    let clip = painter.clip_rect();
    let line = egui::Stroke::new(xf.scale(LINE_WIDTH), colors.line);

    for c in &layout.connectors {
        let a = xf.pos(c.from);
        let b = xf.pos(c.to);
        if clip.intersects(egui::Rect::from_two_pos(a, b).expand(line.width)) {
            painter.line_segment([a, b], line);
        }
    }

    let border = egui::Stroke::new(xf.scale(BOX_BORDER), colors.box_stroke);
    let font_size = xf.scale(LABEL_FONT_SIZE);
    let mut drawn = 0;
    for b in &layout.boxes {
        let rect = xf.rect(b.rect);
        if !clip.intersects(rect) {
            continue;
        }
        drawn += 1;
        let rounding = xf.scale(BOX_ROUNDING);
        painter.rect_filled(rect, rounding, colors.box_fill);
        painter.rect_stroke(rect, rounding, border, egui::StrokeKind::Inside);
        if !b.label.is_empty() && font_size >= MIN_LABEL_FONT_SIZE {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &b.label,
                egui::FontId::proportional(font_size),
                colors.label,
            );
        }
    }
    drawn
}

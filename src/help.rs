//! Controls help overlay (F1).

use eframe::egui;

/// Single help entry (key binding + description)
#[derive(Clone, Debug)]
pub struct HelpEntry {
    pub key: &'static str,
    pub desc: &'static str,
}

impl HelpEntry {
    pub const fn new(key: &'static str, desc: &'static str) -> Self {
        Self { key, desc }
    }
}

pub const VIEWPORT_HELP: &[HelpEntry] = &[
    HelpEntry::new("Left Drag / Touch", "Pan"),
    HelpEntry::new("Wheel / Trackpad", "Pan"),
    HelpEntry::new("Ctrl/Cmd + Wheel", "Zoom"),
    HelpEntry::new("Pinch", "Zoom"),
    HelpEntry::new("+ / =", "Zoom In"),
    HelpEntry::new("-", "Zoom Out"),
    HelpEntry::new("0", "Reset View"),
    HelpEntry::new("F1", "Toggle Help"),
];

/// Help panel in the bottom-left corner of the viewport.
pub fn render_viewport_help(ui: &egui::Ui, panel_rect: egui::Rect) {
    let line_height = 18.0;
    let padding = 10.0;
    let key_column = 150.0;
    let size = egui::vec2(
        key_column + 110.0 + padding * 2.0,
        VIEWPORT_HELP.len() as f32 * line_height + padding * 2.0,
    );
    let rect = egui::Rect::from_min_size(
        egui::pos2(panel_rect.min.x + 16.0, panel_rect.max.y - 16.0 - size.y),
        size,
    );

    let painter = ui.painter_at(panel_rect);
    painter.rect_filled(rect, 8.0, egui::Color32::from_black_alpha(180));

    let font = egui::FontId::monospace(12.0);
    for (i, entry) in VIEWPORT_HELP.iter().enumerate() {
        let y = rect.min.y + padding + i as f32 * line_height;
        painter.text(
            egui::pos2(rect.min.x + padding, y),
            egui::Align2::LEFT_TOP,
            entry.key,
            font.clone(),
            egui::Color32::from_rgb(250, 204, 21),
        );
        painter.text(
            egui::pos2(rect.min.x + padding + key_column, y),
            egui::Align2::LEFT_TOP,
            entry.desc,
            font.clone(),
            egui::Color32::from_gray(220),
        );
    }
}

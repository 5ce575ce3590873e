//! Shared UI components.

use eframe::egui::{self, Color32, Response, RichText, Sense, StrokeKind, Ui};

use crate::models::attendance::status;

/// Clickable navigation card: icon, title and a short description stacked
/// vertically. Font sizes scale with the card width.
pub fn dashboard_card(ui: &mut Ui, title: &str, description: &str, icon: &str, size: egui::Vec2) -> Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    if !ui.is_rect_visible(rect) {
        return response;
    }

    let visuals = ui.style().interact(&response);
    let painter = ui.painter();
    painter.rect(rect, 8.0, visuals.bg_fill, visuals.bg_stroke, StrokeKind::Outside);

    let scale = size.x / 200.0;
    let weak = ui.visuals().weak_text_color();
    // (text, vertical position as a fraction of the height, font size, color)
    let lines = [
        (icon, 0.27, 36.0, visuals.text_color()),
        (title, 0.57, 18.0, visuals.text_color()),
        (description, 0.83, 12.0, weak),
    ];
    for (text, y, font_size, color) in lines {
        painter.text(
            egui::pos2(rect.center().x, rect.top() + rect.height() * y),
            egui::Align2::CENTER_CENTER,
            text,
            egui::FontId::proportional(font_size * scale),
            color,
        );
    }

    response
}

/// Status indicator colors.
pub mod colors {
    use super::Color32;

    pub const SUCCESS: Color32 = Color32::from_rgb(100, 200, 100);
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    pub const WARNING: Color32 = Color32::from_rgb(255, 200, 100);
    pub const NEUTRAL: Color32 = Color32::from_rgb(150, 150, 150);
    pub const INFO: Color32 = Color32::from_rgb(100, 160, 255);
    pub const HOLIDAY: Color32 = Color32::from_rgb(190, 130, 255);
}

/// Badge color for a resolved status.
pub fn status_color(code: &str) -> Color32 {
    match code {
        status::PRESENT => colors::SUCCESS,
        status::HALF_DAY => colors::WARNING,
        status::ABSENT => colors::ERROR,
        status::LEAVE => colors::INFO,
        status::HOLIDAY => colors::HOLIDAY,
        _ => colors::NEUTRAL,
    }
}

/// Render a colored status badge.
pub fn status_badge(ui: &mut Ui, code: &str, label: &str) -> Response {
    ui.label(RichText::new(label).strong().color(status_color(code)))
}

/// Render a back button that returns true when clicked.
pub fn back_button(ui: &mut Ui) -> bool {
    ui.button(RichText::new("< Back to Dashboard").size(14.0)).clicked()
}

/// Render a panel header with title.
pub fn panel_header(ui: &mut Ui, title: &str) {
    ui.heading(RichText::new(title).size(24.0));
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(20.0);
}

/// Plain button.
pub fn styled_button(ui: &mut Ui, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(text).size(14.0)))
}

/// Button with a leading phosphor icon.
pub fn styled_button_with_icon(ui: &mut Ui, icon: &str, text: &str) -> Response {
    ui.add(egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0)))
}

/// Highlighted button with a leading phosphor icon, optionally disabled.
pub fn primary_button_with_icon(ui: &mut Ui, enabled: bool, icon: &str, text: &str) -> Response {
    let button = egui::Button::new(RichText::new(format!("{icon} {text}")).size(14.0).strong())
        .fill(ui.visuals().selection.bg_fill);
    ui.add_enabled(enabled, button)
}

/// Dismissable error and success banners.
pub fn message_banners(ui: &mut Ui, error: &mut Option<String>, success: &mut Option<String>) {
    if let Some(message) = error.clone() {
        ui.horizontal(|ui| {
            ui.colored_label(colors::ERROR, message);
            if ui.small_button("x").clicked() {
                *error = None;
            }
        });
    }
    if let Some(message) = success.clone() {
        ui.horizontal(|ui| {
            ui.colored_label(colors::SUCCESS, message);
            if ui.small_button("x").clicked() {
                *success = None;
            }
        });
    }
}

//! Dashboard panel with stats, navigation cards, quick actions, and activity log.

use eframe::egui::{self, Color32, CornerRadius, Margin, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{CLIPBOARD_TEXT, USERS};

use super::app::{App, LogLevel, Panel};
use super::components::dashboard_card;
use crate::state::CheckState;

/// Show the dashboard panel.
///
/// Returns `Some(panel)` if navigation is requested.
pub fn show(app: &mut App, ui: &mut Ui) -> Option<Panel> {
    let mut next_panel = None;

    ui.vertical_centered(|ui| {
        ui.add_space(30.0);

        ui.label(RichText::new("HR Attendance").size(32.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new("Check-in, task reports and attendance review").size(14.0).weak());

        ui.add_space(30.0);

        // Stat cards row
        ui.horizontal(|ui| {
            let available = ui.available_width();
            let start_offset = ((available - 510.0) / 2.0).max(0.0);
            ui.add_space(start_offset);

            stat_card(ui, "Employees", &app.employees.len().to_string(), "Listed by the backend");
            stat_card(ui, "Today", &today_summary(app), "Your check-in status");
            stat_card(
                ui,
                "Loaded Records",
                &app.table.records().len().to_string(),
                "In the HR attendance table",
            );
        });

        ui.add_space(30.0);

        // Navigation cards row
        let available = ui.available_width();
        let num_cards = 2.0;
        let spacing = 30.0;
        let total_spacing = spacing * (num_cards - 1.0);
        let card_width = ((available - total_spacing) / num_cards).clamp(150.0, 250.0);
        let card_height = card_width * 0.75;
        let card_size = egui::vec2(card_width, card_height);
        let total_width = card_width * num_cards + total_spacing;
        let start_offset = ((available - total_width) / 2.0).max(0.0);

        ui.horizontal(|ui| {
            ui.add_space(start_offset);

            if dashboard_card(ui, "My Attendance", "Check in and report tasks", CLIPBOARD_TEXT, card_size).clicked() {
                next_panel = Some(Panel::MyAttendance);
            }

            ui.add_space(spacing);

            if dashboard_card(ui, "HR Attendance", "Review and edit records", USERS, card_size).clicked() {
                next_panel = Some(Panel::HrAttendance);
            }
        });

        ui.add_space(30.0);
    });

    // Two-column layout: Quick Actions | Recent Activity
    let available_width = ui.available_width();
    let column_width = (available_width - 40.0) / 2.0;

    ui.horizontal(|ui| {
        ui.add_space(10.0);

        // Left column - Quick Actions
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.label(RichText::new("Quick Actions").strong());
                    ui.add_space(10.0);

                    let can_check_in = app.my_employee_id().is_some() && app.my_day.can_check_in();
                    ui.add_enabled_ui(can_check_in && !app.is_submitting, |ui| {
                        if ui.button("Check In").clicked() {
                            app.check_in();
                        }
                    });

                    ui.add_space(5.0);

                    if ui.button("Test Connection").clicked() {
                        app.connection_ok = None;
                        app.test_connection();
                    }

                    ui.add_space(5.0);

                    if ui.button("Reload Employees").clicked() {
                        app.load_employees();
                    }
                });
        });

        ui.add_space(20.0);

        // Right column - Recent Activity
        ui.vertical(|ui| {
            ui.set_width(column_width);

            egui::Frame::new()
                .fill(ui.style().visuals.extreme_bg_color)
                .inner_margin(Margin::same(15))
                .corner_radius(CornerRadius::same(8))
                .show(ui, |ui| {
                    ui.set_min_width(column_width - 30.0);

                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Recent Activity").strong());
                        if !app.log_messages.is_empty() && ui.small_button("Clear").clicked() {
                            app.clear_log();
                        }
                    });
                    ui.add_space(10.0);

                    ScrollArea::vertical().max_height(150.0).show(ui, |ui| {
                        if app.log_messages.is_empty() {
                            ui.label(RichText::new("No recent activity").weak());
                        } else {
                            for entry in app.log_messages.iter().rev().take(10) {
                                let color = match entry.level {
                                    LogLevel::Info => Color32::GRAY,
                                    LogLevel::Success => Color32::from_rgb(100, 200, 100),
                                    LogLevel::Warning => Color32::from_rgb(230, 180, 50),
                                    LogLevel::Error => Color32::from_rgb(230, 100, 100),
                                };

                                ui.horizontal(|ui| {
                                    ui.label(
                                        RichText::new(entry.timestamp.format("%H:%M:%S").to_string())
                                            .small()
                                            .color(Color32::DARK_GRAY),
                                    );
                                    ui.label(RichText::new(&entry.message).color(color));
                                });
                            }
                        }
                    });
                });
        });
    });

    next_panel
}

/// Render a stat card with title, value, and subtitle.
fn stat_card(ui: &mut Ui, title: &str, value: &str, subtitle: &str) {
    egui::Frame::new()
        .fill(ui.style().visuals.extreme_bg_color)
        .inner_margin(Margin::same(15))
        .outer_margin(Margin::same(5))
        .corner_radius(CornerRadius::same(8))
        .show(ui, |ui| {
            ui.set_min_width(150.0);

            ui.vertical(|ui| {
                ui.label(RichText::new(title).small());
                ui.label(RichText::new(value).heading().strong());
                ui.label(RichText::new(subtitle).small().weak());
            });
        });
}

fn today_summary(app: &App) -> String {
    if app.my_employee_id().is_none() {
        return "-".to_string();
    }
    match app.my_day.check_state() {
        CheckState::NotCheckedIn => "Not in".to_string(),
        CheckState::CheckedIn { .. } => "Checked in".to_string(),
        CheckState::CheckedOut { .. } => "Done".to_string(),
    }
}

//! Employee self-service panel: check-in/out, daily task report, recent history.

use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, PAPER_PLANE_TILT, PLUS, SIGN_IN, SIGN_OUT, TRASH};

use super::app::App;
use super::components::{
    back_button, colors, panel_header, primary_button_with_icon, status_badge, styled_button_with_icon,
};
use crate::models::attendance::clock_time;
use crate::state::CheckState;
use crate::status::badge_label;

/// Show the employee panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "My Attendance");

    if app.my_employee_id().is_none() {
        ui.colored_label(
            colors::WARNING,
            "No employee configured. Set attendance.employee_id in config.toml.",
        );
        return go_back;
    }

    show_check_controls(app, ui);

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    show_task_report(app, ui);

    ui.add_space(15.0);
    ui.separator();
    ui.add_space(10.0);

    show_history(app, ui);

    go_back
}

fn show_check_controls(app: &mut App, ui: &mut Ui) {
    ui.label(RichText::new("Today").strong());
    ui.add_space(5.0);

    ui.horizontal(|ui| {
        match app.my_day.check_state() {
            CheckState::NotCheckedIn => {
                ui.label("You have not checked in yet.");
            }
            CheckState::CheckedIn { at } => {
                ui.colored_label(colors::SUCCESS, format!("Checked in at {}", clock_time(at)));
            }
            CheckState::CheckedOut { check_in, check_out } => {
                ui.label(format!(
                    "Checked in at {} and out at {}",
                    clock_time(check_in),
                    clock_time(check_out)
                ));
            }
        }

        if let Some(today) = app.my_day.today() {
            ui.add_space(10.0);
            status_badge(ui, &today.final_status, &badge_label(today));
        }
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        ui.label("Latitude:");
        ui.add(
            egui::TextEdit::singleline(&mut app.location_input.latitude)
                .desired_width(90.0)
                .hint_text("optional"),
        );
        ui.label("Longitude:");
        ui.add(
            egui::TextEdit::singleline(&mut app.location_input.longitude)
                .desired_width(90.0)
                .hint_text("optional"),
        );
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let busy = app.is_submitting;

        if primary_button_with_icon(ui, app.my_day.can_check_in() && !busy, SIGN_IN, "Check In").clicked() {
            app.check_in();
        }

        ui.add_space(10.0);

        if primary_button_with_icon(ui, app.my_day.can_check_out() && !busy, SIGN_OUT, "Check Out").clicked() {
            app.check_out();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_my_attendance();
        }
    });
}

fn show_task_report(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("Daily Task Report").strong());
        let toggle = if app.my_day.report_open { "Hide" } else { "Write report" };
        if ui.small_button(toggle).clicked() {
            app.my_day.report_open = !app.my_day.report_open;
        }
    });

    if !app.my_day.report_open {
        return;
    }

    ui.add_space(8.0);

    let mut remove = None;
    egui::Grid::new("task_report_grid")
        .num_columns(4)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.strong("Task");
            ui.strong("Details");
            ui.strong("Hours");
            ui.label("");
            ui.end_row();

            for (index, task) in app.my_day.draft.iter_mut().enumerate() {
                ui.add(
                    egui::TextEdit::singleline(&mut task.title)
                        .desired_width(200.0)
                        .hint_text("What did you work on?"),
                );
                ui.add(egui::TextEdit::singleline(&mut task.description).desired_width(280.0));

                let mut hours = task.hours.unwrap_or(0.0);
                if ui
                    .add(egui::DragValue::new(&mut hours).range(0.0..=24.0).speed(0.25))
                    .changed()
                {
                    task.hours = (hours > 0.0).then_some(hours);
                }

                if ui.small_button(TRASH).on_hover_text("Remove task").clicked() {
                    remove = Some(index);
                }
                ui.end_row();
            }
        });

    if let Some(index) = remove {
        app.my_day.remove_task(index);
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if styled_button_with_icon(ui, PLUS, "Add Task").clicked() {
            app.my_day.add_task();
        }

        ui.add_space(10.0);

        if primary_button_with_icon(ui, !app.is_submitting, PAPER_PLANE_TILT, "Submit Report").clicked() {
            app.submit_task_report();
        }
    });
}

fn show_history(app: &App, ui: &mut Ui) {
    ui.label(RichText::new("Recent Days").strong());
    ui.add_space(5.0);

    ScrollArea::vertical().id_salt("my_history_scroll").show(ui, |ui| {
        egui::Grid::new("my_history_grid")
            .num_columns(4)
            .striped(true)
            .min_col_width(80.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.strong("Date");
                ui.strong("Check In");
                ui.strong("Check Out");
                ui.strong("Status");
                ui.end_row();

                for record in app.my_day.history().iter().take(14) {
                    ui.label(record.date());
                    ui.label(record.record.check_in.as_deref().map(clock_time).unwrap_or_else(|| "-".to_string()));
                    ui.label(record.record.check_out.as_deref().map(clock_time).unwrap_or_else(|| "-".to_string()));
                    status_badge(ui, &record.final_status, &badge_label(record));
                    ui.end_row();
                }

                if app.my_day.history().is_empty() {
                    ui.label("No attendance recorded in this period.");
                    ui.end_row();
                }
            });
    });
}

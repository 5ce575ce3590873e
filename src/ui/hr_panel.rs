//! HR attendance panel: range query, filtered table, bulk edit, analytics and map.

use chrono::{Datelike, Duration, Local};
use eframe::egui::{self, RichText, ScrollArea, Ui};
use egui_phosphor::regular::{
    ARROWS_CLOCKWISE, CARET_DOUBLE_LEFT, CARET_DOUBLE_RIGHT, CARET_LEFT, CARET_RIGHT, CHART_BAR, MAGNIFYING_GLASS,
    MAP_PIN, PENCIL_SIMPLE, SORT_ASCENDING, SORT_DESCENDING,
};

use super::app::App;
use super::components::{
    back_button, colors, panel_header, primary_button_with_icon, status_badge, styled_button, styled_button_with_icon,
};
use crate::bulk::{ShiftTimes, shift_times};
use crate::models::attendance::{DisplayRecord, clock_time, status};
use crate::state::TableModal;
use crate::status::badge_label;
use crate::window::{SortOrder, StatusFilter};

/// Show the HR attendance panel.
///
/// Returns `true` if the back button was clicked.
pub fn show(app: &mut App, ui: &mut Ui) -> bool {
    let mut go_back = false;

    if back_button(ui) {
        go_back = true;
    }

    panel_header(ui, "HR Attendance");

    show_query_bar(app, ui);

    ui.add_space(10.0);

    show_table_controls(app, ui);

    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);

    show_table(app, ui);

    ui.add_space(10.0);

    show_pagination(app, ui);

    go_back
}

fn show_query_bar(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Employee:");
        egui::ComboBox::from_id_salt("hr_employee_filter")
            .width(220.0)
            .selected_text(
                app.hr_filter
                    .employee_id
                    .as_deref()
                    .and_then(|id| app.employees.iter().find(|e| e.id == id))
                    .map(|e| e.display_name())
                    .unwrap_or_else(|| "Select employee".to_string()),
            )
            .show_ui(ui, |ui| {
                for employee in &app.employees {
                    let selected = app.hr_filter.employee_id.as_deref() == Some(employee.id.as_str());
                    if ui.selectable_label(selected, employee.display_name()).clicked() {
                        app.hr_filter.employee_id = Some(employee.id.clone());
                    }
                }
            });

        ui.add_space(10.0);

        ui.label("From:");
        ui.add(egui_extras::DatePickerButton::new(&mut app.hr_filter.start_date).id_salt("hr_start_date"));
        ui.label("To:");
        ui.add(egui_extras::DatePickerButton::new(&mut app.hr_filter.end_date).id_salt("hr_end_date"));

        ui.add_space(10.0);

        if styled_button(ui, "This Month").clicked() {
            let today = Local::now().date_naive();
            app.hr_filter.start_date = today.with_day(1).unwrap_or(today);
            app.hr_filter.end_date = today;
        }

        if styled_button(ui, "Last 30 Days").clicked() {
            let today = Local::now().date_naive();
            app.hr_filter.start_date = today - Duration::days(30);
            app.hr_filter.end_date = today;
        }

        ui.add_space(10.0);

        let ready = app.hr_filter.employee_id.is_some() && !app.table.is_loading();
        if primary_button_with_icon(ui, ready, MAGNIFYING_GLASS, "Load").clicked() {
            app.load_hr_attendance();
        }

        let loaded = app.table.loaded_range().is_some() && !app.table.is_loading();
        if ui
            .add_enabled(loaded, egui::Button::new(ARROWS_CLOCKWISE))
            .on_hover_text("Reload the range shown below")
            .clicked()
        {
            app.reload_hr_attendance();
        }
    });
}

fn show_table_controls(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label("Status:");
        let current = app.table.filter().clone();
        egui::ComboBox::from_id_salt("hr_status_filter")
            .width(140.0)
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                let options =
                    std::iter::once(StatusFilter::All).chain(status::FILTERABLE.iter().map(|&code| StatusFilter::status(code)));
                for option in options {
                    if ui.selectable_label(current == option, option.label()).clicked() {
                        app.table.set_filter(option);
                    }
                }
            });

        ui.add_space(10.0);

        let (icon, hint) = match app.table.order() {
            SortOrder::Desc => (SORT_DESCENDING, "Show oldest first"),
            SortOrder::Asc => (SORT_ASCENDING, "Show newest first"),
        };
        if ui
            .button(format!("{icon} {}", app.table.order()))
            .on_hover_text(hint)
            .clicked()
        {
            app.table.toggle_order();
        }

        ui.add_space(20.0);
        ui.separator();
        ui.add_space(10.0);

        for (code, count) in app.table.counts() {
            status_badge(ui, &code, &format!("{}: {count}", status::name(&code)));
            ui.add_space(6.0);
        }
    });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let has_rows = !app.table.visible().is_empty();

        if ui.add_enabled(has_rows, egui::Button::new("Select Page")).clicked() {
            app.table.select_visible();
        }

        if ui
            .add_enabled(app.table.selected_count() > 0, egui::Button::new("Clear Selection"))
            .clicked()
        {
            app.table.clear_selection();
        }

        ui.label(format!("{} selected", app.table.selected_count()));

        ui.add_space(20.0);

        let can_edit = app.table.selected_count() > 0 && !app.is_submitting;
        if primary_button_with_icon(ui, can_edit, PENCIL_SIMPLE, "Bulk Edit").clicked() {
            app.table.open(TableModal::BulkEdit);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, CHART_BAR, "Analytics").clicked() {
            app.table.open(TableModal::Analytics);
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, MAP_PIN, "Locations").clicked() {
            app.table.open(TableModal::Map);
        }
    });
}

fn show_table(app: &mut App, ui: &mut Ui) {
    let rows = app.table.visible();
    let mut toggled: Option<String> = None;

    ScrollArea::both().id_salt("hr_table_scroll").max_height(360.0).show(ui, |ui| {
        egui::Grid::new("hr_attendance_grid")
            .num_columns(6)
            .striped(true)
            .min_col_width(70.0)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label("");
                ui.strong("Date");
                ui.strong("Status");
                ui.strong("Check In");
                ui.strong("Check Out");
                ui.strong("Location");
                ui.end_row();

                for record in &rows {
                    let mut checked = app.table.is_selected(record.id());
                    if ui
                        .add_enabled(record.has_id(), egui::Checkbox::new(&mut checked, ""))
                        .on_disabled_hover_text("This day has no stored record")
                        .changed()
                    {
                        toggled = Some(record.id().to_string());
                    }
                    ui.label(record.date());
                    status_badge(ui, &record.final_status, &badge_label(record));
                    ui.label(time_cell(record.record.check_in.as_deref()));
                    ui.label(time_cell(record.record.check_out.as_deref()));
                    ui.label(location_cell(record));
                    ui.end_row();
                }

                if rows.is_empty() {
                    if app.table.records().is_empty() {
                        ui.label("No data. Pick an employee and range, then click 'Load'.");
                    } else {
                        ui.label("No records match this status.");
                    }
                    ui.end_row();
                }
            });
    });

    if let Some(id) = toggled {
        app.table.toggle_selected(&id);
    }
}

fn show_pagination(app: &mut App, ui: &mut Ui) {
    ui.horizontal(|ui| {
        match app.table.showing_range() {
            Some((start, end, total)) => ui.label(format!("Showing {start}-{end} of {total} records")),
            None => ui.label("0 records"),
        };

        ui.add_space(20.0);
        ui.separator();
        ui.add_space(10.0);

        if ui
            .add_enabled(app.table.has_prev(), egui::Button::new(CARET_DOUBLE_LEFT))
            .on_hover_text("First page")
            .clicked()
        {
            app.table.first_page();
        }

        if ui
            .add_enabled(app.table.has_prev(), egui::Button::new(CARET_LEFT))
            .on_hover_text("Previous page")
            .clicked()
        {
            app.table.prev_page();
        }

        ui.label(format!(
            "Page {page} of {total}",
            page = app.table.page() + 1,
            total = app.table.total_pages()
        ));

        if ui
            .add_enabled(app.table.has_next(), egui::Button::new(CARET_RIGHT))
            .on_hover_text("Next page")
            .clicked()
        {
            app.table.next_page();
        }

        if ui
            .add_enabled(app.table.has_next(), egui::Button::new(CARET_DOUBLE_RIGHT))
            .on_hover_text("Last page")
            .clicked()
        {
            app.table.last_page();
        }
    });
}

fn time_cell(timestamp: Option<&str>) -> String {
    timestamp.map(clock_time).unwrap_or_else(|| "-".to_string())
}

fn location_cell(record: &DisplayRecord) -> String {
    match record.record.location.as_ref().and_then(|l| l.coordinates()) {
        Some((lat, lng)) => format!("{lat:.4}, {lng:.4}"),
        None => "-".to_string(),
    }
}

/// Render whichever overlay the table has open.
pub fn show_modals(app: &mut App, ctx: &egui::Context) {
    match app.table.modal {
        TableModal::None => {}
        TableModal::BulkEdit => show_bulk_edit(app, ctx),
        TableModal::Analytics => show_analytics(app, ctx),
        TableModal::Map => show_map(app, ctx),
    }
}

fn show_bulk_edit(app: &mut App, ctx: &egui::Context) {
    let mut open = true;
    let mut apply = false;
    let mut cancel = false;

    egui::Window::new("Bulk Edit")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(format!("{} records selected", app.table.selected_count()));
            ui.add_space(10.0);

            ui.horizontal(|ui| {
                ui.label("New status:");
                egui::ComboBox::from_id_salt("bulk_status")
                    .selected_text(status::name(&app.table.bulk_status))
                    .show_ui(ui, |ui| {
                        for code in status::BULK_EDITABLE {
                            ui.selectable_value(&mut app.table.bulk_status, code.to_string(), status::name(code));
                        }
                    });
            });

            ui.add_space(8.0);

            let preview = match shift_times(&app.table.bulk_status) {
                ShiftTimes::Fixed { check_in, check_out } => format!(
                    "Check in {} and check out {} on each date",
                    check_in.format("%H:%M"),
                    check_out.format("%H:%M")
                ),
                ShiftTimes::Cleared => "Check in and check out will be cleared".to_string(),
                ShiftTimes::Untouched => "Check times are left unchanged".to_string(),
            };
            ui.label(RichText::new(preview).weak());

            ui.add_space(15.0);

            ui.horizontal(|ui| {
                let enabled = app.table.selected_count() > 0 && !app.is_submitting;
                if primary_button_with_icon(ui, enabled, PENCIL_SIMPLE, "Apply").clicked() {
                    apply = true;
                }
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
                if app.is_submitting {
                    ui.spinner();
                }
            });
        });

    if apply {
        app.submit_bulk_update();
    }
    if cancel || !open {
        app.table.close_modal();
    }
}

fn show_analytics(app: &mut App, ctx: &egui::Context) {
    let mut open = true;

    egui::Window::new("Attendance Analytics")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(RichText::new("Backend summary").strong());
            ui.add_space(5.0);

            match &app.statistics {
                Some(statistics) => {
                    egui::Grid::new("analytics_backend_grid")
                        .num_columns(2)
                        .striped(true)
                        .spacing([20.0, 6.0])
                        .show(ui, |ui| {
                            for (label, value) in statistics.counters() {
                                ui.label(label);
                                ui.label(value.to_string());
                                ui.end_row();
                            }
                            if let Some(percentage) = statistics.attendance_percentage {
                                ui.label("Attendance");
                                ui.label(format!("{percentage:.1}%"));
                                ui.end_row();
                            }
                        });
                }
                None if app.table.is_loading() => {
                    ui.spinner();
                }
                None => {
                    ui.colored_label(colors::NEUTRAL, "No statistics loaded for this range.");
                }
            }

            ui.add_space(10.0);
            ui.separator();
            ui.add_space(5.0);

            ui.label(RichText::new(format!("Loaded rows ({})", app.table.filter().label())).strong());
            ui.add_space(5.0);

            let counts = app.table.counts();
            if counts.is_empty() {
                ui.label("No rows.");
            }
            for (code, count) in counts {
                status_badge(ui, &code, &format!("{}: {count}", status::name(&code)));
            }
        });

    if !open {
        app.table.close_modal();
    }
}

fn show_map(app: &mut App, ctx: &egui::Context) {
    let mut open = true;
    let points = app.table.map_points();

    egui::Window::new("Check-in Locations")
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            if points.is_empty() {
                ui.label("No records with a valid location.");
                return;
            }

            ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                egui::Grid::new("map_points_grid")
                    .num_columns(4)
                    .striped(true)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.strong("Date");
                        ui.strong("Status");
                        ui.strong("Coordinates");
                        ui.label("");
                        ui.end_row();

                        for point in &points {
                            ui.label(&point.date);
                            status_badge(ui, &point.status, &status::name(&point.status));
                            ui.label(format!("{:.6}, {:.6}", point.latitude, point.longitude));
                            ui.hyperlink_to(format!("{MAP_PIN} Open map"), point.map_url());
                            ui.end_row();
                        }
                    });
            });
        });

    if !open {
        app.table.close_modal();
    }
}

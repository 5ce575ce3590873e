//! Main application UI.

use chrono::{DateTime, Duration, Local, NaiveDate};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::bulk::{self, BatchOutcome};
use crate::client::{ApiClient, AttendanceApi};
use crate::config::{AppConfig, StartPanel};
use crate::models::{AttendanceRecord, AttendanceStatistics, Employee, Location, TaskReport};
use crate::state::{AttendanceTable, EmployeeDay, LoadedRange};

use super::components::{colors, message_banners};
use super::{dashboard, employee_panel, hr_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Dashboard,
    MyAttendance,
    HrAttendance,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Dashboard => "Dashboard",
            Panel::MyAttendance => "My Attendance",
            Panel::HrAttendance => "HR Attendance",
        }
    }
}

impl From<StartPanel> for Panel {
    fn from(panel: StartPanel) -> Self {
        match panel {
            StartPanel::Dashboard => Panel::Dashboard,
            StartPanel::Employee => Panel::MyAttendance,
            StartPanel::Hr => Panel::HrAttendance,
        }
    }
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    EmployeesLoaded(Vec<Employee>),
    HrAttendanceLoaded {
        seq: u64,
        range: LoadedRange,
        records: Vec<AttendanceRecord>,
    },
    HrLoadFailed {
        seq: u64,
        error: String,
    },
    StatisticsLoaded {
        seq: u64,
        statistics: AttendanceStatistics,
    },
    MyAttendanceLoaded(Vec<AttendanceRecord>),
    LoadError(String),

    // Employee actions
    CheckedIn(AttendanceRecord),
    CheckedOut(AttendanceRecord),
    ReportSubmitted,

    // HR actions
    BulkUpdated(BatchOutcome),
    BulkFailed(String),

    OperationFailed(String),

    // Connection test
    ConnectionTestResult(bool),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Date range and employee picked in the HR view.
#[derive(Clone)]
pub struct HrFilter {
    pub employee_id: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl HrFilter {
    fn new(range_days: i64) -> Self {
        let today = Local::now().date_naive();
        Self {
            employee_id: None,
            start_date: today - Duration::days(range_days),
            end_date: today,
        }
    }
}

/// Manual coordinates for check-in on machines without a location source.
#[derive(Default, Clone)]
pub struct LocationInput {
    pub latitude: String,
    pub longitude: String,
}

impl LocationInput {
    /// Parsed location, or `None` if either side is missing or not a number.
    pub fn parse(&self) -> Option<Location> {
        let latitude = self.latitude.trim().parse::<f64>().ok()?;
        let longitude = self.longitude.trim().parse::<f64>().ok()?;
        let location = Location::new(latitude, longitude);
        location.is_valid().then_some(location)
    }
}

/// Main application state.
pub struct App {
    // Runtime and backend
    pub rt: tokio::runtime::Runtime,
    pub api: ApiClient,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Cached data
    pub employees: Vec<Employee>,
    pub statistics: Option<AttendanceStatistics>,

    // View state
    pub hr_filter: HrFilter,
    pub table: AttendanceTable,
    pub my_day: EmployeeDay,
    pub location_input: LocationInput,

    // Loading states
    pub is_submitting: bool,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,

    // Dialogs
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub connection_ok: Option<bool>,
}

impl App {
    pub fn new(api: ApiClient, config: AppConfig, rt: tokio::runtime::Runtime, startup_error: Option<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            api,
            tx,
            rx,
            current_panel: config.ui.start_panel.into(),
            employees: Vec::new(),
            statistics: None,
            hr_filter: HrFilter::new(config.attendance.default_range_days),
            table: AttendanceTable::new(config.attendance.page_size),
            my_day: EmployeeDay::new(),
            location_input: LocationInput::default(),
            is_submitting: false,
            log_messages: Vec::new(),
            config,
            error_message: startup_error,
            success_message: None,
            connection_ok: None,
        };

        // Load initial data
        app.load_employees();
        app.load_my_attendance();
        app.test_connection();

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Clear the activity log.
    pub fn clear_log(&mut self) {
        self.log_messages.clear();
    }

    /// Employee the self-service view acts for.
    pub fn my_employee_id(&self) -> Option<&str> {
        self.config.attendance.employee_id.as_deref()
    }

    fn fail(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_message = Some(message.clone());
        self.log_error(message);
    }

    /// Load the employee list.
    pub fn load_employees(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match api.list_employees().await {
                Ok(employees) => {
                    let _ = tx.send(UiMessage::EmployeesLoaded(employees));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load employees: {e}")));
                }
            }
        });
    }

    /// Fetch the range picked in the HR query bar.
    pub fn load_hr_attendance(&mut self) {
        let Some(employee_id) = self.hr_filter.employee_id.clone() else {
            self.error_message = Some("Select an employee first".to_string());
            return;
        };
        if self.hr_filter.start_date > self.hr_filter.end_date {
            self.error_message = Some("Start date must not be after end date".to_string());
            return;
        }

        self.fetch_hr_range(LoadedRange {
            employee_id,
            start_date: self.hr_filter.start_date,
            end_date: self.hr_filter.end_date,
        });
    }

    /// Refetch the range the table currently shows, whatever the picker says.
    pub fn reload_hr_attendance(&mut self) {
        if let Some(range) = self.table.loaded_range().cloned() {
            self.fetch_hr_range(range);
        }
    }

    /// Fetch the full record set and statistics for one range.
    ///
    /// Responses from an older fetch are dropped when they arrive late.
    fn fetch_hr_range(&mut self, range: LoadedRange) {
        let seq = self.table.begin_load();
        self.statistics = None;
        self.log_info(format!(
            "Loading attendance for {} ({} to {})",
            range.employee_id, range.start_date, range.end_date
        ));

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let (records, statistics) = tokio::join!(
                api.fetch_attendance(&range.employee_id, range.start_date, range.end_date),
                api.fetch_statistics(&range.employee_id, range.start_date, range.end_date)
            );

            match records {
                Ok(records) => {
                    let _ = tx.send(UiMessage::HrAttendanceLoaded { seq, range, records });
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::HrLoadFailed {
                        seq,
                        error: format!("Failed to load attendance: {e}"),
                    });
                }
            }

            match statistics {
                Ok(statistics) => {
                    let _ = tx.send(UiMessage::StatisticsLoaded { seq, statistics });
                }
                Err(e) => {
                    tracing::warn!("Statistics unavailable: {e}");
                }
            }
        });
    }

    /// Fetch the current month for the self-service view.
    pub fn load_my_attendance(&mut self) {
        let Some(employee_id) = self.my_employee_id().map(str::to_string) else {
            return;
        };

        let today = Local::now().date_naive();
        let start = today - Duration::days(self.config.attendance.default_range_days);
        let api = self.api.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match api.fetch_attendance(&employee_id, start, today).await {
                Ok(records) => {
                    let _ = tx.send(UiMessage::MyAttendanceLoaded(records));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(format!("Failed to load your attendance: {e}")));
                }
            }
        });
    }

    /// Check in with the optional manual location.
    pub fn check_in(&mut self) {
        let location = self.location_input.parse();
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.is_submitting = true;

        self.rt.spawn(async move {
            match api.check_in(location).await {
                Ok(record) => {
                    let _ = tx.send(UiMessage::CheckedIn(record));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(format!("Check-in failed: {e}")));
                }
            }
        });
    }

    /// Check out with the optional manual location.
    pub fn check_out(&mut self) {
        let location = self.location_input.parse();
        let api = self.api.clone();
        let tx = self.tx.clone();
        self.is_submitting = true;

        self.rt.spawn(async move {
            match api.check_out(location).await {
                Ok(record) => {
                    let _ = tx.send(UiMessage::CheckedOut(record));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(format!("Check-out failed: {e}")));
                }
            }
        });
    }

    /// Validate the task draft locally, then submit it.
    pub fn submit_task_report(&mut self) {
        let today = Local::now().date_naive();
        let report: TaskReport = match self.my_day.build_report(today) {
            Ok(report) => report,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.is_submitting = true;

        self.rt.spawn(async move {
            match api.submit_task_report(&report).await {
                Ok(()) => {
                    let _ = tx.send(UiMessage::ReportSubmitted);
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(format!("Report submission failed: {e}")));
                }
            }
        });
    }

    /// Apply the bulk-edit draft to the selected rows.
    pub fn submit_bulk_update(&mut self) {
        let requests = match self.table.bulk_requests() {
            Ok(requests) => requests,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        self.log_info(format!(
            "Updating {} records to '{}'",
            requests.len(),
            self.table.bulk_status
        ));

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.is_submitting = true;

        self.rt.spawn(async move {
            match bulk::submit_batch(&api, &requests).await {
                Ok(outcome) => {
                    let _ = tx.send(UiMessage::BulkUpdated(outcome));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::BulkFailed(e.to_string()));
                }
            }
        });
    }

    /// Check that the backend answers at all.
    pub fn test_connection(&mut self) {
        let api = self.api.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let ok = api.test_connection().await.unwrap_or(false);
            let _ = tx.send(UiMessage::ConnectionTestResult(ok));
        });
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::EmployeesLoaded(employees) => {
                    if self.hr_filter.employee_id.is_none() {
                        self.hr_filter.employee_id = employees.first().map(|e| e.id.clone());
                    }
                    self.employees = employees;
                }
                UiMessage::HrAttendanceLoaded { seq, range, records } => {
                    if self.table.finish_load(seq, range, &records) {
                        self.log_success(format!("Loaded {} attendance records", records.len()));
                    }
                }
                UiMessage::HrLoadFailed { seq, error } => {
                    if self.table.fail_load(seq) {
                        self.fail(error);
                    }
                }
                UiMessage::StatisticsLoaded { seq, statistics } => {
                    if self.table.is_current(seq) {
                        self.statistics = Some(statistics);
                    }
                }
                UiMessage::MyAttendanceLoaded(records) => {
                    self.my_day.replace_records(&records, Local::now().date_naive());
                }
                UiMessage::LoadError(e) => {
                    self.fail(e);
                }
                UiMessage::CheckedIn(record) => {
                    self.is_submitting = false;
                    self.my_day.apply_check_result(record);
                    self.success_message = Some("Checked in".to_string());
                    self.log_success("Checked in");
                }
                UiMessage::CheckedOut(record) => {
                    self.is_submitting = false;
                    self.my_day.apply_check_result(record);
                    self.success_message = Some("Checked out".to_string());
                    self.log_success("Checked out");
                }
                UiMessage::ReportSubmitted => {
                    self.is_submitting = false;
                    self.my_day.on_report_submitted();
                    self.success_message = Some("Task report submitted".to_string());
                    self.log_success("Task report submitted");
                }
                UiMessage::BulkUpdated(outcome) => {
                    self.is_submitting = false;
                    self.table.on_bulk_result(true);
                    self.success_message = Some(format!("Updated {} records", outcome.updated));
                    self.log_success(format!("Bulk update applied to {} records", outcome.updated));
                    self.reload_hr_attendance();
                }
                UiMessage::BulkFailed(e) => {
                    self.is_submitting = false;
                    self.table.on_bulk_result(false);
                    self.fail(e);
                }
                UiMessage::OperationFailed(e) => {
                    self.is_submitting = false;
                    self.fail(e);
                }
                UiMessage::ConnectionTestResult(ok) => {
                    self.connection_ok = Some(ok);
                    if ok {
                        self.log_success("Backend reachable");
                    } else {
                        self.log_warning("Backend unreachable");
                    }
                }
            }
        }
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let (color, text) = match self.connection_ok {
                        None => (colors::NEUTRAL, "Checking..."),
                        Some(true) => (colors::SUCCESS, "Connected"),
                        Some(false) => (colors::ERROR, "Unreachable"),
                    };
                    ui.colored_label(color, format!("Backend: {text}"));
                    ui.label(format!("({})", self.api_base_url()));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.table.is_loading() || self.is_submitting {
                            ui.spinner();
                        }
                        ui.label(self.current_panel.name());
                    });
                });
            });
    }

    fn api_base_url(&self) -> &str {
        self.config.api.normalized_base_url()
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.table.is_loading() || self.is_submitting || self.connection_ok.is_none() {
            ctx.request_repaint();
        }

        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            message_banners(ui, &mut self.error_message, &mut self.success_message);

            match self.current_panel {
                Panel::Dashboard => {
                    if let Some(next) = dashboard::show(self, ui) {
                        self.current_panel = next;
                    }
                }
                Panel::MyAttendance => {
                    if employee_panel::show(self, ui) {
                        self.current_panel = Panel::Dashboard;
                    }
                }
                Panel::HrAttendance => {
                    if hr_panel::show(self, ui) {
                        self.current_panel = Panel::Dashboard;
                    }
                }
            }
        });

        hr_panel::show_modals(self, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_input_parse() {
        let input = LocationInput {
            latitude: " 23.81 ".to_string(),
            longitude: "90.41".to_string(),
        };
        assert_eq!(input.parse(), Some(Location::new(23.81, 90.41)));

        let missing = LocationInput {
            latitude: "23.81".to_string(),
            longitude: String::new(),
        };
        assert_eq!(missing.parse(), None);

        let nan = LocationInput {
            latitude: "NaN".to_string(),
            longitude: "1".to_string(),
        };
        assert_eq!(nan.parse(), None);
    }

    #[test]
    fn test_start_panel_mapping() {
        assert_eq!(Panel::from(StartPanel::Hr), Panel::HrAttendance);
        assert_eq!(Panel::from(StartPanel::Employee), Panel::MyAttendance);
        assert_eq!(Panel::MyAttendance.name(), "My Attendance");
    }
}

//! Employee self-service state: today's check-in status and the task-report draft.

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::attendance::{AttendanceRecord, DisplayRecord};
use crate::models::task_report::{TaskEntry, TaskReport};
use crate::status::resolve;

/// Where the employee stands today.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    NotCheckedIn,
    CheckedIn {
        at: String,
    },
    CheckedOut {
        check_in: String,
        check_out: String,
    },
}

impl CheckState {
    /// Derive from today's record, if the backend has one.
    pub fn from_record(record: Option<&AttendanceRecord>) -> Self {
        match record.map(|r| (r.check_in.as_ref(), r.check_out.as_ref())) {
            Some((Some(check_in), Some(check_out))) => Self::CheckedOut {
                check_in: check_in.clone(),
                check_out: check_out.clone(),
            },
            Some((Some(at), None)) => Self::CheckedIn { at: at.clone() },
            _ => Self::NotCheckedIn,
        }
    }
}

/// State owned by the employee view.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDay {
    today: Option<DisplayRecord>,
    check_state: CheckState,
    history: Vec<DisplayRecord>,
    /// Editable task lines. Blank lines are dropped on submit.
    pub draft: Vec<TaskEntry>,
    pub report_open: bool,
}

impl EmployeeDay {
    pub fn new() -> Self {
        Self {
            draft: vec![TaskEntry::default()],
            ..Default::default()
        }
    }

    /// Install a fetched history and pick out `today`.
    pub fn replace_records(&mut self, records: &[AttendanceRecord], today: NaiveDate) {
        let todays = records.iter().find(|r| r.calendar_date() == Some(today));
        self.check_state = CheckState::from_record(todays);
        self.today = todays.map(resolve);
        self.history = records.iter().map(resolve).collect();
    }

    /// Apply the record returned by a check-in or check-out call.
    pub fn apply_check_result(&mut self, record: AttendanceRecord) {
        self.check_state = CheckState::from_record(Some(&record));
        let display = resolve(&record);
        match self.history.iter_mut().find(|r| r.id() == display.id()) {
            Some(existing) => *existing = display.clone(),
            None => self.history.insert(0, display.clone()),
        }
        self.today = Some(display);
    }

    pub fn check_state(&self) -> &CheckState {
        &self.check_state
    }

    pub fn today(&self) -> Option<&DisplayRecord> {
        self.today.as_ref()
    }

    pub fn history(&self) -> &[DisplayRecord] {
        &self.history
    }

    pub fn can_check_in(&self) -> bool {
        self.check_state == CheckState::NotCheckedIn
    }

    pub fn can_check_out(&self) -> bool {
        matches!(self.check_state, CheckState::CheckedIn { .. })
    }

    pub fn add_task(&mut self) {
        self.draft.push(TaskEntry::default());
    }

    pub fn remove_task(&mut self, index: usize) {
        if index < self.draft.len() {
            self.draft.remove(index);
        }
        if self.draft.is_empty() {
            self.draft.push(TaskEntry::default());
        }
    }

    /// Validate the draft into a report. The draft is kept until submission succeeds.
    pub fn build_report(&self, date: NaiveDate) -> Result<TaskReport> {
        TaskReport::from_draft(date, &self.draft)
    }

    /// Reset the draft after a successful submission.
    pub fn on_report_submitted(&mut self) {
        self.draft = vec![TaskEntry::default()];
        self.report_open = false;
    }
}

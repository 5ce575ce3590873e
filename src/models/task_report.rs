//! Daily task report submitted by employees.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// One task line of a daily report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f32>,
}

impl TaskEntry {
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// Report payload for `POST /task-reports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    pub date: NaiveDate,
    pub tasks: Vec<TaskEntry>,
}

impl TaskReport {
    /// Build a report from draft entries, dropping blank lines.
    ///
    /// Fails when nothing is left to send.
    pub fn from_draft(date: NaiveDate, draft: &[TaskEntry]) -> Result<Self> {
        let tasks: Vec<TaskEntry> = draft
            .iter()
            .filter(|t| !t.is_blank())
            .map(|t| TaskEntry {
                title: t.title.trim().to_string(),
                description: t.description.trim().to_string(),
                hours: t.hours,
            })
            .collect();

        let report = Self { date, tasks };
        report.validate()?;
        Ok(report)
    }

    /// Reject reports the backend should never see.
    pub fn validate(&self) -> Result<()> {
        if self.tasks.iter().all(TaskEntry::is_blank) {
            return Err(AppError::validation("Add at least one task before submitting"));
        }
        if let Some(task) = self.tasks.iter().find(|t| t.hours.is_some_and(|h| !h.is_finite() || h < 0.0)) {
            return Err(AppError::validation(format!(
                "Hours for '{}' must be zero or more",
                task.title
            )));
        }
        Ok(())
    }
}

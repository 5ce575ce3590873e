//! Bulk status edits for the HR attendance table.
//!
//! Target statuses carry fixed shift times: `present` is 09:30-17:30,
//! `half-day` is 09:30-13:30 and `absent` clears both times. Any other
//! status leaves the check times untouched.

use chrono::NaiveTime;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::client::AttendanceApi;
use crate::error::{AppError, Result};
use crate::models::attendance::{DisplayRecord, status};

/// Check times written alongside a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftTimes {
    /// Set both times on the record's date.
    Fixed { check_in: NaiveTime, check_out: NaiveTime },
    /// Send explicit nulls.
    Cleared,
    /// Omit both fields.
    Untouched,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Shift times implied by a target status.
pub fn shift_times(target: &str) -> ShiftTimes {
    match target {
        status::PRESENT => ShiftTimes::Fixed {
            check_in: hm(9, 30),
            check_out: hm(17, 30),
        },
        status::HALF_DAY => ShiftTimes::Fixed {
            check_in: hm(9, 30),
            check_out: hm(13, 30),
        },
        status::ABSENT => ShiftTimes::Cleared,
        _ => ShiftTimes::Untouched,
    }
}

/// One record update, serialized as the backend expects.
///
/// `check_in`/`check_out`: outer `None` omits the field, `Some(None)` sends null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub record_id: String,
    pub status: String,
    pub employee_id: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out: Option<Option<String>>,
}

impl BulkUpdateRequest {
    /// Build the update for one record.
    pub fn for_record(record: &DisplayRecord, target: &str, employee_id: &str) -> Self {
        let date = record.record.day_string();
        let stamp = |time: NaiveTime| format!("{date}T{}", time.format("%H:%M:%S"));

        let (check_in, check_out) = match shift_times(target) {
            ShiftTimes::Fixed { check_in, check_out } => (Some(Some(stamp(check_in))), Some(Some(stamp(check_out)))),
            ShiftTimes::Cleared => (Some(None), Some(None)),
            ShiftTimes::Untouched => (None, None),
        };

        Self {
            record_id: record.id().to_string(),
            status: target.to_string(),
            employee_id: record
                .record
                .employee_id
                .clone()
                .unwrap_or_else(|| employee_id.to_string()),
            date,
            check_in,
            check_out,
        }
    }
}

/// Build one request per selected record.
///
/// Rejects an empty selection or blank status before anything is sent.
pub fn build_requests(selection: &[&DisplayRecord], target: &str, employee_id: &str) -> Result<Vec<BulkUpdateRequest>> {
    if selection.is_empty() {
        return Err(AppError::validation("Select at least one record to update"));
    }
    let target = target.trim();
    if target.is_empty() {
        return Err(AppError::validation("Choose a status to apply"));
    }
    if let Some(record) = selection.iter().find(|r| !r.has_id()) {
        return Err(AppError::validation(format!(
            "The record for {} has no id and cannot be updated",
            record.date()
        )));
    }

    Ok(selection
        .iter()
        .map(|record| BulkUpdateRequest::for_record(record, target, employee_id))
        .collect())
}

/// Aggregate result of a successful batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub updated: usize,
}

/// Issue all updates concurrently and report all-or-nothing.
///
/// Individual requests are not rolled back when a sibling fails, and
/// nothing is retried.
pub async fn submit_batch<A: AttendanceApi>(api: &A, requests: &[BulkUpdateRequest]) -> Result<BatchOutcome> {
    if requests.is_empty() {
        return Err(AppError::validation("Select at least one record to update"));
    }

    let results = join_all(requests.iter().map(|r| api.update_attendance(r))).await;

    let total = results.len();
    let mut failed = 0;
    for (request, result) in requests.iter().zip(&results) {
        if let Err(e) = result {
            warn!("Update of record {} failed: {e}", request.record_id);
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(AppError::BulkUpdate { failed, total });
    }

    info!("Bulk update applied to {total} records");
    Ok(BatchOutcome { updated: total })
}

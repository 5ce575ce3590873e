//! Attendance DTOs and view models.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::location::{Location, lenient_location};

/// Status vocabulary shared by the backend and the views.
pub mod status {
    pub const PRESENT: &str = "present";
    pub const HALF_DAY: &str = "half-day";
    pub const ABSENT: &str = "absent";
    pub const LEAVE: &str = "leave";
    pub const HOLIDAY: &str = "holiday";
    pub const WEEKEND: &str = "weekend";

    /// Statuses offered in the HR table filter, in display order.
    pub const FILTERABLE: [&str; 6] = [PRESENT, HALF_DAY, ABSENT, LEAVE, HOLIDAY, WEEKEND];

    /// Statuses HR can assign through a bulk edit.
    pub const BULK_EDITABLE: [&str; 3] = [PRESENT, HALF_DAY, ABSENT];

    /// Human-readable name for a status code.
    pub fn name(code: &str) -> String {
        match code {
            PRESENT => "Present".to_string(),
            HALF_DAY => "Half Day".to_string(),
            ABSENT => "Absent".to_string(),
            LEAVE => "On Leave".to_string(),
            HOLIDAY => "Holiday".to_string(),
            WEEKEND => "Weekend".to_string(),
            other => humanize(other),
        }
    }

    fn humanize(code: &str) -> String {
        let spaced = code.replace(['-', '_'], " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Day flags computed by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendanceFlags {
    pub is_late: bool,
    pub is_leave: bool,
    pub is_holiday: bool,
    pub is_weekend: bool,
}

/// One attendance day as returned by the backend. Read-only in this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawAttendanceRecord")]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: Option<String>,
    /// Attendance day as sent by the backend, usually `YYYY-MM-DD`.
    pub date: String,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub status: Option<String>,
    pub flags: AttendanceFlags,
    pub location: Option<Location>,
    pub holiday_title: Option<String>,
}

/// Wire shape: flags arrive either nested or flattened on the record.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAttendanceRecord {
    #[serde(default, alias = "_id")]
    id: String,
    #[serde(default)]
    employee_id: Option<String>,
    #[serde(default)]
    date: String,
    #[serde(default)]
    check_in: Option<String>,
    #[serde(default)]
    check_out: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    flags: Option<AttendanceFlags>,
    #[serde(default)]
    is_late: Option<bool>,
    #[serde(default)]
    is_leave: Option<bool>,
    #[serde(default)]
    is_holiday: Option<bool>,
    #[serde(default)]
    is_weekend: Option<bool>,
    #[serde(default, deserialize_with = "lenient_location")]
    location: Option<Location>,
    #[serde(default)]
    holiday_title: Option<String>,
}

impl From<RawAttendanceRecord> for AttendanceRecord {
    fn from(raw: RawAttendanceRecord) -> Self {
        let nested = raw.flags.unwrap_or_default();
        let flags = AttendanceFlags {
            is_late: nested.is_late || raw.is_late.unwrap_or(false),
            is_leave: nested.is_leave || raw.is_leave.unwrap_or(false),
            is_holiday: nested.is_holiday || raw.is_holiday.unwrap_or(false),
            is_weekend: nested.is_weekend || raw.is_weekend.unwrap_or(false),
        };

        Self {
            id: raw.id,
            employee_id: raw.employee_id,
            date: raw.date,
            check_in: raw.check_in.filter(|s| !s.trim().is_empty()),
            check_out: raw.check_out.filter(|s| !s.trim().is_empty()),
            status: raw.status.filter(|s| !s.trim().is_empty()),
            flags,
            location: raw.location,
            holiday_title: raw.holiday_title.filter(|s| !s.trim().is_empty()),
        }
    }
}

impl AttendanceRecord {
    /// Parsed calendar day, if the date string starts with `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    /// Date as `YYYY-MM-DD` when parseable, otherwise the raw string.
    pub fn day_string(&self) -> String {
        self.calendar_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| self.date.clone())
    }
}

/// Wall-clock `HH:MM` for a backend timestamp, or the raw string if unparseable.
///
/// Offset-carrying timestamps are shown in local time; naive ones as-is.
pub fn clock_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%H:%M").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, fmt) {
            return dt.format("%H:%M").to_string();
        }
    }
    timestamp.to_string()
}

/// Attendance record with its resolved display status.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub record: AttendanceRecord,
    pub final_status: String,
    pub holiday_title: Option<String>,
}

impl DisplayRecord {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn date(&self) -> &str {
        &self.record.date
    }

    /// Rows without a backend id cannot be addressed by an update.
    pub fn has_id(&self) -> bool {
        !self.record.id.trim().is_empty()
    }

    /// Sort key: the calendar day. Unparseable dates compare equal to each other.
    pub fn date_key(&self) -> Option<NaiveDate> {
        self.record.calendar_date()
    }
}

/// Per-range summary computed by the backend. Passed through to the analytics view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStatistics {
    #[serde(default)]
    pub total_days: Option<u32>,
    #[serde(default)]
    pub present_days: Option<u32>,
    #[serde(default)]
    pub absent_days: Option<u32>,
    #[serde(default)]
    pub late_days: Option<u32>,
    #[serde(default)]
    pub leave_days: Option<u32>,
    #[serde(default)]
    pub half_days: Option<u32>,
    #[serde(default)]
    pub holidays: Option<u32>,
    #[serde(default)]
    pub weekends: Option<u32>,
    #[serde(default)]
    pub attendance_percentage: Option<f64>,
    /// Fields this client does not know about, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AttendanceStatistics {
    /// Known counters as label/value pairs, skipping the ones the backend omitted.
    pub fn counters(&self) -> Vec<(&'static str, u32)> {
        [
            ("Total Days", self.total_days),
            ("Present", self.present_days),
            ("Absent", self.absent_days),
            ("Late", self.late_days),
            ("On Leave", self.leave_days),
            ("Half Days", self.half_days),
            ("Holidays", self.holidays),
            ("Weekends", self.weekends),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_flags() {
        let json = r#"{
            "id": "r1",
            "date": "2024-03-01",
            "checkIn": "2024-03-01T09:02:00",
            "status": "present",
            "flags": { "isLate": true }
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "r1");
        assert_eq!(record.check_in.as_deref(), Some("2024-03-01T09:02:00"));
        assert!(record.flags.is_late);
        assert!(!record.flags.is_holiday);
    }

    #[test]
    fn test_deserialize_flattened_flags() {
        let json = r#"{
            "_id": "r2",
            "date": "2024-03-02",
            "isWeekend": true,
            "isHoliday": false,
            "holidayTitle": ""
        }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "r2");
        assert!(record.flags.is_weekend);
        assert!(!record.flags.is_holiday);
        assert_eq!(record.holiday_title, None);
        assert_eq!(record.check_in, None);
    }

    #[test]
    fn test_deserialize_bad_location_is_not_fatal() {
        let json = r#"{ "id": "r3", "date": "2024-03-03", "location": "somewhere" }"#;
        let record: AttendanceRecord = serde_json::from_str(json).unwrap();

        assert!(record.location.is_none());
    }

    #[test]
    fn test_calendar_date() {
        let record = AttendanceRecord {
            date: "2024-03-01T00:00:00.000Z".to_string(),
            ..Default::default()
        };
        assert_eq!(record.calendar_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(record.day_string(), "2024-03-01");

        let bad = AttendanceRecord {
            date: "not a date".to_string(),
            ..Default::default()
        };
        assert_eq!(bad.calendar_date(), None);
        assert_eq!(bad.day_string(), "not a date");
    }

    #[test]
    fn test_clock_time() {
        assert_eq!(clock_time("2024-03-01T09:30:00"), "09:30");
        assert_eq!(clock_time("2024-03-01 17:05:12.123"), "17:05");
        assert_eq!(clock_time("yesterday"), "yesterday");
        // offset timestamps depend on the local zone, but must parse
        assert_eq!(clock_time("2024-03-01T09:30:00Z").len(), 5);
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status::name(status::HALF_DAY), "Half Day");
        assert_eq!(status::name(status::LEAVE), "On Leave");
        assert_eq!(status::name("work-from-home"), "Work from home");
        assert_eq!(status::name(""), "");
    }

    #[test]
    fn test_statistics_keeps_unknown_fields() {
        let json = r#"{ "presentDays": 18, "absentDays": 2, "overtimeHours": 4.5 }"#;
        let stats: AttendanceStatistics = serde_json::from_str(json).unwrap();

        assert_eq!(stats.present_days, Some(18));
        assert_eq!(stats.counters(), vec![("Present", 18), ("Absent", 2)]);
        assert!(stats.extra.contains_key("overtimeHours"));
    }
}

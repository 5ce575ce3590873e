//! Display status resolution for attendance records.
//!
//! Without a check-in the day is labelled by its flags, in order of
//! precedence leave > holiday > weekend, falling back to the backend status
//! and finally to `absent`. Once an employee has checked in, the backend
//! status is authoritative and flags are ignored.

use crate::models::attendance::{AttendanceRecord, DisplayRecord, status};

/// Title shown for holidays the backend did not name.
pub const DEFAULT_HOLIDAY_TITLE: &str = "Holiday";

/// Resolve the display status of one record.
pub fn resolve(record: &AttendanceRecord) -> DisplayRecord {
    let final_status = final_status(record);

    let holiday_title = match &record.holiday_title {
        Some(title) => Some(title.clone()),
        None if final_status == status::HOLIDAY => Some(DEFAULT_HOLIDAY_TITLE.to_string()),
        None => None,
    };

    DisplayRecord {
        record: record.clone(),
        final_status,
        holiday_title,
    }
}

/// Resolve a whole fetched set, keeping input order.
pub fn resolve_all(records: &[AttendanceRecord]) -> Vec<DisplayRecord> {
    records.iter().map(resolve).collect()
}

fn final_status(record: &AttendanceRecord) -> String {
    let backend = || record.status.clone().unwrap_or_else(|| status::ABSENT.to_string());

    if record.check_in.is_some() {
        return backend();
    }

    let flags = &record.flags;
    if flags.is_leave || record.status.as_deref() == Some(status::LEAVE) {
        status::LEAVE.to_string()
    } else if flags.is_holiday {
        status::HOLIDAY.to_string()
    } else if flags.is_weekend {
        status::WEEKEND.to_string()
    } else {
        backend()
    }
}

/// Short label for the status badge.
pub fn badge_label(display: &DisplayRecord) -> String {
    match display.final_status.as_str() {
        status::PRESENT if display.record.flags.is_late => "Late".to_string(),
        status::HOLIDAY => display
            .holiday_title
            .clone()
            .unwrap_or_else(|| DEFAULT_HOLIDAY_TITLE.to_string()),
        other => status::name(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceFlags;

    fn record(check_in: Option<&str>, status: Option<&str>, flags: AttendanceFlags) -> AttendanceRecord {
        AttendanceRecord {
            id: "r1".to_string(),
            date: "2024-03-01".to_string(),
            check_in: check_in.map(str::to_string),
            status: status.map(str::to_string),
            flags,
            ..Default::default()
        }
    }

    fn all_flags() -> AttendanceFlags {
        AttendanceFlags {
            is_late: true,
            is_leave: true,
            is_holiday: true,
            is_weekend: true,
        }
    }

    #[test]
    fn test_check_in_keeps_backend_status() {
        let flags = AttendanceFlags {
            is_holiday: true,
            ..Default::default()
        };
        let display = resolve(&record(Some("2024-03-01T09:10:00"), Some("present"), flags));
        assert_eq!(display.final_status, "present");
    }

    #[test]
    fn test_check_in_ignores_every_flag() {
        for status in ["present", "half-day", "absent", "leave", "remote"] {
            let display = resolve(&record(Some("2024-03-01T09:10:00"), Some(status), all_flags()));
            assert_eq!(display.final_status, status);
        }
    }

    #[test]
    fn test_check_in_without_status_is_absent() {
        let display = resolve(&record(Some("2024-03-01T09:10:00"), None, all_flags()));
        assert_eq!(display.final_status, "absent");
    }

    #[test]
    fn test_leave_wins_over_all_flags() {
        let display = resolve(&record(None, None, all_flags()));
        assert_eq!(display.final_status, "leave");
    }

    #[test]
    fn test_leave_status_without_flag() {
        let flags = AttendanceFlags {
            is_holiday: true,
            ..Default::default()
        };
        let display = resolve(&record(None, Some("leave"), flags));
        assert_eq!(display.final_status, "leave");
    }

    #[test]
    fn test_holiday_before_weekend() {
        let flags = AttendanceFlags {
            is_holiday: true,
            is_weekend: true,
            ..Default::default()
        };
        let display = resolve(&record(None, Some("absent"), flags));
        assert_eq!(display.final_status, "holiday");
        assert_eq!(display.holiday_title.as_deref(), Some("Holiday"));
    }

    #[test]
    fn test_weekend_before_backend_status() {
        let flags = AttendanceFlags {
            is_weekend: true,
            ..Default::default()
        };
        let display = resolve(&record(None, Some("absent"), flags));
        assert_eq!(display.final_status, "weekend");
        assert_eq!(display.holiday_title, None);
    }

    #[test]
    fn test_no_check_in_no_flags_no_status_is_absent() {
        let display = resolve(&record(None, None, AttendanceFlags::default()));
        assert_eq!(display.final_status, "absent");
    }

    #[test]
    fn test_no_check_in_falls_back_to_backend_status() {
        let display = resolve(&record(None, Some("half-day"), AttendanceFlags::default()));
        assert_eq!(display.final_status, "half-day");
    }

    #[test]
    fn test_supplied_holiday_title_kept() {
        let mut input = record(
            None,
            None,
            AttendanceFlags {
                is_holiday: true,
                ..Default::default()
            },
        );
        input.holiday_title = Some("Independence Day".to_string());

        let display = resolve(&input);
        assert_eq!(display.holiday_title.as_deref(), Some("Independence Day"));
        assert_eq!(badge_label(&display), "Independence Day");
    }

    #[test]
    fn test_malformed_date_passes_through() {
        let mut input = record(None, None, AttendanceFlags::default());
        input.date = "31/02/2024".to_string();

        let display = resolve(&input);
        assert_eq!(display.date(), "31/02/2024");
    }

    #[test]
    fn test_badge_labels() {
        let late = resolve(&record(
            Some("2024-03-01T10:00:00"),
            Some("present"),
            AttendanceFlags {
                is_late: true,
                ..Default::default()
            },
        ));
        assert_eq!(badge_label(&late), "Late");

        let on_time = resolve(&record(Some("2024-03-01T09:00:00"), Some("present"), AttendanceFlags::default()));
        assert_eq!(badge_label(&on_time), "Present");

        let leave = resolve(&record(None, None, all_flags()));
        assert_eq!(badge_label(&leave), "On Leave");

        let half = resolve(&record(Some("2024-03-01T09:00:00"), Some("half-day"), AttendanceFlags::default()));
        assert_eq!(badge_label(&half), "Half Day");
    }

    #[test]
    fn test_resolve_all_keeps_order() {
        let mut a = record(None, None, AttendanceFlags::default());
        a.id = "a".to_string();
        let mut b = record(Some("2024-03-01T09:00:00"), Some("present"), AttendanceFlags::default());
        b.id = "b".to_string();

        let resolved = resolve_all(&[a, b]);
        let ids: Vec<&str> = resolved.iter().map(DisplayRecord::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

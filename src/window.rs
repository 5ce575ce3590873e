//! Client-side filter, sort and pagination over a pre-fetched record set.
//!
//! Every call recomputes from the full set. Record counts are bounded by the
//! selected date range, so there is no incremental bookkeeping.

use std::fmt;

use crate::models::attendance::{DisplayRecord, status};

/// Status filter for the attendance table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Exact match on the resolved status.
    Status(String),
}

impl StatusFilter {
    pub fn status(code: impl Into<String>) -> Self {
        Self::Status(code.into())
    }

    pub fn matches(&self, record: &DisplayRecord) -> bool {
        match self {
            Self::All => true,
            Self::Status(code) => record.final_status == *code,
        }
    }

    /// Label for the filter picker.
    pub fn label(&self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Status(code) => status::name(code),
        }
    }
}

/// Date sort direction. Most recent first by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "Oldest first"),
            Self::Desc => write!(f, "Newest first"),
        }
    }
}

/// Filter and sort the full set. Equal dates keep their input order.
pub fn filter_sort(records: &[DisplayRecord], filter: &StatusFilter, order: SortOrder) -> Vec<DisplayRecord> {
    let mut kept: Vec<DisplayRecord> = records.iter().filter(|r| filter.matches(r)).cloned().collect();

    // sort_by is stable
    match order {
        SortOrder::Asc => kept.sort_by(|a, b| a.date_key().cmp(&b.date_key())),
        SortOrder::Desc => kept.sort_by(|a, b| b.date_key().cmp(&a.date_key())),
    }

    kept
}

/// Page `window_index` of the filtered and sorted set.
///
/// Out-of-range windows and a zero page size yield an empty page.
pub fn select(
    records: &[DisplayRecord],
    filter: &StatusFilter,
    order: SortOrder,
    window_index: usize,
    page_size: usize,
) -> Vec<DisplayRecord> {
    let sorted = filter_sort(records, filter, order);
    window(&sorted, window_index, page_size).to_vec()
}

/// Clip `[index * size, index * size + size)` to the slice bounds.
pub fn window<T>(items: &[T], window_index: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return &[];
    }
    let Some(start) = window_index.checked_mul(page_size) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages for `len` rows, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Count records per resolved status, in first-seen order.
pub fn status_counts(records: &[DisplayRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        match counts.iter_mut().find(|(code, _)| *code == record.final_status) {
            Some((_, n)) => *n += 1,
            None => counts.push((record.final_status.clone(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceRecord;
    use crate::status::resolve;

    fn display(id: &str, date: &str, status: &str) -> DisplayRecord {
        resolve(&AttendanceRecord {
            id: id.to_string(),
            date: date.to_string(),
            check_in: Some(format!("{date}T09:30:00")),
            status: Some(status.to_string()),
            ..Default::default()
        })
    }

    fn ids(records: &[DisplayRecord]) -> Vec<&str> {
        records.iter().map(DisplayRecord::id).collect()
    }

    fn fifteen_days() -> Vec<DisplayRecord> {
        (1..=15)
            .map(|d| display(&format!("r{d}"), &format!("2024-03-{d:02}"), "present"))
            .collect()
    }

    #[test]
    fn test_pages_of_seven_over_fifteen_records() {
        let records = fifteen_days();
        let all = StatusFilter::All;

        assert_eq!(select(&records, &all, SortOrder::Desc, 0, 7).len(), 7);
        assert_eq!(select(&records, &all, SortOrder::Desc, 1, 7).len(), 7);
        assert_eq!(select(&records, &all, SortOrder::Desc, 2, 7).len(), 1);
        assert!(select(&records, &all, SortOrder::Desc, 3, 7).is_empty());
        assert_eq!(total_pages(records.len(), 7), 3);
    }

    #[test]
    fn test_desc_is_default_and_most_recent_first() {
        let records = fifteen_days();
        let page = select(&records, &StatusFilter::default(), SortOrder::default(), 0, 3);
        assert_eq!(ids(&page), vec!["r15", "r14", "r13"]);

        let last = select(&records, &StatusFilter::default(), SortOrder::default(), 2, 7);
        assert_eq!(ids(&last), vec!["r1"]);
    }

    #[test]
    fn test_filter_exact_match() {
        let records = vec![
            display("a", "2024-03-01", "present"),
            display("b", "2024-03-02", "half-day"),
            display("c", "2024-03-03", "present"),
            display("d", "2024-03-04", "present-remote"),
        ];

        let page = select(&records, &StatusFilter::status("present"), SortOrder::Asc, 0, 10);
        assert_eq!(ids(&page), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = vec![
            display("a", "2024-03-01", "present"),
            display("b", "2024-03-02", "absent"),
            display("c", "2024-03-02", "present"),
            display("d", "2024-03-05", "absent"),
        ];

        for filter in [
            StatusFilter::All,
            StatusFilter::status("present"),
            StatusFilter::status("absent"),
        ] {
            let once = select(&records, &filter, SortOrder::Desc, 0, 10);
            let twice = select(&once, &filter, SortOrder::Desc, 0, 10);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let records = vec![
            display("x1", "2024-03-02", "present"),
            display("early", "2024-03-01", "present"),
            display("x2", "2024-03-02", "absent"),
            display("x3", "2024-03-02", "present"),
        ];

        let desc = filter_sort(&records, &StatusFilter::All, SortOrder::Desc);
        assert_eq!(ids(&desc), vec!["x1", "x2", "x3", "early"]);

        let asc = filter_sort(&desc, &StatusFilter::All, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["early", "x1", "x2", "x3"]);

        let back = filter_sort(&asc, &StatusFilter::All, SortOrder::Desc);
        assert_eq!(ids(&back), vec!["x1", "x2", "x3", "early"]);
    }

    #[test]
    fn test_sort_uses_calendar_day() {
        let records = vec![
            display("iso", "2024-03-02T00:00:00.000Z", "present"),
            display("plain", "2024-03-10", "present"),
        ];
        let asc = filter_sort(&records, &StatusFilter::All, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["iso", "plain"]);
    }

    #[test]
    fn test_same_day_in_different_formats_keeps_input_order() {
        let records = vec![
            display("stamped", "2024-03-02T00:00:00.000Z", "present"),
            display("plain", "2024-03-02", "present"),
            display("bad-1", "not a date", "absent"),
            display("bad-0", "???", "absent"),
        ];

        let desc = filter_sort(&records, &StatusFilter::All, SortOrder::Desc);
        assert_eq!(ids(&desc), vec!["stamped", "plain", "bad-1", "bad-0"]);

        let asc = filter_sort(&records, &StatusFilter::All, SortOrder::Asc);
        assert_eq!(ids(&asc), vec!["bad-1", "bad-0", "stamped", "plain"]);
    }

    #[test]
    fn test_empty_set_has_one_page() {
        assert_eq!(total_pages(0, 7), 1);
        assert!(select(&[], &StatusFilter::All, SortOrder::Desc, 0, 7).is_empty());
    }

    #[test]
    fn test_zero_page_size() {
        let records = fifteen_days();
        assert!(select(&records, &StatusFilter::All, SortOrder::Desc, 0, 0).is_empty());
        assert_eq!(total_pages(records.len(), 0), 1);
    }

    #[test]
    fn test_huge_window_index() {
        let records = fifteen_days();
        assert!(window(&records, usize::MAX, 7).is_empty());
    }

    #[test]
    fn test_total_pages_exact_multiple() {
        assert_eq!(total_pages(14, 7), 2);
        assert_eq!(total_pages(1, 7), 1);
    }

    #[test]
    fn test_status_counts() {
        let records = vec![
            display("a", "2024-03-01", "present"),
            display("b", "2024-03-02", "absent"),
            display("c", "2024-03-03", "present"),
        ];
        assert_eq!(
            status_counts(&records),
            vec![("present".to_string(), 2), ("absent".to_string(), 1)]
        );
    }

    #[test]
    fn test_sort_order_toggle_and_label() {
        assert_eq!(SortOrder::Desc.toggled(), SortOrder::Asc);
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
        assert_eq!(SortOrder::Desc.to_string(), "Newest first");
    }
}

//! HR attendance table state: filter, sort, page cursor, selection and modals.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::bulk::{BulkUpdateRequest, build_requests};
use crate::error::{AppError, Result};
use crate::models::attendance::{AttendanceRecord, DisplayRecord, status};
use crate::models::location::{MapPoint, map_points};
use crate::status::resolve_all;
use crate::window::{SortOrder, StatusFilter, filter_sort, select, status_counts, total_pages};

/// Overlay currently shown over the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableModal {
    #[default]
    None,
    BulkEdit,
    Analytics,
    Map,
}

/// Employee and date range a record set was fetched for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRange {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// State owned by the HR attendance view.
///
/// The record set is replaced wholesale after each fetch. Everything else is
/// recomputed from it on demand.
#[derive(Debug, Clone)]
pub struct AttendanceTable {
    records: Vec<DisplayRecord>,
    loaded: Option<LoadedRange>,
    load_seq: u64,
    loading: bool,
    filter: StatusFilter,
    order: SortOrder,
    page: usize,
    page_size: usize,
    /// Backend ids of the selected rows. Rows without an id are never selected.
    selected: BTreeSet<String>,
    pub bulk_status: String,
    pub modal: TableModal,
}

impl AttendanceTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            loaded: None,
            load_seq: 0,
            loading: false,
            filter: StatusFilter::All,
            order: SortOrder::default(),
            page: 0,
            page_size,
            selected: BTreeSet::new(),
            bulk_status: status::PRESENT.to_string(),
            modal: TableModal::None,
        }
    }

    /// Start a fetch and return its sequence number.
    ///
    /// Any fetch started earlier becomes stale.
    pub fn begin_load(&mut self) -> u64 {
        self.load_seq += 1;
        self.loading = true;
        self.load_seq
    }

    /// True while the latest fetch has not answered.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True if `seq` belongs to the latest fetch.
    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.load_seq
    }

    /// Accept a fetched set unless a newer fetch has started since.
    pub fn finish_load(&mut self, seq: u64, range: LoadedRange, raw: &[AttendanceRecord]) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.loading = false;
        self.replace_records(range, raw);
        true
    }

    /// Accept a fetch failure unless it belongs to a superseded fetch.
    pub fn fail_load(&mut self, seq: u64) -> bool {
        if !self.is_current(seq) || !self.loading {
            return false;
        }
        self.loading = false;
        true
    }

    /// Install a freshly fetched set. Resets the page and selection.
    pub fn replace_records(&mut self, range: LoadedRange, raw: &[AttendanceRecord]) {
        self.records = resolve_all(raw);
        self.loaded = Some(range);
        self.page = 0;
        self.selected.clear();
    }

    /// Range the current records came from.
    pub fn loaded_range(&self) -> Option<&LoadedRange> {
        self.loaded.as_ref()
    }

    pub fn records(&self) -> &[DisplayRecord] {
        &self.records
    }

    pub fn filter(&self) -> &StatusFilter {
        &self.filter
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Zero-based page cursor.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.page = 0;
        }
    }

    pub fn set_order(&mut self, order: SortOrder) {
        if self.order != order {
            self.order = order;
            self.page = 0;
        }
    }

    pub fn toggle_order(&mut self) {
        self.set_order(self.order.toggled());
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
        self.page = 0;
    }

    /// Filtered and sorted rows, all pages.
    pub fn filtered(&self) -> Vec<DisplayRecord> {
        filter_sort(&self.records, &self.filter, self.order)
    }

    pub fn filtered_len(&self) -> usize {
        self.records.iter().filter(|r| self.filter.matches(r)).count()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_len(), self.page_size)
    }

    /// Rows on the current page.
    pub fn visible(&self) -> Vec<DisplayRecord> {
        select(&self.records, &self.filter, self.order, self.page, self.page_size)
    }

    /// Jump to a zero-based page. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        if page < self.total_pages() {
            self.page = page;
        }
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        if let Some(prev) = self.page.checked_sub(1) {
            self.go_to_page(prev);
        }
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.total_pages() - 1;
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    /// 1-based row range shown on the current page, if any.
    pub fn showing_range(&self) -> Option<(usize, usize, usize)> {
        let total = self.filtered_len();
        let shown = self.visible().len();
        if shown == 0 {
            return None;
        }
        let start = self.page * self.page_size + 1;
        Some((start, start + shown - 1, total))
    }

    pub fn is_selected(&self, record_id: &str) -> bool {
        self.selected.contains(record_id)
    }

    /// Blank ids are ignored; such rows cannot be updated.
    pub fn set_selected(&mut self, record_id: &str, selected: bool) {
        if record_id.trim().is_empty() {
            return;
        }
        if selected {
            self.selected.insert(record_id.to_string());
        } else {
            self.selected.remove(record_id);
        }
    }

    pub fn toggle_selected(&mut self, record_id: &str) {
        let selected = self.is_selected(record_id);
        self.set_selected(record_id, !selected);
    }

    /// Select every row on the current page.
    pub fn select_visible(&mut self) {
        for record in self.visible().iter().filter(|r| r.has_id()) {
            self.selected.insert(record.id().to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected rows in table order.
    pub fn selected_records(&self) -> Vec<&DisplayRecord> {
        self.records
            .iter()
            .filter(|r| self.selected.contains(r.id()))
            .collect()
    }

    /// Requests for the bulk-edit draft, validated locally.
    ///
    /// Records without their own employee id are attributed to the employee
    /// the table was loaded for, never to the current picker value.
    pub fn bulk_requests(&self) -> Result<Vec<BulkUpdateRequest>> {
        let Some(range) = &self.loaded else {
            return Err(AppError::validation("Load attendance before editing"));
        };
        build_requests(&self.selected_records(), &self.bulk_status, &range.employee_id)
    }

    /// Apply the outcome of a bulk update. Selection survives failures.
    pub fn on_bulk_result(&mut self, success: bool) {
        if success {
            self.selected.clear();
            self.modal = TableModal::None;
        }
    }

    pub fn open(&mut self, modal: TableModal) {
        self.modal = modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = TableModal::None;
    }

    /// Per-status counts over the filtered rows.
    pub fn counts(&self) -> Vec<(String, usize)> {
        status_counts(&self.filtered())
    }

    /// Markers for the location viewer, honouring the current filter.
    pub fn map_points(&self) -> Vec<MapPoint> {
        map_points(&self.filtered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, day: u32, status: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: id.to_string(),
            date: format!("2024-03-{day:02}"),
            check_in: Some(format!("2024-03-{day:02}T09:30:00")),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    fn fifteen() -> Vec<AttendanceRecord> {
        (1..=15)
            .map(|d| raw(&format!("r{d}"), d, if d % 3 == 0 { "absent" } else { "present" }))
            .collect()
    }

    fn range(employee_id: &str) -> LoadedRange {
        LoadedRange {
            employee_id: employee_id.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        }
    }

    fn table() -> AttendanceTable {
        let mut table = AttendanceTable::new(7);
        table.replace_records(range("emp-1"), &fifteen());
        table
    }

    #[test]
    fn test_navigation_clamps() {
        let mut table = table();
        assert_eq!(table.total_pages(), 3);

        table.prev_page();
        assert_eq!(table.page(), 0);

        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 2);
        assert_eq!(table.visible().len(), 1);

        table.next_page();
        assert_eq!(table.page(), 2);

        table.go_to_page(10);
        assert_eq!(table.page(), 2);

        table.first_page();
        assert_eq!(table.page(), 0);

        table.last_page();
        assert_eq!(table.page(), 2);
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut table = table();
        table.last_page();

        table.set_filter(StatusFilter::status("absent"));

        assert_eq!(table.page(), 0);
        assert_eq!(table.filtered_len(), 5);
        assert_eq!(table.total_pages(), 1);
        assert!(!table.has_next());
    }

    #[test]
    fn test_empty_filter_result_has_one_page() {
        let mut table = table();
        table.set_filter(StatusFilter::status("leave"));

        assert_eq!(table.total_pages(), 1);
        assert!(table.visible().is_empty());
        assert_eq!(table.showing_range(), None);
        assert!(!table.has_next());
        assert!(!table.has_prev());
    }

    #[test]
    fn test_toggle_order() {
        let mut table = table();
        assert_eq!(table.visible()[0].id(), "r15");

        table.next_page();
        table.toggle_order();

        assert_eq!(table.page(), 0);
        assert_eq!(table.visible()[0].id(), "r1");
    }

    #[test]
    fn test_showing_range() {
        let mut table = table();
        assert_eq!(table.showing_range(), Some((1, 7, 15)));
        table.last_page();
        assert_eq!(table.showing_range(), Some((15, 15, 15)));
    }

    #[test]
    fn test_selection_survives_failed_bulk_update() {
        let mut table = table();
        table.select_visible();
        table.open(TableModal::BulkEdit);
        assert_eq!(table.selected_count(), 7);

        table.on_bulk_result(false);
        assert_eq!(table.selected_count(), 7);
        assert_eq!(table.modal, TableModal::BulkEdit);

        table.on_bulk_result(true);
        assert_eq!(table.selected_count(), 0);
        assert_eq!(table.modal, TableModal::None);
    }

    #[test]
    fn test_bulk_requests_from_selection() {
        let mut table = table();
        assert!(table.bulk_requests().unwrap_err().is_validation());

        table.toggle_selected("r2");
        table.toggle_selected("r1");
        table.toggle_selected("r5");
        table.toggle_selected("r5");
        table.bulk_status = "half-day".to_string();

        let requests = table.bulk_requests().unwrap();
        let ids: Vec<&str> = requests.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
        assert_eq!(requests[0].check_out, Some(Some("2024-03-01T13:30:00".to_string())));
    }

    #[test]
    fn test_replace_records_resets_state() {
        let mut table = table();
        table.next_page();
        table.toggle_selected("r1");

        table.replace_records(range("emp-1"), &fifteen()[..3]);

        assert_eq!(table.page(), 0);
        assert_eq!(table.selected_count(), 0);
        assert_eq!(table.records().len(), 3);
    }

    #[test]
    fn test_counts_follow_filter() {
        let mut table = table();
        assert_eq!(
            table.counts(),
            vec![("absent".to_string(), 5), ("present".to_string(), 10)]
        );

        table.set_filter(StatusFilter::status("absent"));
        assert_eq!(table.counts(), vec![("absent".to_string(), 5)]);
    }

    #[test]
    fn test_rows_without_id_are_not_selectable() {
        let raw: Vec<AttendanceRecord> = serde_json::from_str(
            r#"[
                { "date": "2024-03-02", "isWeekend": true },
                { "date": "2024-03-03", "isWeekend": true },
                { "id": "r4", "date": "2024-03-04", "checkIn": "2024-03-04T09:30:00", "status": "present" }
            ]"#,
        )
        .unwrap();
        let mut table = AttendanceTable::new(7);
        table.replace_records(range("emp-1"), &raw);

        table.toggle_selected("");
        assert_eq!(table.selected_count(), 0);
        assert!(table.selected_records().is_empty());

        table.select_visible();
        assert_eq!(table.selected_count(), 1);
        let requests = table.bulk_requests().unwrap();
        let ids: Vec<&str> = requests.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["r4"]);
    }

    #[test]
    fn test_bulk_requests_use_loaded_employee() {
        let mut table = table();
        table.toggle_selected("r1");
        assert_eq!(table.bulk_requests().unwrap()[0].employee_id, "emp-1");

        let mut empty = AttendanceTable::new(7);
        empty.toggle_selected("r1");
        assert!(empty.bulk_requests().unwrap_err().is_validation());
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut table = AttendanceTable::new(7);
        let first = table.begin_load();
        let second = table.begin_load();
        assert!(table.is_loading());

        // the superseded fetch answers late
        assert!(!table.finish_load(first, range("emp-a"), &fifteen()));
        assert!(!table.fail_load(first));
        assert!(table.is_loading());
        assert!(table.records().is_empty());

        assert!(table.finish_load(second, range("emp-b"), &fifteen()[..2]));
        assert!(!table.is_loading());
        assert_eq!(table.records().len(), 2);
        assert_eq!(table.loaded_range().map(|r| r.employee_id.as_str()), Some("emp-b"));
    }

    #[test]
    fn test_failure_of_current_load_stops_loading() {
        let mut table = table();
        let seq = table.begin_load();

        assert!(table.fail_load(seq));
        assert!(!table.is_loading());
        // a second report of the same failure is not shown twice
        assert!(!table.fail_load(seq));
        // the previous set stays on screen
        assert_eq!(table.records().len(), 15);
        assert_eq!(table.loaded_range(), Some(&range("emp-1")));
    }
}

//! Data models for attendance records, employees, locations and task reports.

pub mod attendance;
pub mod employee;
pub mod location;
pub mod task_report;

pub use attendance::{AttendanceFlags, AttendanceRecord, AttendanceStatistics, DisplayRecord, status};
pub use employee::Employee;
pub use location::{Location, MapPoint, map_points};
pub use task_report::{TaskEntry, TaskReport};

//! View state owned by the hosting panels, independent of the GUI toolkit.

pub mod attendance_table;
pub mod employee_day;

pub use attendance_table::{AttendanceTable, LoadedRange, TableModal};
pub use employee_day::{CheckState, EmployeeDay};

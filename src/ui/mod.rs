//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod dashboard;
pub mod employee_panel;
pub mod hr_panel;

pub use app::App;

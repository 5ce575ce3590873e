pub mod bulk;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod status;
pub mod ui;
pub mod window;

pub use error::{AppError, Result};

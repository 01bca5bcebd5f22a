//! Shared utilities for the Terakoya collaborative code editor.
//!
//! Logging setup and timestamp helpers used by every package in the
//! workspace.

pub mod logger;
pub mod time;

pub use logger::setup_logger;
pub use time::{get_jst_timestamp, timestamp_to_jst_rfc3339};

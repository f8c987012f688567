//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - User configuration in the app data directory (XDG-compliant)
//! - [`progress`] - Progress bar, silent when the `progress` feature is off

pub mod app_data;
pub mod progress;

pub use app_data::*;

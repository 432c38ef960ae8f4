//! Utility functions.
//!
//! - [`app_data`] - Application data directory and config file management

pub mod app_data;

pub use app_data::*;

//! Core types for the bikeshare explorer.
//!
//! Holds the error taxonomy, the trip and filter-selection models, calendar
//! helpers, report formatting and the CLI settings shared by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{BikeshareError, ErrorKind, Result};

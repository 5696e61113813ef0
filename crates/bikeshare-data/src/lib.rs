//! Data layer for the bikeshare explorer.
//!
//! Loads and filters city trip files, computes the descriptive report groups,
//! runs the per-selection analysis pipeline and pages through raw rows.

pub mod aggregator;
pub mod analysis;
pub mod pagination;
pub mod reader;

pub use bikeshare_core as core;

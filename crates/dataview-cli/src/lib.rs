//! CLI library components for the `dataview` binary.

pub mod logging;
pub mod report;

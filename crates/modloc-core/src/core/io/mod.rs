//! File formats for localization problems, externally supplied site scores
//! and localization reports.
//!
//! Problems are TOML documents, score tables are CSV and reports can be
//! written as either. Every loader has its own error type carrying the path
//! it failed on.

pub mod problem;
pub mod report;
pub mod scores;

//! # Engine Module
//!
//! The assignment engine: it turns one peptide's candidate sites, occurrence
//! counts and localization scores into conflict-free site assignments with the
//! highest total score.
//!
//! ## Architecture
//!
//! The components run in strict sequence and share no state between calls:
//!
//! - **Graph Builder** ([`graph`]) - Validates the input maps and expands every
//!   modification type into interchangeable instance nodes linked to its sites
//! - **Matching Solver** ([`matching`]) - Exact maximum-weight bipartite matching
//!   with a deterministic tie-break, backed by a Kuhn–Munkres solver
//! - **Result Aggregator** ([`aggregate`]) - Groups matched sites per modification type
//!
//! Supporting modules:
//!
//! - **Configuration** ([`config`]) - Evidence threshold and tie tolerance
//! - **Error Handling** ([`error`]) - The single [`error::ConfigurationError`] type
//! - **Site Alignment** ([`alignment`]) - Score-free nearest-position realignment
//! - **Progress Monitoring** ([`progress`]) - Callback-based batch progress events

pub mod aggregate;
pub mod alignment;
pub mod config;
pub mod error;
pub mod graph;
pub(crate) mod hungarian;
pub mod matching;
pub mod progress;

//! # Workflows Module
//!
//! High-level entry points that run the complete localization pipeline: input
//! validation, graph construction, maximum-weight matching and aggregation.
//!
//! - **Localization** ([`localize`]) places the modifications of one peptide,
//!   keyed either by modification identifier or by modification mass.
//! - **Batch** ([`batch`]) localizes many independent peptides, in parallel when
//!   the `parallel` feature is enabled, reporting progress along the way.

pub mod batch;
pub mod localize;

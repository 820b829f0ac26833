//! # Core Models Module
//!
//! Plain data describing one localization problem: modification types, peptide
//! sites, and the per-peptide input maps consumed by the engine.
//!
//! ## Key Components
//!
//! - [`ids`] - Typed identifiers for modification types and their instances
//! - [`site`] - Peptide sites (termini and 1-based residues) with a total order
//! - [`modification`] - Modification types and the per-analysis catalog
//! - [`catalog`] - Static table of well-known modification masses
//! - [`input`] - The candidate/count/score maps for one peptide

pub mod catalog;
pub mod ids;
pub mod input;
pub mod modification;
pub mod site;

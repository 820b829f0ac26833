//! # modloc
//!
//! Site localization for post-translational modifications. Given how many
//! instances of each modification a peptide carries and a score for every
//! candidate site, the library places the instances so that the summed score
//! is as high as possible while no site carries more than one modification.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Data models (`ModificationId`, `Site`,
//!   `LocalizationInput`), the catalog of well-known modification masses, and
//!   the TOML/CSV readers and writers.
//!
//! - **[`engine`]: The Logic Core.** Candidate graph construction, the
//!   maximum-weight bipartite matching solver with its deterministic
//!   tie-break, result aggregation and greedy site realignment.
//!
//! - **[`workflows`]: The Public API.** Single-peptide and batch localization
//!   entry points that tie `core` and `engine` together.

pub mod core;
pub mod engine;
pub mod workflows;

use super::localize::{self, Localization};
use crate::core::models::input::PeptideProblem;
use crate::engine::config::SolverConfig;
use crate::engine::error::ConfigurationError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of localizing a single peptide of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PeptideOutcome {
    pub name: String,
    pub result: Result<Localization, ConfigurationError>,
}

impl PeptideOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Localizes every peptide independently.
///
/// Outcomes come back in input order. A peptide whose input is rejected yields
/// an error outcome and does not stop the rest of the batch.
#[instrument(skip_all, name = "batch_workflow", fields(peptides = problems.len()))]
pub fn run(
    problems: &[PeptideProblem],
    config: &SolverConfig,
    reporter: &ProgressReporter,
) -> Vec<PeptideOutcome> {
    reporter.report(Progress::BatchStart {
        peptides: problems.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = problems.iter();

    #[cfg(feature = "parallel")]
    let iterator = problems.par_iter();

    let outcomes: Vec<PeptideOutcome> = iterator
        .map(|problem| {
            let result = localize::run(&problem.input, config);
            match &result {
                Ok(localization) => reporter.report(Progress::PeptideDone {
                    name: problem.name.clone(),
                    placed: localization.matching.len(),
                }),
                Err(e) => {
                    warn!(peptide = %problem.name, "Localization failed: {}", e);
                    reporter.report(Progress::PeptideFailed {
                        name: problem.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            PeptideOutcome {
                name: problem.name.clone(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
    let succeeded = outcomes.len() - failed;
    reporter.report(Progress::BatchFinish { succeeded, failed });

    info!(succeeded, failed, "Batch localization complete.");

    outcomes
}

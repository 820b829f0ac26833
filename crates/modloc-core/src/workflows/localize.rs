use crate::core::models::ids::ModificationId;
use crate::core::models::input::LocalizationInput;
use crate::core::models::site::Site;
use crate::engine::aggregate::{AssignmentResult, aggregate};
use crate::engine::config::SolverConfig;
use crate::engine::error::ConfigurationError;
use crate::engine::graph;
use crate::engine::matching::{Matching, MatchingSolver};
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

/// Modification mass used as a map key by mass-keyed callers.
pub type Mass = OrderedFloat<f64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Localization {
    pub assignments: AssignmentResult,
    pub matching: Matching,
    /// Instances per type that could not be placed. Types that were fully
    /// placed are absent.
    pub unplaced: BTreeMap<ModificationId, u32>,
}

impl Localization {
    pub fn total_score(&self) -> f64 {
        self.matching.total_weight()
    }

    /// `false` means at least one instance has ambiguous or insufficient
    /// evidence; it is not an error.
    pub fn is_fully_localized(&self) -> bool {
        self.unplaced.is_empty()
    }

    pub fn score_of(&self, modification: ModificationId, site: Site) -> Option<f64> {
        self.matching
            .iter()
            .find(|e| e.instance.modification == modification && e.site == site)
            .map(|e| e.weight)
    }
}

/// Places every modification instance of one peptide.
#[instrument(skip_all, name = "localization_workflow", fields(modifications = input.candidate_sites.len()))]
pub fn run(
    input: &LocalizationInput,
    config: &SolverConfig,
) -> Result<Localization, ConfigurationError> {
    let graph = graph::build_from_input(input)?;
    let matching = MatchingSolver::new(*config).solve(&graph)?;
    let assignments = aggregate(&matching);

    let unplaced: BTreeMap<ModificationId, u32> = input
        .candidate_sites
        .keys()
        .filter_map(|&id| {
            let count = input.occurrence_counts.get(&id).copied().unwrap_or(0);
            let placed = assignments.assigned_count(id) as u32;
            (placed < count).then_some((id, count - placed))
        })
        .collect();

    if !unplaced.is_empty() {
        debug!(
            "{} instance(s) left unplaced for lack of evidence or free sites.",
            unplaced.values().sum::<u32>()
        );
    }

    Ok(Localization {
        assignments,
        matching,
        unplaced,
    })
}

/// Mass-keyed form of [`run`].
///
/// Identifiers are assigned in ascending mass order, so the tie-break order of
/// the solver is the mass order. Isobaric modification types cannot be told
/// apart through this entry point; callers that need them use [`run`] with
/// explicit identifiers.
#[instrument(skip_all, name = "mass_keyed_localization")]
pub fn run_by_mass(
    type_to_sites: &BTreeMap<Mass, Vec<Site>>,
    type_to_count: &BTreeMap<Mass, u32>,
    type_to_site_score: &BTreeMap<Mass, BTreeMap<Site, f64>>,
    config: &SolverConfig,
) -> Result<BTreeMap<Mass, BTreeSet<Site>>, ConfigurationError> {
    let masses: BTreeSet<Mass> = type_to_sites
        .keys()
        .chain(type_to_count.keys())
        .chain(type_to_site_score.keys())
        .copied()
        .collect();
    if let Some(nan) = masses.iter().find(|mass| mass.0.is_nan()) {
        return Err(ConfigurationError::InvalidMass(nan.0));
    }

    let ids: BTreeMap<Mass, ModificationId> = masses
        .iter()
        .enumerate()
        .map(|(index, &mass)| (mass, ModificationId(index as u32)))
        .collect();
    let rekey = |mass: &Mass| ids[mass];

    let input = LocalizationInput {
        candidate_sites: type_to_sites
            .iter()
            .map(|(mass, sites)| (rekey(mass), sites.clone()))
            .collect(),
        occurrence_counts: type_to_count
            .iter()
            .map(|(mass, &count)| (rekey(mass), count))
            .collect(),
        site_scores: type_to_site_score
            .iter()
            .map(|(mass, scores)| (rekey(mass), scores.clone()))
            .collect(),
    };

    let localization = run(&input, config)?;
    let masses_by_id: BTreeMap<ModificationId, Mass> =
        ids.into_iter().map(|(mass, id)| (id, mass)).collect();

    Ok(localization
        .assignments
        .into_inner()
        .into_iter()
        .map(|(id, sites)| (masses_by_id[&id], sites))
        .collect())
}

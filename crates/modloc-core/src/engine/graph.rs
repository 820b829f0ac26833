use super::error::ConfigurationError;
use crate::core::models::ids::{InstanceKey, ModificationId};
use crate::core::models::input::LocalizationInput;
use crate::core::models::site::Site;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub instance: InstanceKey,
    pub site: Site,
    pub weight: f64,
}

/// Modification instances on one side, peptide sites on the other.
///
/// Graphs produced by [`build`] keep instances, sites and edges sorted; graphs
/// assembled with [`BipartiteGraph::from_parts`] are taken as given and checked
/// by the solver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BipartiteGraph {
    instances: Vec<InstanceKey>,
    sites: Vec<Site>,
    edges: Vec<Edge>,
}

impl BipartiteGraph {
    pub fn from_parts(instances: Vec<InstanceKey>, sites: Vec<Site>, edges: Vec<Edge>) -> Self {
        Self {
            instances,
            sites,
            edges,
        }
    }

    pub fn instances(&self) -> &[InstanceKey] {
        &self.instances
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn degree(&self, instance: InstanceKey) -> usize {
        self.edges.iter().filter(|e| e.instance == instance).count()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// Builds the instance/site graph for one peptide.
///
/// The whole input is validated before any node is created, so a
/// [`ConfigurationError`] never comes with a partially built graph.
#[instrument(level = "debug", skip_all, fields(modifications = type_to_sites.len()))]
pub fn build(
    type_to_sites: &BTreeMap<ModificationId, Vec<Site>>,
    type_to_count: &BTreeMap<ModificationId, u32>,
    type_to_site_score: &BTreeMap<ModificationId, BTreeMap<Site, f64>>,
) -> Result<BipartiteGraph, ConfigurationError> {
    validate(type_to_sites, type_to_count, type_to_site_score)?;

    let mut site_nodes = BTreeSet::new();
    let mut instances = Vec::new();
    let mut edges = Vec::new();

    for (&modification, candidates) in type_to_sites {
        let count = type_to_count[&modification];
        let scores = type_to_site_score.get(&modification);
        let distinct: BTreeSet<Site> = candidates.iter().copied().collect();
        site_nodes.extend(distinct.iter().copied());

        for instance_index in 0..count {
            let instance = InstanceKey::new(modification, instance_index);
            instances.push(instance);
            for &site in &distinct {
                let weight = scores
                    .and_then(|s| s.get(&site))
                    .copied()
                    .ok_or(ConfigurationError::MissingScore { modification, site })?;
                edges.push(Edge {
                    instance,
                    site,
                    weight,
                });
            }
        }
    }

    debug!(
        "Built graph with {} instance(s), {} site(s) and {} edge(s).",
        instances.len(),
        site_nodes.len(),
        edges.len()
    );

    Ok(BipartiteGraph {
        instances,
        sites: site_nodes.into_iter().collect(),
        edges,
    })
}

pub fn build_from_input(input: &LocalizationInput) -> Result<BipartiteGraph, ConfigurationError> {
    build(
        &input.candidate_sites,
        &input.occurrence_counts,
        &input.site_scores,
    )
}

fn validate(
    type_to_sites: &BTreeMap<ModificationId, Vec<Site>>,
    type_to_count: &BTreeMap<ModificationId, u32>,
    type_to_site_score: &BTreeMap<ModificationId, BTreeMap<Site, f64>>,
) -> Result<(), ConfigurationError> {
    for (&modification, candidates) in type_to_sites {
        if !type_to_count.contains_key(&modification) {
            return Err(ConfigurationError::MissingOccurrenceCount { modification });
        }
        let scores = type_to_site_score.get(&modification);
        for &site in candidates {
            let score = scores
                .and_then(|s| s.get(&site))
                .copied()
                .ok_or(ConfigurationError::MissingScore { modification, site })?;
            if !score.is_finite() {
                return Err(ConfigurationError::InvalidScore {
                    modification,
                    site,
                    score,
                });
            }
        }
    }
    Ok(())
}

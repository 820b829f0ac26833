use super::ids::ModificationId;
use super::site::Site;
use std::collections::BTreeMap;

/// The per-peptide input of the assignment engine.
///
/// The three maps are kept separate so that inconsistent upstream data (a type
/// without a count, a candidate without a score) stays representable and is
/// reported by the graph builder instead of being silently repaired.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalizationInput {
    pub candidate_sites: BTreeMap<ModificationId, Vec<Site>>,
    pub occurrence_counts: BTreeMap<ModificationId, u32>,
    pub site_scores: BTreeMap<ModificationId, BTreeMap<Site, f64>>,
}

impl LocalizationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a modification type whose candidate sites are exactly the scored sites.
    pub fn with_modification(
        mut self,
        id: ModificationId,
        occurrence_count: u32,
        scores: impl IntoIterator<Item = (Site, f64)>,
    ) -> Self {
        let scores: Vec<(Site, f64)> = scores.into_iter().collect();
        self.candidate_sites
            .insert(id, scores.iter().map(|(site, _)| *site).collect());
        self.occurrence_counts.insert(id, occurrence_count);
        self.site_scores.insert(id, scores.into_iter().collect());
        self
    }

    pub fn total_instances(&self) -> u64 {
        self.candidate_sites
            .keys()
            .filter_map(|id| self.occurrence_counts.get(id))
            .map(|&count| u64::from(count))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.candidate_sites.is_empty()
    }
}

/// A named peptide together with its localization input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeptideProblem {
    pub name: String,
    pub input: LocalizationInput,
}

impl PeptideProblem {
    pub fn new(name: &str, input: LocalizationInput) -> Self {
        Self {
            name: name.to_string(),
            input,
        }
    }
}

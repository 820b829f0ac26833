use super::matching::Matching;
use crate::core::models::ids::ModificationId;
use crate::core::models::site::Site;
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Assigned sites per modification type.
///
/// Types without any placed instance are absent rather than mapped to an empty
/// set; [`AssignmentResult::assigned_count`] treats both the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentResult {
    sites: BTreeMap<ModificationId, BTreeSet<Site>>,
}

impl AssignmentResult {
    pub fn sites_for(&self, modification: ModificationId) -> Option<&BTreeSet<Site>> {
        self.sites.get(&modification)
    }

    pub fn assigned_count(&self, modification: ModificationId) -> usize {
        self.sites_for(modification).map_or(0, BTreeSet::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModificationId, &BTreeSet<Site>)> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<ModificationId, BTreeSet<Site>> {
        self.sites
    }
}

/// Compact form such as `#1: {1}; #2: {3, 17}`; `-` when nothing was placed.
impl fmt::Display for AssignmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sites.is_empty() {
            return write!(f, "-");
        }
        let groups = self
            .sites
            .iter()
            .map(|(id, sites)| format!("{}: {{{}}}", id, sites.iter().join(", ")))
            .join("; ");
        write!(f, "{groups}")
    }
}

pub fn aggregate(matching: &Matching) -> AssignmentResult {
    let mut sites: BTreeMap<ModificationId, BTreeSet<Site>> = BTreeMap::new();
    for edge in matching.iter() {
        sites
            .entry(edge.instance.modification)
            .or_default()
            .insert(edge.site);
    }
    AssignmentResult { sites }
}

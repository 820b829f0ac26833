//! Greedy nearest-position realignment of reported modification sites.
//!
//! Search engines sometimes report a modification at a residue that cannot carry
//! it. These routines move reported positions onto compatible ones, preferring
//! the closest target and resolving competition for a target in favor of the
//! closest claimant. Unlike the assignment engine they ignore scores entirely.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{instrument, trace};

/// Reported position mapped to its new position, or `None` when it could not be placed.
pub type Alignment = BTreeMap<u32, Option<u32>>;

/// Runs a single claiming round: every position claims its nearest target and
/// each target goes to its nearest claimant.
pub fn align(from: &[u32], to: &[u32]) -> Alignment {
    let targets: BTreeSet<u32> = to.iter().copied().collect();
    let options: BTreeMap<u32, BTreeSet<u32>> =
        from.iter().map(|&key| (key, targets.clone())).collect();

    let mut alignment: Alignment = options.keys().map(|&key| (key, None)).collect();
    for (key, target) in nearest_round(&options) {
        alignment.insert(key, Some(target));
    }
    alignment
}

/// Repeats claiming rounds on the unplaced positions and free targets until a
/// round places nothing.
#[instrument(level = "debug", skip_all, fields(from = from.len(), to = to.len()))]
pub fn align_all(from: &[u32], to: &[u32]) -> Alignment {
    let candidates: BTreeMap<u32, Vec<u32>> =
        from.iter().map(|&key| (key, to.to_vec())).collect();
    settle(&candidates, false)
}

/// Realigns positions that each have their own allowed targets.
///
/// Positions left with a single allowed target are settled first; a position
/// whose allowed targets are all taken maps to `None`.
#[instrument(level = "debug", skip_all, fields(keys = candidates.len()))]
pub fn align_constrained(candidates: &BTreeMap<u32, Vec<u32>>) -> Alignment {
    settle(candidates, true)
}

fn settle(candidates: &BTreeMap<u32, Vec<u32>>, singles_first: bool) -> Alignment {
    let mut alignment: Alignment = candidates.keys().map(|&key| (key, None)).collect();
    let mut pending: BTreeSet<u32> = candidates.keys().copied().collect();
    let mut taken: BTreeSet<u32> = BTreeSet::new();

    loop {
        let options: BTreeMap<u32, BTreeSet<u32>> = pending
            .iter()
            .map(|&key| {
                let free: BTreeSet<u32> = candidates[&key]
                    .iter()
                    .copied()
                    .filter(|target| !taken.contains(target))
                    .collect();
                (key, free)
            })
            .filter(|(_, free)| !free.is_empty())
            .collect();

        let singles: BTreeMap<u32, BTreeSet<u32>> = if singles_first {
            options
                .iter()
                .filter(|(_, free)| free.len() == 1)
                .map(|(&key, free)| (key, free.clone()))
                .collect()
        } else {
            BTreeMap::new()
        };

        let round = if singles.is_empty() {
            nearest_round(&options)
        } else {
            nearest_round(&singles)
        };
        if round.is_empty() {
            break;
        }

        for (key, target) in round {
            trace!("Position {} realigned to {}.", key, target);
            alignment.insert(key, Some(target));
            pending.remove(&key);
            taken.insert(target);
        }
    }

    alignment
}

fn nearest_round(options: &BTreeMap<u32, BTreeSet<u32>>) -> BTreeMap<u32, u32> {
    // target -> (distance, claimant) of the best claim so far
    let mut winners: BTreeMap<u32, (u32, u32)> = BTreeMap::new();
    for (&key, targets) in options {
        let Some(target) = nearest(key, targets) else {
            continue;
        };
        let claim = (key.abs_diff(target), key);
        winners
            .entry(target)
            .and_modify(|best| {
                if claim < *best {
                    *best = claim;
                }
            })
            .or_insert(claim);
    }
    winners
        .into_iter()
        .map(|(target, (_, key))| (key, target))
        .collect()
}

fn nearest(key: u32, targets: &BTreeSet<u32>) -> Option<u32> {
    targets
        .iter()
        .copied()
        .min_by_key(|&target| (key.abs_diff(target), target))
}

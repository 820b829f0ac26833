use super::config::SolverConfig;
use super::error::ConfigurationError;
use super::graph::BipartiteGraph;
use super::hungarian::min_cost_assignment;
use crate::core::models::ids::InstanceKey;
use crate::core::models::site::Site;
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedEdge {
    pub instance: InstanceKey,
    pub site: Site,
    pub weight: f64,
}

/// A set of instance/site pairs in which no node appears twice, ordered by
/// `(instance, site)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matching {
    edges: Vec<MatchedEdge>,
}

impl Matching {
    pub fn edges(&self) -> &[MatchedEdge] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchedEdge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    pub fn site_of(&self, instance: InstanceKey) -> Option<Site> {
        self.edges
            .iter()
            .find(|e| e.instance == instance)
            .map(|e| e.site)
    }
}

/// Dense view of the evidence-carrying edges, indexed by graph position.
struct WeightMatrix {
    cols: usize,
    weights: Vec<Option<f64>>,
}

impl WeightMatrix {
    fn weight(&self, row: usize, col: usize) -> Option<f64> {
        self.weights[row * self.cols + col]
    }

    /// Optimal pairs over a subset of rows and columns. Each row is offered a
    /// private zero-cost column standing for "no assignment".
    fn optimal_pairs(&self, rows: &[usize], cols: &[usize]) -> Vec<(usize, usize, f64)> {
        if rows.is_empty() || cols.is_empty() {
            return Vec::new();
        }
        let width = cols.len() + rows.len();
        let cost: Vec<Vec<f64>> = rows
            .iter()
            .map(|&row| {
                (0..width)
                    .map(|k| {
                        cols.get(k)
                            .and_then(|&col| self.weight(row, col))
                            .map_or(0.0, |w| -w)
                    })
                    .collect()
            })
            .collect();

        min_cost_assignment(&cost)
            .into_iter()
            .zip(rows)
            .filter_map(|(k, &row)| {
                let col = *cols.get(k)?;
                self.weight(row, col).map(|w| (row, col, w))
            })
            .collect()
    }

    /// The largest evidence-carrying weight, or zero when no edge carries any.
    fn max_weight(&self) -> f64 {
        self.weights.iter().flatten().fold(0.0, |max, &w| w.max(max))
    }

    fn best_total(&self, rows: &[usize], cols: &[usize]) -> f64 {
        self.optimal_pairs(rows, cols)
            .iter()
            .map(|&(_, _, w)| w)
            .sum()
    }
}

/// Maximum-weight bipartite matching with a reproducible tie-break.
///
/// Among all optimal matchings, instances are settled one at a time in
/// `(modification, instance_index)` order; each takes the lowest site that
/// still admits an optimal completion, and stays unplaced only when no site
/// does. The result is the optimal matching that is lexicographically smallest
/// in `(modification, instance_index, site)` order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchingSolver {
    config: SolverConfig,
}

impl MatchingSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[instrument(skip_all, name = "matching_solver", fields(instances = graph.instances().len(), sites = graph.sites().len()))]
    pub fn solve(&self, graph: &BipartiteGraph) -> Result<Matching, ConfigurationError> {
        let matrix = self.weight_matrix(graph)?;
        let instances = graph.instances();
        let sites = graph.sites();

        let rows: Vec<usize> = sort_by_key(
            (0..instances.len())
                .filter(|&row| (0..sites.len()).any(|col| matrix.weight(row, col).is_some())),
            |&row| instances[row],
        );
        let mut free_cols: Vec<usize> = sort_by_key(
            (0..sites.len())
                .filter(|&col| (0..instances.len()).any(|row| matrix.weight(row, col).is_some())),
            |&col| sites[col],
        );

        if rows.is_empty() {
            debug!("No edge carries evidence; returning an empty matching.");
            return Ok(Matching::default());
        }

        let optimum = matrix.best_total(&rows, &free_cols);
        // A total sums at most one term per row; the slack only absorbs rounding.
        let tolerance = self.config.tie_tolerance * matrix.max_weight() * rows.len() as f64;
        debug!(
            "Optimal total score {:.4} over {} candidate instance(s) and {} site(s) (tie slack {:e}).",
            optimum,
            rows.len(),
            free_cols.len(),
            tolerance
        );

        let mut fixed_total = 0.0;
        let mut edges = Vec::new();

        for (position, &row) in rows.iter().enumerate() {
            let remaining_rows = &rows[position + 1..];
            let mut placed = None;

            for &col in &free_cols {
                let Some(weight) = matrix.weight(row, col) else {
                    continue;
                };
                let rest: Vec<usize> = free_cols.iter().copied().filter(|&c| c != col).collect();
                let reachable = fixed_total + weight + matrix.best_total(remaining_rows, &rest);
                if reachable >= optimum - tolerance {
                    placed = Some((col, weight));
                    break;
                }
            }

            match placed {
                Some((col, weight)) => {
                    trace!(
                        "Instance {} placed at site {} (score {:.4}).",
                        instances[row], sites[col], weight
                    );
                    fixed_total += weight;
                    free_cols.retain(|&c| c != col);
                    edges.push(MatchedEdge {
                        instance: instances[row],
                        site: sites[col],
                        weight,
                    });
                }
                None => trace!("Instance {} left unplaced.", instances[row]),
            }
        }

        debug!(
            "Matched {} instance(s) with total score {:.4}.",
            edges.len(),
            fixed_total
        );
        Ok(Matching { edges })
    }

    fn weight_matrix(&self, graph: &BipartiteGraph) -> Result<WeightMatrix, ConfigurationError> {
        let instance_index = index_nodes(graph.instances(), "instance")?;
        let site_index = index_nodes(graph.sites(), "site")?;

        let cols = graph.sites().len();
        let mut weights = vec![None; graph.instances().len() * cols];
        let mut seen = vec![false; weights.len()];

        for edge in graph.edges() {
            let row = *instance_index.get(&edge.instance).ok_or_else(|| {
                ConfigurationError::InconsistentGraph(format!(
                    "edge references unknown instance {}",
                    edge.instance
                ))
            })?;
            let col = *site_index.get(&edge.site).ok_or_else(|| {
                ConfigurationError::InconsistentGraph(format!(
                    "edge references unknown site {}",
                    edge.site
                ))
            })?;
            if !edge.weight.is_finite() {
                return Err(ConfigurationError::InconsistentGraph(format!(
                    "edge {} -> {} has non-finite weight {}",
                    edge.instance, edge.site, edge.weight
                )));
            }

            let slot = row * cols + col;
            if seen[slot] {
                return Err(ConfigurationError::InconsistentGraph(format!(
                    "duplicate edge {} -> {}",
                    edge.instance, edge.site
                )));
            }
            seen[slot] = true;
            if edge.weight > self.config.score_threshold {
                weights[slot] = Some(edge.weight);
            }
        }

        Ok(WeightMatrix { cols, weights })
    }
}

fn index_nodes<K>(nodes: &[K], kind: &str) -> Result<BTreeMap<K, usize>, ConfigurationError>
where
    K: Ord + Copy + std::fmt::Display,
{
    let mut index = BTreeMap::new();
    for (position, &node) in nodes.iter().enumerate() {
        if index.insert(node, position).is_some() {
            return Err(ConfigurationError::InconsistentGraph(format!(
                "duplicate {} node {}",
                kind, node
            )));
        }
    }
    Ok(index)
}

fn sort_by_key<K: Ord>(indices: impl Iterator<Item = usize>, key: impl Fn(&usize) -> K) -> Vec<usize> {
    let mut sorted: Vec<usize> = indices.collect();
    sorted.sort_by_key(key);
    sorted
}

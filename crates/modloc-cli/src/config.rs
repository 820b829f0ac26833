use crate::cli::LocalizeArgs;
use crate::error::{CliError, Result};
use modloc::engine::config::{SolverConfig, SolverConfigBuilder};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSolverSection {
    #[serde(rename = "score-threshold")]
    score_threshold: Option<f64>,
    #[serde(rename = "tie-tolerance")]
    tie_tolerance: Option<f64>,
}

/// Solver settings as read from a configuration file, before CLI overrides.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialSolverConfig {
    solver: Option<PartialSolverSection>,
}

impl PartialSolverConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads the file named by `--config`, or starts empty.
    pub fn for_args(args: &LocalizeArgs) -> Result<Self> {
        match &args.config {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Precedence, highest first: dedicated flags, `--set`, the file, built-in defaults.
    pub fn merge_with_cli(mut self, args: &LocalizeArgs) -> Result<SolverConfig> {
        self.apply_set_values(&args.set_values)?;
        let solver = self.solver.take().unwrap_or_default();

        let mut builder = SolverConfigBuilder::new();
        if let Some(threshold) = args.score_threshold.or(solver.score_threshold) {
            builder = builder.score_threshold(threshold);
        }
        if let Some(tolerance) = solver.tie_tolerance {
            builder = builder.tie_tolerance(tolerance);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let key = key.trim();
            let value: f64 = value_str.trim().parse().map_err(|_| {
                CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
            })?;

            let solver = self.solver.get_or_insert_with(Default::default);
            match key {
                "solver.score-threshold" => solver.score_threshold = Some(value),
                "solver.tie-tolerance" => solver.tie_tolerance = Some(value),
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}

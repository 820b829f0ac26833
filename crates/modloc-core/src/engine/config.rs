use thiserror::Error;

pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.0;
pub const DEFAULT_TIE_TOLERANCE: f64 = 64.0 * f64::EPSILON;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for parameter '{name}': {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Edges scoring at or below this value carry no evidence and are never matched.
    pub score_threshold: f64,
    /// Rounding slack per summed term, relative to the largest edge weight.
    /// Two matching totals closer than this slack count as tied.
    pub tie_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            tie_tolerance: DEFAULT_TIE_TOLERANCE,
        }
    }
}

#[derive(Default)]
pub struct SolverConfigBuilder {
    score_threshold: Option<f64>,
    tie_tolerance: Option<f64>,
}

impl SolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }
    pub fn tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<SolverConfig, ConfigError> {
        let score_threshold = self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD);
        if !score_threshold.is_finite() || score_threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "score_threshold",
                value: score_threshold,
            });
        }

        let tie_tolerance = self.tie_tolerance.unwrap_or(DEFAULT_TIE_TOLERANCE);
        if !tie_tolerance.is_finite() || tie_tolerance < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "tie_tolerance",
                value: tie_tolerance,
            });
        }

        Ok(SolverConfig {
            score_threshold,
            tie_tolerance,
        })
    }
}

use crate::core::models::ids::ModificationId;
use crate::core::models::site::Site;
use thiserror::Error;

/// Malformed input handed to the assignment engine.
///
/// Always a contract violation by the caller or the upstream scorer, never a
/// transient condition.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Modification {modification} has candidate sites but no occurrence count")]
    MissingOccurrenceCount { modification: ModificationId },

    #[error("Modification {modification} lists site {site} as a candidate but has no score for it")]
    MissingScore {
        modification: ModificationId,
        site: Site,
    },

    #[error("Modification {modification} has a non-finite score ({score}) at site {site}")]
    InvalidScore {
        modification: ModificationId,
        site: Site,
        score: f64,
    },

    #[error("Modification mass {0} is not a number")]
    InvalidMass(f64),

    #[error("Inconsistent matching graph: {0}")]
    InconsistentGraph(String),
}

use thiserror::Error;

/// Violations of the data model invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("movie title must not be empty")]
    EmptyTitle,

    #[error("partial rating: score {score:?} with count {count:?} (both or neither must be present)")]
    PartialRating {
        score: Option<f64>,
        count: Option<u64>,
    },

    #[error("top list position {0} is outside 1..={max}", max = crate::TOPLIST_SIZE)]
    ToplistOutOfRange(u32),

    #[error("unknown site name: {0}")]
    UnknownSite(String),
}

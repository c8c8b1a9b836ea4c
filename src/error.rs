use thiserror::Error;

/// Conditions a caller of the recommender must be able to branch on.
///
/// Clamping an oversized neighborhood is not listed here: it is recoverable
/// and handled inside the recommender with a warning.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecommendError {
    #[error("unknown user position {position}, index holds {num_users} users")]
    InvalidUser { position: usize, num_users: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

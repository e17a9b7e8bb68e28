use thiserror::Error;
use crate::models::UserId;
use crate::services::StoreError;

/// Errors returned by the matching operations
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Profile not found for user {0}; the survey has not been completed")]
    ProfileNotFound(UserId),

    #[error("No answers recorded for user {0}")]
    NoAnswers(UserId),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("No clubs available to recommend for user {0}")]
    NoClubsAvailable(UserId),

    #[error("No similar users found for user {0}")]
    NoSimilarUsers(UserId),

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl MatchError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            MatchError::ProfileNotFound(_) => "profile_not_found",
            MatchError::NoAnswers(_) => "no_answers",
            MatchError::InvalidIdentifier(_) => "invalid_identifier",
            MatchError::NoClubsAvailable(_) => "no_clubs_available",
            MatchError::NoSimilarUsers(_) => "no_similar_users",
            MatchError::Persistence(_) => "persistence_failure",
        }
    }
}

/// Parse a caller-supplied identifier; identifiers are positive integers
pub fn parse_id(raw: &str) -> Result<i64, MatchError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MatchError::InvalidIdentifier(raw.to_string())),
    }
}

use serde::{Deserialize, Serialize};
use crate::models::domain::{Club, Meeting, UserId, UserSimilarity};
use crate::models::requests::RecommendationStrategy;

/// Response for the similar users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarUsersResponse {
    pub user_id: UserId,
    pub similar_users: Vec<UserSimilarity>,
    pub count: usize,
}

/// Response for the club recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubRecommendationsResponse {
    pub user_id: UserId,
    pub strategy: RecommendationStrategy,
    pub clubs: Vec<Club>,
}

/// Response for the meeting recommendation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingRecommendationsResponse {
    pub user_id: UserId,
    pub meetings: Vec<Meeting>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

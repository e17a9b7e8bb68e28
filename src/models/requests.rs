use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{NewClub, Vibe};

/// `?limit=` query on list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Which ranking the club recommendation endpoint uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStrategy {
    Preference,
    #[default]
    SimilarMembers,
}

/// Query for `GET /users/{id}/clubs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClubRecommendationQuery {
    #[serde(default)]
    pub strategy: RecommendationStrategy,
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to create a club
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub vibe: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default, alias = "maxMembers")]
    pub max_members: i32,
    #[serde(default, alias = "preferredScores")]
    pub preferred_scores: Option<String>,
}

impl From<CreateClubRequest> for NewClub {
    fn from(req: CreateClubRequest) -> Self {
        NewClub {
            name: req.name,
            description: req.description,
            category: req.category,
            vibe: req.vibe.as_deref().map(Vibe::parse).unwrap_or_default(),
            location: req.location,
            max_members: req.max_members,
            preferred_scores: req.preferred_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_club_validation() {
        let req: CreateClubRequest =
            serde_json::from_str(r#"{"name": "", "maxMembers": -1}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("max_members"));
    }

    #[test]
    fn test_create_club_into_new_club() {
        let req: CreateClubRequest =
            serde_json::from_str(r#"{"name": "Night Runners", "vibe": "Energetic", "max_members": 12}"#)
                .unwrap();
        assert!(req.validate().is_ok());

        let club = NewClub::from(req);
        assert_eq!(club.vibe, Vibe::Energetic);
        assert_eq!(club.max_members, 12);
    }

    #[test]
    fn test_strategy_defaults_to_similar_members() {
        let query: ClubRecommendationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.strategy, RecommendationStrategy::SimilarMembers);
        assert!(query.limit.is_none());
    }
}

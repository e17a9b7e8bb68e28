// Model exports
pub mod domain;
pub mod outcomes;
pub mod requests;
pub mod responses;

pub use domain::{
    AnsweredOption, Axis, Club, ClubId, ClubMembership, MatchPolicy, Meeting, MeetingId,
    MembershipInsert, NewClub, ProfileVector, UserGroup, UserId, UserProfile, UserSimilarity, Vibe,
};
pub use outcomes::{
    AxisTendency, ClubJoinResult, GlobalMatchReport, GroupAssignment, GroupMatchReport,
    GroupReport, MatchOutcome, ProfileAnalysis, ProfileType, SingleMatchReport, TendencyLevel,
    Trait,
};
pub use requests::{ClubRecommendationQuery, CreateClubRequest, LimitQuery, RecommendationStrategy};
pub use responses::{
    ClubRecommendationsResponse, ErrorResponse, HealthResponse, MeetingRecommendationsResponse,
    SimilarUsersResponse,
};

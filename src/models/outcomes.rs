use serde::{Deserialize, Serialize};
use crate::models::domain::{Axis, Club, ClubId, Meeting, ProfileVector, UserId, UserSimilarity};

/// What an auto-match actually did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// At least one membership was created
    Matched,
    /// Nothing joined; every attempt found an existing membership
    AlreadyMember,
    /// Nothing joined; some clubs were full and none failed
    NoChange,
    /// Nothing joined and at least one insert failed in the store
    Failed,
}

impl MatchOutcome {
    /// Classify a run from how many joins succeeded, failed or hit a full club
    pub fn from_counts(joined: usize, failed: usize, full: usize) -> Self {
        if joined > 0 {
            MatchOutcome::Matched
        } else if failed > 0 {
            MatchOutcome::Failed
        } else if full > 0 {
            MatchOutcome::NoChange
        } else {
            MatchOutcome::AlreadyMember
        }
    }
}

/// Result of a single-user auto-match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleMatchReport {
    pub outcome: MatchOutcome,
    pub joined_clubs: Vec<Club>,
    pub already_member_clubs: Vec<Club>,
    /// Clubs that filled up before the join landed
    #[serde(default)]
    pub full_clubs: Vec<Club>,
    /// Clubs whose insert failed in the store
    #[serde(default)]
    pub failed_clubs: Vec<Club>,
    pub attempted_count: usize,
    pub total_recommended: usize,
}

/// Per-club result of a group auto-match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubJoinResult {
    pub club: Club,
    pub joined_users: Vec<UserId>,
    /// Users who were already members
    pub skipped_users: Vec<UserId>,
    #[serde(default)]
    pub full_users: Vec<UserId>,
    #[serde(default)]
    pub failed_users: Vec<UserId>,
}

/// Result of a group auto-match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMatchReport {
    pub outcome: MatchOutcome,
    /// Requester first, then the sampled similar users
    pub group_users: Vec<UserId>,
    /// Every attempted club, in attempt order
    pub attempts: Vec<ClubJoinResult>,
    pub attempted_clubs: usize,
}

impl GroupMatchReport {
    /// Attempted clubs that gained at least one member
    pub fn matched_clubs(&self) -> impl Iterator<Item = &ClubJoinResult> {
        self.attempts.iter().filter(|r| !r.joined_users.is_empty())
    }
}

/// What happened to one cluster during global matching
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupAssignment {
    Assigned {
        club_id: ClubId,
        club_name: String,
        added_users: Vec<UserId>,
        /// Users who were already members
        skipped_users: Vec<UserId>,
        /// Users turned away because the club filled up concurrently
        #[serde(default)]
        full_users: Vec<UserId>,
        #[serde(default)]
        failed_users: Vec<UserId>,
    },
    NoEligibleClub,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    pub members: Vec<UserId>,
    pub mean_profile: ProfileVector,
    pub assignment: GroupAssignment,
}

/// Result of a global clustering and assignment run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalMatchReport {
    pub groups: Vec<GroupReport>,
    pub total_memberships: i64,
    pub active_clubs: i64,
}

impl GlobalMatchReport {
    /// Number of memberships this run created
    pub fn added_memberships(&self) -> usize {
        self.groups
            .iter()
            .map(|g| match &g.assignment {
                GroupAssignment::Assigned { added_users, .. } => added_users.len(),
                GroupAssignment::NoEligibleClub => 0,
            })
            .sum()
    }
}

/// Coarse bucket of a single axis score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TendencyLevel {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTendency {
    pub axis: Axis,
    pub score: f64,
    pub level: TendencyLevel,
}

/// Archetype derived from the dominant axes of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    PassionateSocializer,
    WarmSupporter,
    AdventurousExplorer,
    DeepSpecialist,
    FlexibleAdapter,
    FriendlyExtrovert,
    FocusedImmerser,
    BalancedHarmonizer,
}

impl ProfileType {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileType::PassionateSocializer => "Passionate socializer",
            ProfileType::WarmSupporter => "Warm supporter",
            ProfileType::AdventurousExplorer => "Adventurous explorer",
            ProfileType::DeepSpecialist => "Deep specialist",
            ProfileType::FlexibleAdapter => "Flexible adapter",
            ProfileType::FriendlyExtrovert => "Friendly extrovert",
            ProfileType::FocusedImmerser => "Focused immerser",
            ProfileType::BalancedHarmonizer => "Balanced harmonizer",
        }
    }
}

/// Descriptive personality trait shown alongside the profile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trait {
    Adaptive,
    SituationallyPlanned,
    Methodical,
    ActiveAndSocial,
    PeopleOriented,
    ChallengeSeeking,
    CalmFocused,
    DeepBondsAndFocus,
    CloseKnit,
    ExpertiseDriven,
}

impl Trait {
    pub fn description(&self) -> &'static str {
        match self {
            Trait::Adaptive => "Adapts easily to circumstances and balances introversion with extroversion.",
            Trait::SituationallyPlanned => "Sometimes planned, sometimes spontaneous.",
            Trait::Methodical => "Prefers a planned, systematic approach.",
            Trait::ActiveAndSocial => "Enjoys a wide range of activities and values harmony with others.",
            Trait::PeopleOriented => "Enjoys time with people and prefers deep conversation.",
            Trait::ChallengeSeeking => "Jumps into new activities and enjoys a challenge.",
            Trait::CalmFocused => "Prefers to focus in a quiet, stable environment.",
            Trait::DeepBondsAndFocus => "Builds deep relationships and stays absorbed in one thing for a long time.",
            Trait::CloseKnit => "Values deep bonds with a small circle of people.",
            Trait::ExpertiseDriven => "Dives deep into interests and pursues expertise.",
        }
    }
}

/// Complete personality analysis of one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileAnalysis {
    pub user_id: UserId,
    pub scores: ProfileVector,
    pub profile_type: ProfileType,
    pub profile_label: String,
    pub tendencies: Vec<AxisTendency>,
    pub traits: Vec<Trait>,
    pub trait_descriptions: Vec<String>,
    pub suggested_clubs: Vec<Club>,
    pub suggested_meetings: Vec<Meeting>,
    pub similar_users: Vec<UserSimilarity>,
}

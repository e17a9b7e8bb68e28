use std::sync::Arc;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};
use crate::core::{
    analysis::{profile_type, tendencies, traits},
    grouping::{find_best_club, group_similar_users},
    recommend::{merge_unique, rank_by_member_overlap, rank_by_preference, rank_meetings},
    scoring::calculate_scores,
    similarity::rank_similar,
};
use crate::error::MatchError;
use crate::models::{
    Club, ClubId, ClubJoinResult, GlobalMatchReport, GroupAssignment, GroupMatchReport,
    GroupReport, MatchOutcome, MatchPolicy, Meeting, MembershipInsert, ProfileAnalysis,
    SingleMatchReport, UserId, UserProfile, UserSimilarity,
};
use crate::services::MatchStore;

/// Candidate clubs gathered before a randomized auto-match
const AUTO_MATCH_CANDIDATES: usize = 20;
/// Most clubs a single user is auto-joined to
const MAX_SINGLE_CLUBS: usize = 5;
/// Similar users sampled into an ad-hoc group, requester excluded
const GROUP_SIZE_RANGE: (usize, usize) = (2, 4);
/// Clubs an ad-hoc group is auto-joined to
const GROUP_CLUBS_RANGE: (usize, usize) = (1, 3);

const ANALYSIS_CLUBS: usize = 10;
const ANALYSIS_SIMILAR_CLUBS: usize = 5;
const ANALYSIS_MEETINGS: usize = 10;
const ANALYSIS_SIMILAR_USERS: usize = 10;

/// Matching orchestrator
///
/// Loads data through a `MatchStore`, runs the pure algorithms from `core` and
/// writes membership changes back.
///
/// # Operations
/// - profile scoring and analysis
/// - similar users and club/meeting recommendations
/// - global clustering and club assignment
/// - randomized single-user and group auto-matching
#[derive(Clone)]
pub struct Matcher {
    store: Arc<dyn MatchStore>,
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(store: Arc<dyn MatchStore>, policy: MatchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn with_default_policy(store: Arc<dyn MatchStore>) -> Self {
        Self::new(store, MatchPolicy::default())
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Recompute a user's profile from their answers and store it
    pub async fn compute_scores(&self, user_id: UserId) -> Result<UserProfile, MatchError> {
        let answers = self.store.list_answers(user_id).await?;
        let scores = calculate_scores(&answers).ok_or(MatchError::NoAnswers(user_id))?;

        let profile = UserProfile {
            user_id,
            scores,
            updated_at: Some(chrono::Utc::now()),
        };
        self.store.upsert_profile(&profile).await?;

        info!(
            "Computed profile for user {} from {} answers: {:?}",
            user_id,
            answers.len(),
            scores
        );

        Ok(profile)
    }

    /// Users at least `similarity_threshold` similar to `user_id`, most similar first
    pub async fn find_similar_users(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<UserSimilarity>, MatchError> {
        let profile = self.require_profile(user_id).await?;
        self.similar_to(&profile, limit).await
    }

    /// Clubs ranked by size preference
    pub async fn recommend_clubs(&self, user_id: UserId, limit: usize) -> Result<Vec<Club>, MatchError> {
        let profile = self.require_profile(user_id).await?;
        self.preference_clubs(&profile, limit).await
    }

    /// Clubs ranked by how many similar users already belong to them
    ///
    /// Falls back to preference ranking when nobody is similar enough.
    pub async fn recommend_clubs_by_similar_members(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Club>, MatchError> {
        let profile = self.require_profile(user_id).await?;
        self.similar_member_clubs(&profile, limit).await
    }

    /// Similar-member recommendations, topped up with preference ones when short
    pub async fn recommend_clubs_with_top_up(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Club>, MatchError> {
        let profile = self.require_profile(user_id).await?;
        self.topped_up_clubs(&profile, limit).await
    }

    pub async fn recommend_meetings(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Meeting>, MatchError> {
        let profile = self.require_profile(user_id).await?;
        let meetings = self.store.list_meetings().await?;
        Ok(rank_meetings(&profile.scores, meetings, limit))
    }

    /// Full personality analysis with suggestions
    pub async fn analyze(&self, user_id: UserId) -> Result<ProfileAnalysis, MatchError> {
        let profile = self.require_profile(user_id).await?;

        let by_preference = self.preference_clubs(&profile, ANALYSIS_CLUBS).await?;
        let by_members = self.similar_member_clubs(&profile, ANALYSIS_SIMILAR_CLUBS).await?;
        let meetings = rank_meetings(
            &profile.scores,
            self.store.list_meetings().await?,
            ANALYSIS_MEETINGS,
        );
        let similar_users = self.similar_to(&profile, ANALYSIS_SIMILAR_USERS).await?;

        let kind = profile_type(&profile.scores);
        let traits = traits(&profile.scores);

        Ok(ProfileAnalysis {
            user_id,
            scores: profile.scores,
            profile_type: kind,
            profile_label: kind.label().to_string(),
            tendencies: tendencies(&profile.scores),
            trait_descriptions: traits.iter().map(|t| t.description().to_string()).collect(),
            traits,
            suggested_clubs: merge_unique(by_preference, by_members),
            suggested_meetings: meetings,
            similar_users,
        })
    }

    /// Cluster every profiled user and assign each cluster to its best club
    ///
    /// Existing memberships are skipped, so repeated runs do not duplicate rows.
    /// Club sizes are tracked during the run so later groups see earlier joins.
    pub async fn run_global_matching(&self) -> Result<GlobalMatchReport, MatchError> {
        let mut profiles = self.store.list_profiles().await?;
        profiles.sort_by_key(|p| p.user_id);

        let groups = group_similar_users(&profiles, self.policy.similarity_threshold);
        let mut clubs = self.store.list_clubs().await?;

        info!(
            "Global matching: {} profiles in {} groups, {} clubs",
            profiles.len(),
            groups.len(),
            clubs.len()
        );

        let mut reports = Vec::with_capacity(groups.len());

        for group in groups {
            if group.is_empty() {
                continue;
            }

            let assignment = match find_best_club(&group, &clubs) {
                None => {
                    debug!("No eligible club for group of {}", group.len());
                    GroupAssignment::NoEligibleClub
                }
                Some(idx) => {
                    let club_id = clubs[idx].id;
                    let joins = self.join_members(club_id, &group.members).await;

                    // the store already bumped its count; mirror it for later groups
                    clubs[idx].member_count += joins.added.len() as i32;

                    debug!(
                        "Group of {} assigned to club {}: {} added, {} skipped, {} full, {} failed",
                        group.len(),
                        club_id,
                        joins.added.len(),
                        joins.skipped.len(),
                        joins.full.len(),
                        joins.failed.len()
                    );

                    GroupAssignment::Assigned {
                        club_id,
                        club_name: clubs[idx].name.clone(),
                        added_users: joins.added,
                        skipped_users: joins.skipped,
                        full_users: joins.full,
                        failed_users: joins.failed,
                    }
                }
            };

            reports.push(GroupReport {
                members: group.members,
                mean_profile: group.mean,
                assignment,
            });
        }

        let report = GlobalMatchReport {
            groups: reports,
            total_memberships: self.store.count_memberships().await?,
            active_clubs: self.store.count_active_clubs().await?,
        };

        info!(
            "Global matching added {} memberships ({} total, {} active clubs)",
            report.added_memberships(),
            report.total_memberships,
            report.active_clubs
        );

        Ok(report)
    }

    /// Join a user to a random handful of recommended clubs that still have room
    pub async fn auto_match_single<R: Rng>(
        &self,
        user_id: UserId,
        rng: &mut R,
    ) -> Result<SingleMatchReport, MatchError> {
        let profile = self.require_profile(user_id).await?;

        let mut candidates = self.open_clubs(&profile, 1).await?;
        if candidates.is_empty() {
            return Err(MatchError::NoClubsAvailable(user_id));
        }

        let total_recommended = candidates.len();
        let attempted_count = rng.gen_range(1..=MAX_SINGLE_CLUBS.min(total_recommended));
        candidates.shuffle(rng);

        let mut joined_clubs = Vec::new();
        let mut already_member_clubs = Vec::new();
        let mut full_clubs = Vec::new();
        let mut failed_clubs = Vec::new();

        for club in candidates.into_iter().take(attempted_count) {
            match self.store.add_membership(club.id, user_id).await {
                Ok(MembershipInsert::Inserted) => joined_clubs.push(club),
                Ok(MembershipInsert::AlreadyMember) => already_member_clubs.push(club),
                Ok(MembershipInsert::ClubFull) => full_clubs.push(club),
                Err(e) => {
                    warn!("Failed to add user {} to club {}: {}", user_id, club.id, e);
                    failed_clubs.push(club);
                }
            }
        }

        let outcome = MatchOutcome::from_counts(joined_clubs.len(), failed_clubs.len(), full_clubs.len());

        info!(
            "Auto-matched user {}: joined {}, already member of {}, full {}, failed {}, attempted {}",
            user_id,
            joined_clubs.len(),
            already_member_clubs.len(),
            full_clubs.len(),
            failed_clubs.len(),
            attempted_count
        );

        Ok(SingleMatchReport {
            outcome,
            joined_clubs,
            already_member_clubs,
            full_clubs,
            failed_clubs,
            attempted_count,
            total_recommended,
        })
    }

    /// Join the user and a few random similar users to a few recommended clubs
    pub async fn auto_match_group<R: Rng>(
        &self,
        user_id: UserId,
        rng: &mut R,
    ) -> Result<GroupMatchReport, MatchError> {
        let profile = self.require_profile(user_id).await?;

        let mut similar = self.similar_to(&profile, self.policy.similar_user_pool).await?;
        if similar.is_empty() {
            return Err(MatchError::NoSimilarUsers(user_id));
        }

        let group_size = rng
            .gen_range(GROUP_SIZE_RANGE.0..=GROUP_SIZE_RANGE.1)
            .min(similar.len());
        similar.shuffle(rng);

        let group_users: Vec<UserId> = std::iter::once(user_id)
            .chain(similar.iter().take(group_size).map(|s| s.user_id))
            .collect();

        let mut candidates = self.open_clubs(&profile, group_users.len()).await?;
        if candidates.is_empty() {
            return Err(MatchError::NoClubsAvailable(user_id));
        }
        candidates.shuffle(rng);

        let attempted_clubs = rng
            .gen_range(GROUP_CLUBS_RANGE.0..=GROUP_CLUBS_RANGE.1)
            .min(candidates.len());

        let mut attempts = Vec::with_capacity(attempted_clubs);

        for club in candidates.into_iter().take(attempted_clubs) {
            let joins = self.join_members(club.id, &group_users).await;

            attempts.push(ClubJoinResult {
                club,
                joined_users: joins.added,
                skipped_users: joins.skipped,
                full_users: joins.full,
                failed_users: joins.failed,
            });
        }

        let joined: usize = attempts.iter().map(|a| a.joined_users.len()).sum();
        let failed: usize = attempts.iter().map(|a| a.failed_users.len()).sum();
        let full: usize = attempts.iter().map(|a| a.full_users.len()).sum();
        let outcome = MatchOutcome::from_counts(joined, failed, full);

        info!(
            "Group auto-match for user {}: {} users, {} clubs attempted, outcome {:?}",
            user_id,
            group_users.len(),
            attempted_clubs,
            outcome
        );

        Ok(GroupMatchReport {
            outcome,
            group_users,
            attempts,
            attempted_clubs,
        })
    }

    async fn require_profile(&self, user_id: UserId) -> Result<UserProfile, MatchError> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or(MatchError::ProfileNotFound(user_id))
    }

    async fn similar_to(
        &self,
        profile: &UserProfile,
        limit: usize,
    ) -> Result<Vec<UserSimilarity>, MatchError> {
        let others = self.store.list_profiles_excluding(profile.user_id).await?;
        let similar = rank_similar(profile, &others, self.policy.similarity_threshold, limit);

        debug!(
            "User {}: {} of {} profiles are similar",
            profile.user_id,
            similar.len(),
            others.len()
        );

        Ok(similar)
    }

    async fn preference_clubs(&self, profile: &UserProfile, limit: usize) -> Result<Vec<Club>, MatchError> {
        let clubs = self.store.list_clubs().await?;
        Ok(rank_by_preference(&profile.scores, clubs, limit))
    }

    async fn similar_member_clubs(
        &self,
        profile: &UserProfile,
        limit: usize,
    ) -> Result<Vec<Club>, MatchError> {
        let similar = self.similar_to(profile, self.policy.similar_user_pool).await?;
        if similar.is_empty() {
            debug!(
                "No similar users for {}, falling back to preference ranking",
                profile.user_id
            );
            return self.preference_clubs(profile, limit).await;
        }

        let user_ids: Vec<UserId> = similar.iter().map(|s| s.user_id).collect();
        let memberships = self.store.list_memberships_for_users(&user_ids).await?;
        let clubs = self.store.list_clubs().await?;

        Ok(rank_by_member_overlap(clubs, &memberships, limit))
    }

    /// Auto-match candidates with room for `seats` more members
    async fn open_clubs(&self, profile: &UserProfile, seats: usize) -> Result<Vec<Club>, MatchError> {
        let mut clubs = self.topped_up_clubs(profile, AUTO_MATCH_CANDIDATES).await?;
        clubs.retain(|club| club.can_fit(seats));
        Ok(clubs)
    }

    async fn topped_up_clubs(&self, profile: &UserProfile, limit: usize) -> Result<Vec<Club>, MatchError> {
        let clubs = self.similar_member_clubs(profile, limit).await?;
        if clubs.len() >= self.policy.top_up_threshold {
            return Ok(clubs);
        }

        let extra = self.preference_clubs(profile, limit).await?;
        Ok(merge_unique(clubs, extra))
    }

    /// Add each user to the club
    ///
    /// One failure never stops the remaining users.
    async fn join_members(&self, club_id: ClubId, user_ids: &[UserId]) -> MemberJoins {
        let mut joins = MemberJoins::default();

        for &user_id in user_ids {
            match self.store.add_membership(club_id, user_id).await {
                Ok(MembershipInsert::Inserted) => joins.added.push(user_id),
                Ok(MembershipInsert::AlreadyMember) => joins.skipped.push(user_id),
                Ok(MembershipInsert::ClubFull) => joins.full.push(user_id),
                Err(e) => {
                    warn!("Failed to add user {} to club {}: {}", user_id, club_id, e);
                    joins.failed.push(user_id);
                }
            }
        }

        joins
    }
}

/// Per-user results of joining several users to one club
#[derive(Debug, Default)]
struct MemberJoins {
    added: Vec<UserId>,
    skipped: Vec<UserId>,
    full: Vec<UserId>,
    failed: Vec<UserId>,
}

use async_trait::async_trait;
use thiserror::Error;
use crate::models::{
    AnsweredOption, Club, ClubId, ClubMembership, Meeting, MembershipInsert, NewClub, UserId,
    UserProfile,
};

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Data access needed by the matching engine
///
/// `add_membership` is the only write path for memberships. It must be one atomic
/// unit: capacity check, insert-if-absent and `member_count + 1` together, so that
/// concurrent matching runs keep `member_count` equal to the number of membership
/// rows and never above a positive `max_members`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Insert or fully overwrite a user's profile
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    async fn list_answers(&self, user_id: UserId) -> Result<Vec<AnsweredOption>, StoreError>;

    /// All profiles, ordered by ascending user id
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError>;

    /// All profiles except `user_id`'s, ordered by ascending user id
    async fn list_profiles_excluding(&self, user_id: UserId) -> Result<Vec<UserProfile>, StoreError>;

    /// All clubs, ordered by ascending id
    async fn list_clubs(&self) -> Result<Vec<Club>, StoreError>;

    async fn create_club(&self, club: &NewClub) -> Result<Club, StoreError>;

    async fn list_memberships_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<ClubMembership>, StoreError>;

    /// Join a user to a club if they are not a member and the club has room
    ///
    /// Fails with `NotFound` when the club does not exist.
    async fn add_membership(
        &self,
        club_id: ClubId,
        user_id: UserId,
    ) -> Result<MembershipInsert, StoreError>;

    /// All meetings, ordered by ascending id
    async fn list_meetings(&self) -> Result<Vec<Meeting>, StoreError>;

    async fn count_memberships(&self) -> Result<i64, StoreError>;

    /// Clubs with at least one member
    async fn count_active_clubs(&self) -> Result<i64, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

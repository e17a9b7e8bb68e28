//! In-memory `MatchStore` for tests, demos and local runs without PostgreSQL.
//!
//! Every operation takes the single state lock, so the capacity check, insert and
//! count bump of `add_membership` happen as one step.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::models::{
    AnsweredOption, Club, ClubId, ClubMembership, Meeting, MembershipInsert, NewClub,
    ProfileVector, UserId, UserProfile,
};
use crate::services::store::{MatchStore, StoreError};

#[derive(Debug, Default)]
struct MemoryState {
    profiles: BTreeMap<UserId, UserProfile>,
    answers: HashMap<UserId, Vec<AnsweredOption>>,
    clubs: BTreeMap<ClubId, Club>,
    memberships: Vec<ClubMembership>,
    meetings: Vec<Meeting>,
    failing_inserts: HashSet<(ClubId, UserId)>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut MemoryState {
        self.state.get_mut().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_profile(mut self, user_id: UserId, scores: ProfileVector) -> Self {
        self.state_mut()
            .profiles
            .insert(user_id, UserProfile::new(user_id, scores));
        self
    }

    pub fn with_answers(mut self, user_id: UserId, answers: Vec<AnsweredOption>) -> Self {
        self.state_mut().answers.insert(user_id, answers);
        self
    }

    pub fn with_club(mut self, club: Club) -> Self {
        self.state_mut().clubs.insert(club.id, club);
        self
    }

    /// Seed a membership without touching the club's member count
    pub fn with_membership(mut self, club_id: ClubId, user_id: UserId) -> Self {
        self.state_mut().memberships.push(ClubMembership {
            club_id,
            user_id,
            joined_at: chrono::Utc::now(),
        });
        self
    }

    pub fn with_meeting(mut self, meeting: Meeting) -> Self {
        self.state_mut().meetings.push(meeting);
        self
    }

    /// Make every insert of this (club, user) membership fail
    pub fn with_failing_insert(mut self, club_id: ClubId, user_id: UserId) -> Self {
        self.state_mut().failing_inserts.insert((club_id, user_id));
        self
    }

    pub fn memberships(&self) -> Result<Vec<ClubMembership>, StoreError> {
        Ok(self.read()?.memberships.clone())
    }

    pub fn club(&self, club_id: ClubId) -> Result<Option<Club>, StoreError> {
        Ok(self.read()?.clubs.get(&club_id).cloned())
    }

    pub fn is_member(&self, club_id: ClubId, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .any(|m| m.club_id == club_id && m.user_id == user_id))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.read()?.profiles.get(&user_id).cloned())
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.write()?.profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn list_answers(&self, user_id: UserId) -> Result<Vec<AnsweredOption>, StoreError> {
        Ok(self.read()?.answers.get(&user_id).cloned().unwrap_or_default())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.read()?.profiles.values().cloned().collect())
    }

    async fn list_profiles_excluding(&self, user_id: UserId) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self
            .read()?
            .profiles
            .values()
            .filter(|p| p.user_id != user_id)
            .cloned()
            .collect())
    }

    async fn list_clubs(&self) -> Result<Vec<Club>, StoreError> {
        Ok(self.read()?.clubs.values().cloned().collect())
    }

    async fn create_club(&self, club: &NewClub) -> Result<Club, StoreError> {
        let mut state = self.write()?;
        let id = state.clubs.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Club {
            id,
            name: club.name.clone(),
            description: club.description.clone(),
            category: club.category.clone(),
            vibe: club.vibe,
            location: club.location.clone(),
            member_count: 0,
            max_members: club.max_members,
            preferred_scores: club.preferred_scores.clone(),
        };
        state.clubs.insert(id, created.clone());
        Ok(created)
    }

    async fn list_memberships_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<ClubMembership>, StoreError> {
        Ok(self
            .read()?
            .memberships
            .iter()
            .filter(|m| user_ids.contains(&m.user_id))
            .cloned()
            .collect())
    }

    async fn add_membership(
        &self,
        club_id: ClubId,
        user_id: UserId,
    ) -> Result<MembershipInsert, StoreError> {
        let mut state = self.write()?;

        if state.failing_inserts.contains(&(club_id, user_id)) {
            return Err(StoreError::Unavailable(format!(
                "insert of membership ({}, {}) rejected",
                club_id, user_id
            )));
        }

        if state
            .memberships
            .iter()
            .any(|m| m.club_id == club_id && m.user_id == user_id)
        {
            return Ok(MembershipInsert::AlreadyMember);
        }

        let club = state
            .clubs
            .get_mut(&club_id)
            .ok_or_else(|| StoreError::NotFound(format!("club {}", club_id)))?;

        if !club.can_fit(1) {
            return Ok(MembershipInsert::ClubFull);
        }
        club.member_count += 1;

        state.memberships.push(ClubMembership {
            club_id,
            user_id,
            joined_at: chrono::Utc::now(),
        });
        Ok(MembershipInsert::Inserted)
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let mut meetings = self.read()?.meetings.clone();
        meetings.sort_by_key(|m| m.id);
        Ok(meetings)
    }

    async fn count_memberships(&self) -> Result<i64, StoreError> {
        Ok(self.read()?.memberships.len() as i64)
    }

    async fn count_active_clubs(&self) -> Result<i64, StoreError> {
        Ok(self
            .read()?
            .clubs
            .values()
            .filter(|c| c.member_count > 0)
            .count() as i64)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.read().map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vibe;
    use std::sync::Arc;

    fn new_club(name: &str) -> NewClub {
        NewClub {
            name: name.to_string(),
            description: None,
            category: None,
            vibe: Vibe::Chill,
            location: None,
            max_members: 0,
            preferred_scores: None,
        }
    }

    #[tokio::test]
    async fn test_add_membership_is_idempotent() {
        let store = InMemoryStore::new();
        let club = store.create_club(&new_club("Tea Tasting")).await.unwrap();

        assert_eq!(
            store.add_membership(club.id, 1).await.unwrap(),
            MembershipInsert::Inserted
        );
        assert_eq!(
            store.add_membership(club.id, 1).await.unwrap(),
            MembershipInsert::AlreadyMember
        );
        assert_eq!(store.count_memberships().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_club_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        let first = store.create_club(&new_club("A")).await.unwrap();
        let second = store.create_club(&new_club("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list_clubs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_membership_bumps_count_and_respects_capacity() {
        let store = InMemoryStore::new();
        let mut club = new_club("Climbing");
        club.max_members = 2;
        let club = store.create_club(&club).await.unwrap();

        assert_eq!(store.add_membership(club.id, 1).await.unwrap(), MembershipInsert::Inserted);
        assert_eq!(store.add_membership(club.id, 2).await.unwrap(), MembershipInsert::Inserted);
        assert_eq!(store.add_membership(club.id, 3).await.unwrap(), MembershipInsert::ClubFull);
        // existing members are reported as such even when the club is full
        assert_eq!(store.add_membership(club.id, 1).await.unwrap(), MembershipInsert::AlreadyMember);

        assert_eq!(store.club(club.id).unwrap().unwrap().member_count, 2);
        assert_eq!(store.count_memberships().await.unwrap(), 2);
        assert_eq!(store.count_active_clubs().await.unwrap(), 1);

        let missing = store.add_membership(99, 1).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_of_same_user_insert_once() {
        let store = Arc::new(InMemoryStore::new());
        let club_id = store.create_club(&new_club("Chess")).await.unwrap().id;

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add_membership(club_id, 7).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == MembershipInsert::Inserted {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.count_memberships().await.unwrap(), 1);
        assert_eq!(store.club(club_id).unwrap().unwrap().member_count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_keep_count_equal_to_rows() {
        let store = Arc::new(InMemoryStore::new());
        let mut club = new_club("Book Club");
        club.max_members = 20;
        let club_id = store.create_club(&club).await.unwrap().id;

        let handles: Vec<_> = (1..=50)
            .map(|user_id| {
                let store = store.clone();
                tokio::spawn(async move { store.add_membership(club_id, user_id).await })
            })
            .collect();

        let mut inserted = 0;
        let mut full = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                MembershipInsert::Inserted => inserted += 1,
                MembershipInsert::ClubFull => full += 1,
                MembershipInsert::AlreadyMember => panic!("distinct users cannot already be members"),
            }
        }

        assert_eq!(inserted, 20);
        assert_eq!(full, 30);
        assert_eq!(store.count_memberships().await.unwrap(), 20);
        assert_eq!(store.club(club_id).unwrap().unwrap().member_count, 20);
    }

    #[tokio::test]
    async fn test_profiles_listed_in_user_order() {
        let store = InMemoryStore::new()
            .with_profile(3, ProfileVector::uniform(30.0))
            .with_profile(1, ProfileVector::uniform(10.0))
            .with_profile(2, ProfileVector::uniform(20.0));

        let ids: Vec<UserId> = store
            .list_profiles()
            .await
            .unwrap()
            .iter()
            .map(|p| p.user_id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let others = store.list_profiles_excluding(2).await.unwrap();
        assert!(others.iter().all(|p| p.user_id != 2));
    }

    #[tokio::test]
    async fn test_failing_insert() {
        let store = InMemoryStore::new().with_failing_insert(1, 5);
        assert!(store.add_membership(1, 5).await.is_err());
        assert!(!store.is_member(1, 5).unwrap());
    }
}

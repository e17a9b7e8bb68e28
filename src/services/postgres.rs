use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use crate::models::{
    AnsweredOption, Club, ClubId, ClubMembership, Meeting, MembershipInsert, NewClub,
    ProfileVector, UserId, UserProfile, Vibe,
};
use crate::services::store::{MatchStore, StoreError};

/// PostgreSQL-backed `MatchStore`
///
/// Membership uniqueness is enforced by the `club_members (club_id, user_id)`
/// unique constraint and capacity by a `CHECK` on `clubs`. Joins run in a
/// transaction holding the club row lock, so concurrent matching runs cannot
/// duplicate rows, lose increments or overfill a club.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        scores: ProfileVector {
            sociality: row.try_get("sociality_score")?,
            activity: row.try_get("activity_score")?,
            intimacy: row.try_get("intimacy_score")?,
            immersion: row.try_get("immersion_score")?,
            flexibility: row.try_get("flexibility_score")?,
        },
        updated_at: row.try_get("updated_at")?,
    })
}

fn club_from_row(row: &PgRow) -> Result<Club, sqlx::Error> {
    let vibe: Option<String> = row.try_get("vibe")?;

    Ok(Club {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category: row.try_get("category")?,
        vibe: vibe.as_deref().map(Vibe::parse).unwrap_or_default(),
        location: row.try_get("location")?,
        member_count: row.try_get("member_count")?,
        max_members: row.try_get("max_members")?,
        preferred_scores: row.try_get("preferred_scores")?,
    })
}

const PROFILE_COLUMNS: &str = "user_id, sociality_score, activity_score, intimacy_score, \
                               immersion_score, flexibility_score, updated_at";

const CLUB_COLUMNS: &str = "id, name, description, category, vibe, location, member_count, \
                            max_members, preferred_scores";

#[async_trait]
impl MatchStore for PostgresStore {
    async fn get_profile(&self, user_id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let query = format!("SELECT {} FROM user_profiles WHERE user_id = $1", PROFILE_COLUMNS);

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO user_profiles (
                user_id, sociality_score, activity_score, intimacy_score,
                immersion_score, flexibility_score, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                sociality_score = EXCLUDED.sociality_score,
                activity_score = EXCLUDED.activity_score,
                intimacy_score = EXCLUDED.intimacy_score,
                immersion_score = EXCLUDED.immersion_score,
                flexibility_score = EXCLUDED.flexibility_score,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(profile.user_id)
            .bind(profile.scores.sociality)
            .bind(profile.scores.activity)
            .bind(profile.scores.intimacy)
            .bind(profile.scores.immersion)
            .bind(profile.scores.flexibility)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored profile for user {}", profile.user_id);

        Ok(())
    }

    async fn list_answers(&self, user_id: UserId) -> Result<Vec<AnsweredOption>, StoreError> {
        let query = r#"
            SELECT o.weight, o.score
            FROM user_answers a
            JOIN options o ON o.id = a.option_id
            WHERE a.user_id = $1
            ORDER BY a.id
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        let answers = rows
            .iter()
            .map(|row| {
                let weight: Option<String> = row.try_get("weight")?;
                let score: i16 = row.try_get("score")?;
                Ok(AnsweredOption {
                    weight: weight.unwrap_or_default(),
                    score: score.clamp(0, i16::from(u8::MAX)) as u8,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        tracing::debug!("User {} has {} answers", user_id, answers.len());

        Ok(answers)
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, StoreError> {
        let query = format!("SELECT {} FROM user_profiles ORDER BY user_id", PROFILE_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(profile_from_row).collect::<Result<_, _>>()?)
    }

    async fn list_profiles_excluding(&self, user_id: UserId) -> Result<Vec<UserProfile>, StoreError> {
        let query = format!(
            "SELECT {} FROM user_profiles WHERE user_id <> $1 ORDER BY user_id",
            PROFILE_COLUMNS
        );

        let rows = sqlx::query(&query).bind(user_id).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(profile_from_row).collect::<Result<_, _>>()?)
    }

    async fn list_clubs(&self) -> Result<Vec<Club>, StoreError> {
        let query = format!("SELECT {} FROM clubs ORDER BY id", CLUB_COLUMNS);

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(club_from_row).collect::<Result<_, _>>()?)
    }

    async fn create_club(&self, club: &NewClub) -> Result<Club, StoreError> {
        let query = format!(
            r#"
            INSERT INTO clubs (
                name, description, category, vibe, location,
                member_count, max_members, preferred_scores, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 0, $6, $7, NOW(), NOW())
            RETURNING {}
            "#,
            CLUB_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&club.name)
            .bind(&club.description)
            .bind(&club.category)
            .bind(club.vibe.as_str())
            .bind(&club.location)
            .bind(club.max_members)
            .bind(&club.preferred_scores)
            .fetch_one(&self.pool)
            .await?;

        let created = club_from_row(&row)?;

        tracing::info!("Created club {} ({})", created.id, created.name);

        Ok(created)
    }

    async fn list_memberships_for_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<ClubMembership>, StoreError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"
            SELECT club_id, user_id, joined_at
            FROM club_members
            WHERE user_id = ANY($1)
            ORDER BY id
        "#;

        let rows = sqlx::query(query).bind(user_ids).fetch_all(&self.pool).await?;

        let memberships = rows
            .iter()
            .map(|row| {
                Ok(ClubMembership {
                    club_id: row.try_get("club_id")?,
                    user_id: row.try_get("user_id")?,
                    joined_at: row.try_get("joined_at")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(memberships)
    }

    /// Capacity check, insert and count bump in one transaction
    ///
    /// The club row is locked with `FOR UPDATE`, so concurrent joins to the same
    /// club serialize on it. The `(club_id, user_id)` unique constraint backs the
    /// insert with `ON CONFLICT DO NOTHING`.
    async fn add_membership(
        &self,
        club_id: ClubId,
        user_id: UserId,
    ) -> Result<MembershipInsert, StoreError> {
        let mut tx = self.pool.begin().await?;

        let club = sqlx::query("SELECT member_count, max_members FROM clubs WHERE id = $1 FOR UPDATE")
            .bind(club_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("club {}", club_id)))?;

        let member_count: i32 = club.try_get("member_count")?;
        let max_members: i32 = club.try_get("max_members")?;

        let existing = sqlx::query("SELECT 1 FROM club_members WHERE club_id = $1 AND user_id = $2")
            .bind(club_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if existing.is_some() {
            tx.rollback().await?;
            return Ok(MembershipInsert::AlreadyMember);
        }

        if max_members > 0 && member_count >= max_members {
            tx.rollback().await?;
            tracing::debug!("Club {} is full ({}/{})", club_id, member_count, max_members);
            return Ok(MembershipInsert::ClubFull);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO club_members (club_id, user_id, joined_at, created_at)
            VALUES ($1, $2, NOW(), NOW())
            ON CONFLICT (club_id, user_id) DO NOTHING
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(MembershipInsert::AlreadyMember);
        }

        sqlx::query(
            r#"
            UPDATE clubs
            SET member_count = member_count + 1,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Added user {} to club {}", user_id, club_id);

        Ok(MembershipInsert::Inserted)
    }

    async fn list_meetings(&self) -> Result<Vec<Meeting>, StoreError> {
        let query = r#"
            SELECT id, title, club_id, location, scheduled_at, max_members
            FROM meetings
            ORDER BY id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let meetings = rows
            .iter()
            .map(|row| {
                Ok(Meeting {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    club_id: row.try_get("club_id")?,
                    location: row.try_get("location")?,
                    scheduled_at: row.try_get("scheduled_at")?,
                    max_members: row.try_get("max_members")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(meetings)
    }

    async fn count_memberships(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM club_members")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("total")?)
    }

    async fn count_active_clubs(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM clubs WHERE member_count > 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("total")?)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

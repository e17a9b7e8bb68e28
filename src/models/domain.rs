use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ClubId = i64;
pub type MeetingId = i64;

/// One of the five personality axes a survey option can be weighted towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Sociality,
    Activity,
    Intimacy,
    Immersion,
    Flexibility,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Sociality,
        Axis::Activity,
        Axis::Intimacy,
        Axis::Immersion,
        Axis::Flexibility,
    ];

    /// Parse the weight recorded on a survey option.
    ///
    /// Returns `None` for empty or unknown weights; such answers contribute to no axis.
    pub fn from_weight(weight: &str) -> Option<Self> {
        match weight.trim().to_ascii_lowercase().as_str() {
            "sociality" => Some(Axis::Sociality),
            "activity" => Some(Axis::Activity),
            "intimacy" => Some(Axis::Intimacy),
            "immersion" => Some(Axis::Immersion),
            "flexibility" => Some(Axis::Flexibility),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::Sociality => "sociality",
            Axis::Activity => "activity",
            Axis::Intimacy => "intimacy",
            Axis::Immersion => "immersion",
            Axis::Flexibility => "flexibility",
        }
    }
}

/// Five-axis personality scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileVector {
    #[serde(rename = "sociality_score")]
    pub sociality: f64,
    #[serde(rename = "activity_score")]
    pub activity: f64,
    #[serde(rename = "intimacy_score")]
    pub intimacy: f64,
    #[serde(rename = "immersion_score")]
    pub immersion: f64,
    #[serde(rename = "flexibility_score")]
    pub flexibility: f64,
}

impl ProfileVector {
    pub fn new(sociality: f64, activity: f64, intimacy: f64, immersion: f64, flexibility: f64) -> Self {
        Self {
            sociality,
            activity,
            intimacy,
            immersion,
            flexibility,
        }
    }

    /// Vector with the same score on every axis
    pub fn uniform(score: f64) -> Self {
        Self::new(score, score, score, score, score)
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Sociality => self.sociality,
            Axis::Activity => self.activity,
            Axis::Intimacy => self.intimacy,
            Axis::Immersion => self.immersion,
            Axis::Flexibility => self.flexibility,
        }
    }

    pub fn set(&mut self, axis: Axis, score: f64) {
        match axis {
            Axis::Sociality => self.sociality = score,
            Axis::Activity => self.activity = score,
            Axis::Intimacy => self.intimacy = score,
            Axis::Immersion => self.immersion = score,
            Axis::Flexibility => self.flexibility = score,
        }
    }

    /// Scores in `Axis::ALL` order
    pub fn to_array(&self) -> [f64; 5] {
        [
            self.sociality,
            self.activity,
            self.intimacy,
            self.immersion,
            self.flexibility,
        ]
    }

    /// Axis-wise arithmetic mean. Returns `None` for an empty input.
    pub fn mean<'a, I>(vectors: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ProfileVector>,
    {
        let mut sum = [0.0_f64; 5];
        let mut count = 0usize;

        for vector in vectors {
            for (total, score) in sum.iter_mut().zip(vector.to_array()) {
                *total += score;
            }
            count += 1;
        }

        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self::new(sum[0] / n, sum[1] / n, sum[2] / n, sum[3] / n, sum[4] / n))
    }
}

/// Persisted profile: a user's latest computed vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    #[serde(flatten)]
    pub scores: ProfileVector,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserProfile {
    pub fn new(user_id: UserId, scores: ProfileVector) -> Self {
        Self {
            user_id,
            scores,
            updated_at: None,
        }
    }
}

/// A survey option a user selected: the axis weight it carries and its 1-5 score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredOption {
    pub weight: String,
    pub score: u8,
}

impl AnsweredOption {
    pub fn new(weight: impl Into<String>, score: u8) -> Self {
        Self {
            weight: weight.into(),
            score,
        }
    }
}

/// Similarity of one user to a reference profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserSimilarity {
    pub user_id: UserId,
    pub similarity: f64,
}

/// Atmosphere tag on a club, used to weight group/club match scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    Energetic,
    Cozy,
    Deep,
    Casual,
    Chill,
    #[default]
    #[serde(other)]
    Other,
}

impl Vibe {
    /// Lossy parse: anything unrecognised is `Other`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "energetic" => Vibe::Energetic,
            "cozy" => Vibe::Cozy,
            "deep" => Vibe::Deep,
            "casual" => Vibe::Casual,
            "chill" => Vibe::Chill,
            _ => Vibe::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Energetic => "energetic",
            Vibe::Cozy => "cozy",
            Vibe::Deep => "deep",
            Vibe::Casual => "casual",
            Vibe::Chill => "chill",
            Vibe::Other => "other",
        }
    }
}

/// Capacity-bounded club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub vibe: Vibe,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub member_count: i32,
    /// 0 means unbounded
    #[serde(default)]
    pub max_members: i32,
    #[serde(default)]
    pub preferred_scores: Option<String>,
}

impl Club {
    /// Whether `additional` new members fit without exceeding a positive capacity
    pub fn can_fit(&self, additional: usize) -> bool {
        if self.max_members <= 0 {
            return true;
        }
        i64::from(self.member_count) + additional as i64 <= i64::from(self.max_members)
    }
}

/// Fields needed to create a club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClub {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub vibe: Vibe,
    pub location: Option<String>,
    pub max_members: i32,
    pub preferred_scores: Option<String>,
}

/// Membership of a user in a club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubMembership {
    pub club_id: ClubId,
    pub user_id: UserId,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// Result of an atomic, capacity-checked insert-if-absent on a membership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipInsert {
    /// Row inserted and the club's `member_count` bumped by one
    Inserted,
    AlreadyMember,
    /// The club had no room; nothing was written
    ClubFull,
}

/// Scheduled meeting, optionally hosted by a club
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    #[serde(default)]
    pub club_id: Option<ClubId>,
    #[serde(default)]
    pub location: Option<String>,
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub max_members: i32,
}

/// Ephemeral cluster produced by a single grouping pass
#[derive(Debug, Clone, PartialEq)]
pub struct UserGroup {
    pub members: Vec<UserId>,
    pub mean: ProfileVector,
}

impl UserGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Matching policy constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Minimum similarity (0-100) for two users to count as similar
    pub similarity_threshold: f64,
    /// Social-graph recommendations below this many clubs get topped up
    pub top_up_threshold: usize,
    /// How many similar users feed social-graph recommendations and group matching
    pub similar_user_pool: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: 70.0,
            top_up_threshold: 5,
            similar_user_pool: 20,
        }
    }
}

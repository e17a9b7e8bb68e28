// Core algorithm exports
pub mod analysis;
pub mod grouping;
pub mod matcher;
pub mod recommend;
pub mod scoring;
pub mod similarity;

pub use analysis::{profile_type, tendencies, tendency_level, traits};
pub use grouping::{find_best_club, group_similar_users, vibe_match_score};
pub use matcher::Matcher;
pub use recommend::{merge_unique, rank_by_member_overlap, rank_by_preference, rank_meetings};
pub use scoring::calculate_scores;
pub use similarity::{euclidean_distance, rank_similar, similarity};

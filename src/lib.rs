//! Ongi Match - personality-based club and meeting matching
//!
//! Turns survey answers into five-axis personality profiles, finds similar users,
//! recommends clubs and meetings, clusters users into groups for club assignment,
//! and auto-joins users to clubs.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::Matcher;
pub use error::MatchError;
pub use models::{Club, MatchPolicy, ProfileVector, UserProfile};
pub use services::{InMemoryStore, MatchStore, PostgresStore, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = ProfileVector::uniform(40.0);
        assert_eq!(crate::core::similarity(&a, &a), 100.0);
        assert_eq!(MatchPolicy::default().similarity_threshold, 70.0);
    }
}

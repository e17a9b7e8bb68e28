use std::collections::HashSet;
use crate::core::similarity::similarity;
use crate::models::{Club, ProfileVector, UserGroup, UserId, UserProfile, Vibe};

/// Greedily cluster profiles around seeds
///
/// Profiles are visited in the given order. Each profile not yet placed seeds a new
/// group, and every later unplaced profile whose similarity to the *seed* is at
/// least `threshold` joins it. Members are only compared with the seed, never
/// with each other, so the result depends on input order.
///
/// Every input user ends up in exactly one group.
pub fn group_similar_users(profiles: &[UserProfile], threshold: f64) -> Vec<UserGroup> {
    let mut placed: HashSet<UserId> = HashSet::with_capacity(profiles.len());
    let mut groups = Vec::new();

    for (i, seed) in profiles.iter().enumerate() {
        if !placed.insert(seed.user_id) {
            continue;
        }

        let mut members = vec![seed];

        for candidate in &profiles[i + 1..] {
            if placed.contains(&candidate.user_id) {
                continue;
            }

            if similarity(&seed.scores, &candidate.scores) >= threshold {
                placed.insert(candidate.user_id);
                members.push(candidate);
            }
        }

        let mean = ProfileVector::mean(members.iter().map(|p| &p.scores)).unwrap_or_default();

        groups.push(UserGroup {
            members: members.iter().map(|p| p.user_id).collect(),
            mean,
        });
    }

    groups
}

/// Score how well a club's vibe suits a group's mean profile
///
/// | vibe      | formula                                                 |
/// |-----------|---------------------------------------------------------|
/// | energetic | 0.3 sociality + 0.4 activity + 0.3 flexibility          |
/// | cozy      | 0.4 intimacy + 0.3 immersion + 0.3 (100 - activity)     |
/// | deep      | 0.5 immersion + 0.3 intimacy + 0.2 flexibility          |
/// | casual    | 0.4 flexibility + 0.3 sociality + 0.3 activity          |
/// | chill     | 0.4 (100 - activity) + 0.3 flexibility + 0.3 intimacy   |
/// | other     | mean of all five axes                                   |
pub fn vibe_match_score(vibe: Vibe, mean: &ProfileVector) -> f64 {
    match vibe {
        Vibe::Energetic => mean.sociality * 0.3 + mean.activity * 0.4 + mean.flexibility * 0.3,
        Vibe::Cozy => mean.intimacy * 0.4 + mean.immersion * 0.3 + (100.0 - mean.activity) * 0.3,
        Vibe::Deep => mean.immersion * 0.5 + mean.intimacy * 0.3 + mean.flexibility * 0.2,
        Vibe::Casual => mean.flexibility * 0.4 + mean.sociality * 0.3 + mean.activity * 0.3,
        Vibe::Chill => (100.0 - mean.activity) * 0.4 + mean.flexibility * 0.3 + mean.intimacy * 0.3,
        Vibe::Other => mean.to_array().iter().sum::<f64>() / 5.0,
    }
}

/// Pick the club that best suits a group
///
/// Clubs without room for the whole group are skipped. The strictly highest vibe
/// score wins, so the first club seen wins ties. Returns the index into `clubs`.
pub fn find_best_club(group: &UserGroup, clubs: &[Club]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, club) in clubs.iter().enumerate() {
        if !club.can_fit(group.len()) {
            continue;
        }

        let score = vibe_match_score(club.vibe, &group.mean);

        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }

    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: UserId, scores: ProfileVector) -> UserProfile {
        UserProfile::new(user_id, scores)
    }

    fn club(id: i64, vibe: Vibe, member_count: i32, max_members: i32) -> Club {
        Club {
            id,
            name: format!("Club {}", id),
            description: None,
            category: None,
            vibe,
            location: None,
            member_count,
            max_members,
            preferred_scores: None,
        }
    }

    fn group(members: Vec<UserId>, mean: ProfileVector) -> UserGroup {
        UserGroup { members, mean }
    }

    #[test]
    fn test_every_user_in_exactly_one_group() {
        let profiles: Vec<UserProfile> = (1..=12)
            .map(|id| profile(id, ProfileVector::uniform((id * 8) as f64)))
            .collect();

        let groups = group_similar_users(&profiles, 70.0);

        let mut seen: Vec<UserId> = groups.iter().flat_map(|g| g.members.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_group_mean_is_axis_average() {
        let profiles = vec![
            profile(1, ProfileVector::new(50.0, 40.0, 60.0, 50.0, 50.0)),
            profile(2, ProfileVector::new(60.0, 50.0, 50.0, 40.0, 60.0)),
        ];

        let groups = group_similar_users(&profiles, 70.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![1, 2]);
        assert_eq!(groups[0].mean, ProfileVector::new(55.0, 45.0, 55.0, 45.0, 55.0));
    }

    #[test]
    fn test_members_only_compared_to_seed() {
        // 2 and 3 are each close to the seed but far from each other on one axis
        let seed = ProfileVector::uniform(50.0);
        let left = ProfileVector::new(20.0, 50.0, 50.0, 50.0, 50.0);
        let right = ProfileVector::new(80.0, 50.0, 50.0, 50.0, 50.0);
        assert!(similarity(&left, &right) < 75.0);

        let profiles = vec![profile(1, seed), profile(2, left), profile(3, right)];
        let groups = group_similar_users(&profiles, 75.0);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].members, vec![1, 2, 3]);
    }

    #[test]
    fn test_dissimilar_users_get_own_groups() {
        let profiles = vec![
            profile(1, ProfileVector::uniform(0.0)),
            profile(2, ProfileVector::uniform(100.0)),
            profile(3, ProfileVector::uniform(2.0)),
        ];

        let groups = group_similar_users(&profiles, 70.0);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec![1, 3]);
        assert_eq!(groups[1].members, vec![2]);
    }

    #[test]
    fn test_vibe_scores_at_midpoint() {
        let mean = ProfileVector::uniform(50.0);
        for vibe in [Vibe::Energetic, Vibe::Cozy, Vibe::Deep, Vibe::Casual, Vibe::Chill, Vibe::Other] {
            assert!((vibe_match_score(vibe, &mean) - 50.0).abs() < 1e-9, "{:?}", vibe);
        }
    }

    #[test]
    fn test_vibe_formulas() {
        let mean = ProfileVector::new(80.0, 20.0, 60.0, 40.0, 10.0);

        let close = |a: f64, b: f64| (a - b).abs() < 1e-9;
        assert!(close(vibe_match_score(Vibe::Energetic, &mean), 24.0 + 8.0 + 3.0));
        assert!(close(vibe_match_score(Vibe::Cozy, &mean), 24.0 + 12.0 + 24.0));
        assert!(close(vibe_match_score(Vibe::Deep, &mean), 20.0 + 18.0 + 2.0));
        assert!(close(vibe_match_score(Vibe::Casual, &mean), 4.0 + 24.0 + 6.0));
        assert!(close(vibe_match_score(Vibe::Chill, &mean), 32.0 + 3.0 + 18.0));
        assert!(close(vibe_match_score(Vibe::Other, &mean), 42.0));
    }

    #[test]
    fn test_best_club_by_vibe() {
        // quiet, intimate group
        let g = group(vec![1, 2], ProfileVector::new(20.0, 10.0, 90.0, 80.0, 30.0));
        let clubs = vec![
            club(1, Vibe::Energetic, 0, 0),
            club(2, Vibe::Cozy, 0, 0),
            club(3, Vibe::Casual, 0, 0),
        ];

        assert_eq!(find_best_club(&g, &clubs), Some(1));
    }

    #[test]
    fn test_best_club_respects_capacity() {
        let g = group(vec![1, 2, 3], ProfileVector::new(20.0, 10.0, 90.0, 80.0, 30.0));
        let clubs = vec![
            club(1, Vibe::Energetic, 0, 0),
            club(2, Vibe::Cozy, 8, 10), // 8 + 3 > 10
        ];

        assert_eq!(find_best_club(&g, &clubs), Some(0));
    }

    #[test]
    fn test_best_club_first_wins_ties() {
        let g = group(vec![1], ProfileVector::uniform(50.0));
        let clubs = vec![club(7, Vibe::Deep, 0, 0), club(8, Vibe::Deep, 0, 0)];

        assert_eq!(find_best_club(&g, &clubs), Some(0));
    }

    #[test]
    fn test_no_eligible_club() {
        let g = group(vec![1, 2], ProfileVector::uniform(50.0));
        let clubs = vec![club(1, Vibe::Cozy, 10, 10)];

        assert_eq!(find_best_club(&g, &clubs), None);
        assert_eq!(find_best_club(&g, &[]), None);
    }
}

use std::collections::{HashMap, HashSet};
use crate::models::{Club, ClubId, ClubMembership, Meeting, ProfileVector};

/// Sociality at or above which a user is steered towards busier clubs
pub const HIGH_SOCIALITY: f64 = 70.0;

/// Activity at or above which a user gets the soonest meetings first
pub const HIGH_ACTIVITY: f64 = 70.0;

/// Rank clubs by size according to the user's sociality
///
/// Highly social users get the busiest clubs first, everyone else the smallest.
/// Clubs of equal size keep their input order.
pub fn rank_by_preference(profile: &ProfileVector, mut clubs: Vec<Club>, limit: usize) -> Vec<Club> {
    if profile.sociality >= HIGH_SOCIALITY {
        clubs.sort_by(|a, b| b.member_count.cmp(&a.member_count));
    } else {
        clubs.sort_by(|a, b| a.member_count.cmp(&b.member_count));
    }

    clubs.truncate(limit);
    clubs
}

/// Rank clubs by how many of the given memberships point at them
///
/// `memberships` are those held by the users similar to the target user. Clubs no
/// similar user belongs to are left out. Equal counts are ordered by club id.
pub fn rank_by_member_overlap(
    clubs: Vec<Club>,
    memberships: &[ClubMembership],
    limit: usize,
) -> Vec<Club> {
    let mut counts: HashMap<ClubId, usize> = HashMap::new();
    for membership in memberships {
        *counts.entry(membership.club_id).or_default() += 1;
    }

    let mut ranked: Vec<(usize, Club)> = clubs
        .into_iter()
        .filter_map(|club| counts.get(&club.id).map(|count| (*count, club)))
        .collect();

    ranked.sort_by(|(count_a, a), (count_b, b)| count_b.cmp(count_a).then_with(|| a.id.cmp(&b.id)));

    ranked.into_iter().take(limit).map(|(_, club)| club).collect()
}

/// Append `extra` to `primary`, skipping clubs already present
pub fn merge_unique(primary: Vec<Club>, extra: Vec<Club>) -> Vec<Club> {
    let mut seen: HashSet<ClubId> = HashSet::with_capacity(primary.len() + extra.len());
    let mut merged = Vec::with_capacity(primary.len() + extra.len());

    for club in primary.into_iter().chain(extra) {
        if seen.insert(club.id) {
            merged.push(club);
        }
    }

    merged
}

/// Rank meetings for a user
///
/// Active users get the soonest meetings first, everyone else the smallest.
pub fn rank_meetings(profile: &ProfileVector, mut meetings: Vec<Meeting>, limit: usize) -> Vec<Meeting> {
    if profile.activity >= HIGH_ACTIVITY {
        meetings.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
    } else {
        meetings.sort_by(|a, b| a.max_members.cmp(&b.max_members));
    }

    meetings.truncate(limit);
    meetings
}

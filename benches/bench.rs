// Criterion benchmarks for Ongi Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ongi_match::core::{find_best_club, group_similar_users, rank_similar, similarity};
use ongi_match::models::{Club, ProfileVector, UserProfile, Vibe};

/// Deterministic spread of profiles across the score space
fn create_profile(id: i64) -> UserProfile {
    let axis = |k: i64| ((id * k) % 101) as f64;
    UserProfile::new(id, ProfileVector::new(axis(7), axis(13), axis(29), axis(41), axis(53)))
}

fn create_clubs(count: i64) -> Vec<Club> {
    let vibes = [Vibe::Energetic, Vibe::Cozy, Vibe::Deep, Vibe::Casual, Vibe::Chill];

    (1..=count)
        .map(|id| Club {
            id,
            name: format!("Club {}", id),
            description: None,
            category: None,
            vibe: vibes[(id as usize) % vibes.len()],
            location: None,
            member_count: (id % 15) as i32,
            max_members: if id % 3 == 0 { 0 } else { 20 },
            preferred_scores: None,
        })
        .collect()
}

fn bench_similarity(c: &mut Criterion) {
    let a = ProfileVector::new(72.0, 40.0, 66.0, 12.5, 90.0);
    let b = ProfileVector::new(30.0, 85.0, 20.0, 55.0, 48.0);

    c.bench_function("similarity", |bench| {
        bench.iter(|| similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_rank_similar(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_similar");

    for user_count in [100, 1000, 10000].iter() {
        let profiles: Vec<UserProfile> = (1..=*user_count).map(create_profile).collect();
        let reference = create_profile(0);

        group.bench_with_input(BenchmarkId::from_parameter(user_count), user_count, |b, _| {
            b.iter(|| rank_similar(black_box(&reference), black_box(&profiles), 70.0, 20));
        });
    }

    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_similar_users");

    for user_count in [100, 500, 2000].iter() {
        let profiles: Vec<UserProfile> = (1..=*user_count).map(create_profile).collect();

        group.bench_with_input(BenchmarkId::from_parameter(user_count), user_count, |b, _| {
            b.iter(|| group_similar_users(black_box(&profiles), 70.0));
        });
    }

    group.finish();
}

fn bench_assignment(c: &mut Criterion) {
    let profiles: Vec<UserProfile> = (1..=500).map(create_profile).collect();
    let groups = group_similar_users(&profiles, 70.0);
    let clubs = create_clubs(200);

    c.bench_function("find_best_club_all_groups", |b| {
        b.iter(|| {
            let assigned: Vec<Option<usize>> = groups
                .iter()
                .map(|g| find_best_club(black_box(g), black_box(&clubs)))
                .collect();
            black_box(assigned)
        });
    });
}

criterion_group!(
    benches,
    bench_similarity,
    bench_rank_similar,
    bench_grouping,
    bench_assignment
);

criterion_main!(benches);

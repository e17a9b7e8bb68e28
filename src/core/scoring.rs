use crate::models::{AnsweredOption, Axis, ProfileVector};

/// Highest score a survey option can carry
pub const MAX_OPTION_SCORE: f64 = 5.0;

/// Reduce a user's answers to a five-axis profile vector
///
/// Answers are grouped by the axis their option is weighted towards. For each axis:
/// score = round1(mean(raw 1-5 scores) / 5 * 100)
///
/// Axes nobody answered towards score 0. Answers with an unknown weight are ignored.
/// Returns `None` when there are no answers at all.
pub fn calculate_scores(answers: &[AnsweredOption]) -> Option<ProfileVector> {
    if answers.is_empty() {
        return None;
    }

    let mut sums = [0u32; 5];
    let mut counts = [0u32; 5];

    for answer in answers {
        if let Some(axis) = Axis::from_weight(&answer.weight) {
            let idx = axis_index(axis);
            sums[idx] += u32::from(answer.score);
            counts[idx] += 1;
        }
    }

    let mut scores = ProfileVector::default();
    for axis in Axis::ALL {
        let idx = axis_index(axis);
        scores.set(axis, scale_average(sums[idx], counts[idx]));
    }

    Some(scores)
}

#[inline]
fn axis_index(axis: Axis) -> usize {
    match axis {
        Axis::Sociality => 0,
        Axis::Activity => 1,
        Axis::Intimacy => 2,
        Axis::Immersion => 3,
        Axis::Flexibility => 4,
    }
}

/// Map the mean of raw option scores onto 0-100 with one decimal
#[inline]
fn scale_average(sum: u32, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }

    let avg = f64::from(sum) / f64::from(count);
    let scaled = (avg / MAX_OPTION_SCORE * 100.0).clamp(0.0, 100.0);

    round_one_decimal(scaled)
}

#[inline]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

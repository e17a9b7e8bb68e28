use crate::models::{Axis, AxisTendency, ProfileType, ProfileVector, TendencyLevel, Trait};

const STRONG: f64 = 70.0;
const NOTABLE: f64 = 60.0;

/// Bucket an axis score into a tendency level
pub fn tendency_level(score: f64) -> TendencyLevel {
    if score >= 80.0 {
        TendencyLevel::VeryHigh
    } else if score >= 60.0 {
        TendencyLevel::High
    } else if score >= 40.0 {
        TendencyLevel::Medium
    } else if score >= 20.0 {
        TendencyLevel::Low
    } else {
        TendencyLevel::VeryLow
    }
}

pub fn tendencies(scores: &ProfileVector) -> Vec<AxisTendency> {
    Axis::ALL
        .iter()
        .map(|axis| {
            let score = scores.get(*axis);
            AxisTendency {
                axis: *axis,
                score,
                level: tendency_level(score),
            }
        })
        .collect()
}

/// Determine the profile archetype; the first matching rule wins
pub fn profile_type(s: &ProfileVector) -> ProfileType {
    if s.sociality >= STRONG && s.activity >= STRONG {
        ProfileType::PassionateSocializer
    } else if s.sociality >= STRONG && s.intimacy >= STRONG {
        ProfileType::WarmSupporter
    } else if s.activity >= STRONG && s.immersion >= STRONG {
        ProfileType::AdventurousExplorer
    } else if s.immersion >= STRONG && s.intimacy >= STRONG {
        ProfileType::DeepSpecialist
    } else if s.flexibility >= STRONG {
        ProfileType::FlexibleAdapter
    } else if s.sociality >= NOTABLE {
        ProfileType::FriendlyExtrovert
    } else if s.immersion >= NOTABLE {
        ProfileType::FocusedImmerser
    } else {
        ProfileType::BalancedHarmonizer
    }
}

/// Two or three descriptive traits for a profile
pub fn traits(s: &ProfileVector) -> Vec<Trait> {
    let mut traits = Vec::with_capacity(3);

    traits.push(if s.flexibility >= NOTABLE {
        Trait::Adaptive
    } else if s.flexibility >= 40.0 {
        Trait::SituationallyPlanned
    } else {
        Trait::Methodical
    });

    traits.push(match (s.sociality >= NOTABLE, s.activity >= NOTABLE) {
        (true, true) => Trait::ActiveAndSocial,
        (true, false) => Trait::PeopleOriented,
        (false, true) => Trait::ChallengeSeeking,
        (false, false) => Trait::CalmFocused,
    });

    match (s.intimacy >= NOTABLE, s.immersion >= NOTABLE) {
        (true, true) => traits.push(Trait::DeepBondsAndFocus),
        (true, false) => traits.push(Trait::CloseKnit),
        (false, true) => traits.push(Trait::ExpertiseDriven),
        (false, false) => {}
    }

    traits
}

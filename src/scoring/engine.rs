use crate::domain::request::{Frequency, Gender};
use crate::scoring::types::{PriorityScore, ScoreInputs};

pub const HIGH_PRIORITY_THRESHOLD: i32 = 70;

fn travel_points(freq: Frequency) -> i32 {
    match freq {
        Frequency::Low => 15,
        Frequency::Medium => 25,
        Frequency::High => 35,
    }
}

fn notice_points(freq: Frequency) -> i32 {
    match freq {
        Frequency::Low => 35,
        Frequency::Medium => 45,
        Frequency::High => 55,
    }
}

/// Weighted-point priority score. The fixed tables bound the result to
/// 51..=100, so no clamping is needed.
pub fn score(inputs: &ScoreInputs) -> PriorityScore {
    let percentage = travel_points(inputs.travel_frequency)
        + notice_points(inputs.short_notice_frequency)
        + if inputs.has_mobility_issue { 5 } else { 0 }
        + if inputs.gender == Gender::Female { 5 } else { 1 };

    PriorityScore {
        percentage,
        is_high_priority: percentage >= HIGH_PRIORITY_THRESHOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(travel: Frequency, notice: Frequency, mobility: bool, gender: Gender) -> ScoreInputs {
        ScoreInputs {
            travel_frequency: travel,
            short_notice_frequency: notice,
            has_mobility_issue: mobility,
            gender,
        }
    }

    #[test]
    fn max_inputs_reach_exactly_100() {
        let s = score(&inputs(Frequency::High, Frequency::High, true, Gender::Female));
        assert_eq!(s.percentage, 100);
        assert!(s.is_high_priority);
    }

    #[test]
    fn high_travel_and_notice_alone_is_high_priority() {
        let s = score(&inputs(Frequency::High, Frequency::High, false, Gender::Male));
        assert_eq!(s.percentage, 91);
        assert!(s.is_high_priority);
    }

    #[test]
    fn low_inputs_stay_below_threshold() {
        let s = score(&inputs(Frequency::Low, Frequency::Low, false, Gender::Female));
        assert_eq!(s.percentage, 55);
        assert!(!s.is_high_priority);
    }

    #[test]
    fn male_baseline_contributes_one_point() {
        let s = score(&inputs(Frequency::Low, Frequency::Low, false, Gender::Male));
        assert_eq!(s.percentage, 51);
    }

    #[test]
    fn threshold_is_inclusive_at_70() {
        let below = score(&inputs(Frequency::Medium, Frequency::Low, true, Gender::Male));
        assert_eq!(below.percentage, 66);
        assert!(!below.is_high_priority);

        let at = score(&inputs(Frequency::Medium, Frequency::Low, true, Gender::Female));
        assert_eq!(at.percentage, 70);
        assert!(at.is_high_priority);
    }
}

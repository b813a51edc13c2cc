use crate::models::{AnswerSet, AssessmentQuestion, RiskProfileBand};

/// Sums the points of the selected option for every question.
///
/// Unanswered questions, answers that match no option, and options with
/// negative or non-finite points all contribute 0. This never fails.
pub fn compute_score(questions: &[AssessmentQuestion], answers: &AnswerSet) -> f64 {
    questions
        .iter()
        .filter_map(|question| {
            let selected = answers.get(&question.id)?;
            question.find_option(selected)
        })
        .map(|option| option.points)
        .filter(|points| points.is_finite() && *points >= 0.0)
        .sum()
}

/// Returns the first band, in list order, whose inclusive range contains `score`.
///
/// Overlapping ranges are not detected: the earliest band wins. Bands without
/// a score range never match. `None` means no profile could be determined.
pub fn resolve_band(bands: &[RiskProfileBand], score: f64) -> Option<&RiskProfileBand> {
    bands.iter().find(|band| {
        band.score_assignment
            .map(|range| range.contains(score))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChoiceOption;

    fn option(value: &str, points: f64) -> ChoiceOption {
        ChoiceOption { value: value.to_string(), label: value.to_uppercase(), points }
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerSet {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn scenario_questions() -> Vec<AssessmentQuestion> {
        vec![
            AssessmentQuestion::new("q1", vec![option("a", 1.0), option("b", 5.0)]),
            AssessmentQuestion::new("q2", vec![option("a", 2.0)]),
        ]
    }

    fn scenario_bands() -> Vec<RiskProfileBand> {
        vec![RiskProfileBand::new("low", 0.0, 5.0), RiskProfileBand::new("high", 6.0, 20.0)]
    }

    #[test]
    fn test_score_sums_selected_points() {
        let score = compute_score(&scenario_questions(), &answers(&[("q1", "b"), ("q2", "a")]));
        assert_eq!(score, 7.0);
    }

    #[test]
    fn test_missing_and_unknown_answers_score_zero() {
        let questions = scenario_questions();
        assert_eq!(compute_score(&questions, &answers(&[])), 0.0);
        assert_eq!(compute_score(&questions, &answers(&[("q1", "zzz"), ("q2", "a")])), 2.0);
        assert_eq!(compute_score(&questions, &answers(&[("unrelated", "a")])), 0.0);
    }

    #[test]
    fn test_unscored_options_are_valid() {
        let questions = vec![AssessmentQuestion::new("q1", vec![option("yes", 0.0), option("no", 0.0)])];
        assert_eq!(compute_score(&questions, &answers(&[("q1", "yes")])), 0.0);
    }

    #[test]
    fn test_negative_and_nan_points_are_ignored() {
        let questions = vec![
            AssessmentQuestion::new("q1", vec![option("a", -4.0)]),
            AssessmentQuestion::new("q2", vec![option("a", f64::NAN)]),
            AssessmentQuestion::new("q3", vec![option("a", 3.0)]),
        ];
        let all = answers(&[("q1", "a"), ("q2", "a"), ("q3", "a")]);
        assert_eq!(compute_score(&questions, &all), 3.0);
    }

    #[test]
    fn test_score_is_order_independent() {
        let mut questions = scenario_questions();
        let chosen = answers(&[("q1", "b"), ("q2", "a")]);
        let forward = compute_score(&questions, &chosen);
        questions.reverse();
        assert_eq!(compute_score(&questions, &chosen), forward);
    }

    #[test]
    fn test_resolve_band_matches_inclusive_range() {
        let bands = scenario_bands();
        assert_eq!(resolve_band(&bands, 7.0).map(|b| b.id.as_str()), Some("high"));
        assert_eq!(resolve_band(&bands, 5.0).map(|b| b.id.as_str()), Some("low"));
        assert_eq!(resolve_band(&bands, 20.0).map(|b| b.id.as_str()), Some("high"));
        assert_eq!(resolve_band(&bands, 0.0).map(|b| b.id.as_str()), Some("low"));
    }

    #[test]
    fn test_resolve_band_returns_none_outside_ranges() {
        let bands = scenario_bands();
        assert!(resolve_band(&bands, -1.0).is_none());
        assert!(resolve_band(&bands, 5.5).is_none());
        assert!(resolve_band(&bands, 21.0).is_none());
        assert!(resolve_band(&[], 3.0).is_none());
    }

    #[test]
    fn test_overlapping_bands_resolve_to_first_in_list() {
        let bands = vec![RiskProfileBand::new("first", 0.0, 10.0), RiskProfileBand::new("second", 5.0, 15.0)];
        assert_eq!(resolve_band(&bands, 7.0).map(|b| b.id.as_str()), Some("first"));
    }

    #[test]
    fn test_band_without_range_never_matches() {
        let mut unranged = RiskProfileBand::new("unranged", 0.0, 0.0);
        unranged.score_assignment = None;
        let bands = vec![unranged, RiskProfileBand::new("ranged", 0.0, 10.0)];
        assert_eq!(resolve_band(&bands, 0.0).map(|b| b.id.as_str()), Some("ranged"));
    }
}

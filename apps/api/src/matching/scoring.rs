//! Score Composer — folds retrieval relevance, skill overlap and experience fit
//! into one 0–100 match score.

use crate::models::matching::MatchResult;

/// Weight of the retrieval score; relevance alone can reach the full scale.
pub const RETRIEVAL_WEIGHT: f64 = 100.0;
/// Bonus for a complete skill overlap, scaled by the match ratio.
pub const SKILL_BONUS: f64 = 20.0;
/// Flat bonus when the candidate meets the experience requirement.
pub const EXPERIENCE_BONUS: f64 = 10.0;

pub const MAX_SCORE: u32 = 100;

/// `round(min(100, retrieval*100 + skill_ratio*20 + (experience ? 10 : 0)))`.
///
/// Inputs are expected in [0, 1]; the result is clamped to [0, 100] regardless.
pub fn compose_score(retrieval_score: f64, skill_match_ratio: f64, experience_match: bool) -> u32 {
    let experience = if experience_match {
        EXPERIENCE_BONUS
    } else {
        0.0
    };
    let raw = retrieval_score * RETRIEVAL_WEIGHT + skill_match_ratio * SKILL_BONUS + experience;
    if !raw.is_finite() {
        return 0;
    }
    raw.clamp(0.0, MAX_SCORE as f64).round() as u32
}

/// Sorts descending by score. Stable, so ties keep grouping order.
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobData;

    fn result(title: &str, score: u32) -> MatchResult {
        MatchResult {
            job: JobData {
                id: None,
                title: title.to_string(),
                description: String::new(),
                parsed_data: Default::default(),
            },
            match_score: score,
            matched_skills: vec![],
            missing_skills: vec![],
            experience_match: true,
        }
    }

    #[test]
    fn test_clamps_at_100() {
        // 90 + 10 + 10 = 110
        assert_eq!(compose_score(0.9, 0.5, true), 100);
        assert_eq!(compose_score(1.0, 1.0, true), 100);
    }

    #[test]
    fn test_rounds_to_nearest() {
        // 41.2 + 6.67 = 47.87
        assert_eq!(compose_score(0.412, 1.0 / 3.0, false), 48);
        assert_eq!(compose_score(0.5, 0.0, false), 50);
    }

    #[test]
    fn test_bonuses_lift_lower_relevance() {
        let skilled = compose_score(0.6, 1.0, true);
        let unskilled = compose_score(0.75, 0.0, false);
        assert!(skilled > unskilled, "{skilled} <= {unskilled}");
    }

    #[test]
    fn test_score_bounded_over_input_grid() {
        for r in 0..=20 {
            for s in 0..=20 {
                for exp in [false, true] {
                    let score = compose_score(r as f64 / 20.0, s as f64 / 20.0, exp);
                    assert!(score <= MAX_SCORE);
                }
            }
        }
        assert_eq!(compose_score(0.0, 0.0, false), 0);
    }

    #[test]
    fn test_non_finite_input_scores_zero() {
        assert_eq!(compose_score(f64::NAN, 0.5, true), 0);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let mut results = vec![
            result("a", 50),
            result("b", 80),
            result("c", 50),
            result("d", 80),
        ];
        rank_results(&mut results);
        let titles: Vec<&str> = results.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
    }
}

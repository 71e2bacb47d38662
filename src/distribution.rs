//! Scenario-aware probability distribution.
//!
//! Converts sorted raw scores into win probabilities that sum to ~100 for
//! the race, following the split carried by the detected scenario, and
//! flags runners whose model probability beats the market-implied one.

use crate::config::ValueBetConfig;
use crate::scenario::RaceScenario;
use crate::types::{Prediction, RunnerRecord};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether the model probability beats the market enough to flag.
///
/// Thresholds: model above 1.2x the implied probability, or more than 5
/// percentage points away from it.
pub fn is_value_bet(probability: f64, odds_ref: Option<f64>, cfg: &ValueBetConfig) -> bool {
    let odds = match odds_ref {
        Some(o) if o > 1.0 => o,
        _ => return false,
    };

    let implied = 100.0 / odds;
    probability > implied * cfg.edge_ratio || (probability - implied).abs() > cfg.edge_points
}

/// Distribute win probabilities over runners sorted descending by score.
///
/// Runners inside the scenario's top group share `top_percentage` (either
/// via fixed per-rank shares or in proportion to score); the rest share
/// `rest_percentage` in proportion to score. A group whose scores sum to
/// zero falls back to an equal split. When the top group covers the whole
/// field, its mass is rescaled to 100 so the race invariant holds.
///
/// Output is sorted by descending probability with 1-based ranks; the
/// scenario itself is attached to the rank-1 entry only.
pub fn distribute(
    sorted: &[(&RunnerRecord, f64)],
    scenario: &RaceScenario,
    cfg: &ValueBetConfig,
) -> Vec<Prediction> {
    let n = sorted.len();
    if n == 0 {
        return Vec::new();
    }

    let top_size = scenario.top_size.min(n);
    let (top, rest) = sorted.split_at(top_size);

    let mut probabilities = Vec::with_capacity(n);

    if let Some(shares) = scenario.fixed_shares() {
        for i in 0..top.len() {
            probabilities.push(shares.get(i).copied().unwrap_or(0.0));
        }
    } else {
        let top_total: f64 = top.iter().map(|(_, score)| score).sum();
        for (_, score) in top {
            if top_total > 0.0 {
                probabilities.push(score / top_total * scenario.top_percentage);
            } else {
                probabilities.push(scenario.top_percentage / top.len() as f64);
            }
        }
    }

    let rest_total: f64 = rest.iter().map(|(_, score)| score).sum();
    for (_, score) in rest {
        if rest_total > 0.0 {
            probabilities.push(score / rest_total * scenario.rest_percentage);
        } else {
            probabilities.push(scenario.rest_percentage / rest.len() as f64);
        }
    }

    // No runners outside the top group: give it the full mass.
    if rest.is_empty() && scenario.top_percentage < 100.0 {
        let factor = 100.0 / scenario.top_percentage;
        for probability in &mut probabilities {
            *probability *= factor;
        }
    }

    let mut predictions: Vec<Prediction> = sorted
        .iter()
        .zip(probabilities)
        .enumerate()
        .map(|(i, ((record, score), probability))| {
            let probability = round2(probability);
            Prediction {
                horse_id: record.horse_id.clone(),
                horse_name: record.horse_name.clone(),
                probability,
                raw_score: *score,
                odds_ref: record.odds_ref,
                value_bet: is_value_bet(probability, record.odds_ref, cfg),
                rank: 0,
                in_top_group: i < top_size,
                race_scenario: None,
            }
        })
        .collect();

    predictions.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());

    for (i, prediction) in predictions.iter_mut().enumerate() {
        prediction.rank = i + 1;
    }

    if let Some(first) = predictions.first_mut() {
        first.race_scenario = Some(scenario.clone());
    }

    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;
    use crate::scenario::detect_scenario;
    use chrono::NaiveDate;

    fn record(id: &str, odds: Option<f64>) -> RunnerRecord {
        RunnerRecord {
            horse_id: id.to_string(),
            horse_name: format!("Horse {id}"),
            race_id: "R1".to_string(),
            jockey_id: None,
            trainer_id: None,
            finish_rank: None,
            weight_g: None,
            draw: None,
            raw_musique: None,
            odds_ref: odds,
            race_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        }
    }

    fn run(scores: &[f64]) -> Vec<Prediction> {
        let records: Vec<RunnerRecord> = (0..scores.len())
            .map(|i| record(&format!("H{i}"), None))
            .collect();
        let sorted: Vec<(&RunnerRecord, f64)> =
            records.iter().zip(scores.iter().copied()).collect();
        let scenario = detect_scenario(scores, &ScenarioConfig::default());
        distribute(&sorted, &scenario, &ValueBetConfig::default())
    }

    #[test]
    fn test_dominant_favorite_gets_exactly_50() {
        let predictions = run(&[80.0, 60.0, 55.0, 50.0, 45.0]);
        assert_eq!(predictions[0].probability, 50.0);
        assert_eq!(predictions[1].probability, 18.0);
        assert_eq!(predictions[2].probability, 12.0);
    }

    #[test]
    fn test_probabilities_sum_to_100() {
        for scores in [
            vec![80.0, 60.0, 55.0, 50.0, 45.0],
            vec![60.0, 58.0, 56.0, 40.0, 30.0, 20.0],
            vec![70.0, 62.0, 55.0, 48.0],
            vec![50.0, 48.0],
            vec![42.0],
        ] {
            let predictions = run(&scores);
            let sum: f64 = predictions.iter().map(|p| p.probability).sum();
            assert!(
                (sum - 100.0).abs() < 1.0,
                "sum {sum} for field of {}",
                scores.len()
            );
        }
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let predictions = run(&[60.0, 58.0, 56.0, 40.0, 30.0]);
        for pair in predictions.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        let ranks: Vec<usize> = predictions.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_scenario_attached_to_rank_1_only() {
        let predictions = run(&[80.0, 60.0, 55.0, 50.0, 45.0]);
        assert!(predictions[0].race_scenario.is_some());
        assert!(predictions[1..].iter().all(|p| p.race_scenario.is_none()));
    }

    #[test]
    fn test_top_group_membership_flag() {
        let predictions = run(&[80.0, 60.0, 55.0, 50.0, 45.0]);
        assert!(predictions[0].in_top_group);
        assert!(predictions[2].in_top_group);
        assert!(!predictions[3].in_top_group);
    }

    #[test]
    fn test_proportional_split_within_top_group() {
        // StandardTop3: 70% split proportionally over the top three.
        let predictions = run(&[70.0, 62.0, 55.0, 48.0, 40.0, 30.0]);
        let top_sum: f64 = predictions
            .iter()
            .filter(|p| p.in_top_group)
            .map(|p| p.probability)
            .sum();
        assert!((top_sum - 70.0).abs() < 0.1);
        let expected = 70.0 / (70.0 + 62.0 + 55.0) * 70.0;
        assert!((predictions[0].probability - round2(expected)).abs() < 1e-9);
    }

    #[test]
    fn test_small_field_rest_runner_can_outrank_top_group() {
        // With only one runner outside the top three, the whole 30% rest
        // mass lands on it; the output order reflects probability, not raw
        // score.
        let predictions = run(&[70.0, 62.0, 55.0, 48.0]);
        assert_eq!(predictions[0].rank, 1);
        assert!(!predictions[0].in_top_group);
        assert_eq!(predictions[0].probability, 30.0);
        assert!(predictions[0].race_scenario.is_some());
    }

    #[test]
    fn test_whole_field_in_top_group_rescales_to_100() {
        // Three grouped runners, nobody outside the top group.
        let predictions = run(&[60.0, 58.0, 56.0]);
        let sum: f64 = predictions.iter().map(|p| p.probability).sum();
        assert!((sum - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_single_runner_gets_everything() {
        let predictions = run(&[42.0]);
        assert_eq!(predictions.len(), 1);
        assert!((predictions[0].probability - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_zero_scores_fall_back_to_equal_split() {
        let records: Vec<RunnerRecord> =
            (0..4).map(|i| record(&format!("H{i}"), None)).collect();
        let sorted: Vec<(&RunnerRecord, f64)> =
            records.iter().map(|r| (r, 0.0)).collect();
        let scenario = detect_scenario(&[0.0; 4], &ScenarioConfig::default());
        let predictions = distribute(&sorted, &scenario, &ValueBetConfig::default());
        let sum: f64 = predictions.iter().map(|p| p.probability).sum();
        assert!((sum - 100.0).abs() < 0.1);
    }

    #[test]
    fn test_value_bet_flag_ratio_edge() {
        let cfg = ValueBetConfig::default();
        // Implied 20%, model 25%: ratio edge (25 > 24) triggers.
        assert!(is_value_bet(25.0, Some(5.0), &cfg));
        // Implied 50%, model 52%: neither threshold met.
        assert!(!is_value_bet(52.0, Some(2.0), &cfg));
    }

    #[test]
    fn test_value_bet_flag_points_edge() {
        let cfg = ValueBetConfig::default();
        // Implied 50%, model 56%: below 1.2x but more than 5 points apart.
        assert!(is_value_bet(56.0, Some(2.0), &cfg));
    }

    #[test]
    fn test_value_bet_requires_usable_odds() {
        let cfg = ValueBetConfig::default();
        assert!(!is_value_bet(50.0, None, &cfg));
        assert!(!is_value_bet(50.0, Some(1.0), &cfg));
        assert!(!is_value_bet(50.0, Some(0.5), &cfg));
    }
}

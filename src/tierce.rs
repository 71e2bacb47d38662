//! Tiercé combination generation.
//!
//! Joint probabilities use the sequential conditional ("removal") model:
//! P(A 1st, B 2nd, C 3rd) = P(A) x P(B | A placed) x P(C | A, B placed),
//! where each conditional step divides by the probability mass still in
//! play. Ordre enumerates ordered triples; désordre sums the six orderings
//! of each unordered triple, which is exact under the same model.

use crate::config::CombinationConfig;
use crate::types::{Combination, CombinationType, Prediction};

/// All orderings of an unordered triple.
const PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Joint probability of the picked runners finishing in the given order,
/// conditioning each step on the remaining probability mass. Returns 0
/// when the mass is exhausted instead of dividing by zero.
fn sequential_probability(picked: &[f64], total: f64) -> f64 {
    let mut joint = 1.0;
    let mut remaining = total;

    for &p in picked {
        if remaining <= 0.0 {
            return 0.0;
        }
        joint *= p / remaining;
        remaining -= p;
    }

    joint
}

/// Estimated market payout odds for a tiercé with the given probability.
///
/// Policy approximation: inverse probability, a pool multiplier, and an
/// assumed house take. Ordre pays more but is harder to hit.
fn estimate_tierce_odds(probability: f64, ordre: bool, cfg: &CombinationConfig) -> f64 {
    if probability <= 0.0 {
        return 0.0;
    }

    let base_odds = 1.0 / probability;
    let (multiplier, take) = if ordre {
        (cfg.tierce_ordre_multiplier, cfg.tierce_ordre_take)
    } else {
        (cfg.tierce_desordre_multiplier, cfg.tierce_desordre_take)
    };

    (base_odds * multiplier * take * 10.0).round() / 10.0
}

/// Generate tiercé ordre combinations over the top of the prediction list.
///
/// Every ordered selection of 3 distinct runners from the configured window
/// is evaluated; results are sorted by probability descending and truncated
/// to `limit`. Fields of fewer than 3 runners yield an empty list.
pub fn generate_tierce_ordre(
    predictions: &[Prediction],
    cfg: &CombinationConfig,
    limit: usize,
) -> Vec<Combination> {
    let window = &predictions[..predictions.len().min(cfg.ordre_window)];
    if window.len() < 3 {
        return Vec::new();
    }

    let total: f64 = window.iter().map(|p| p.probability).sum();
    let mut combinations = Vec::new();

    for i in 0..window.len() {
        for j in 0..window.len() {
            if j == i {
                continue;
            }
            for k in 0..window.len() {
                if k == i || k == j {
                    continue;
                }

                let picked = [
                    window[i].probability,
                    window[j].probability,
                    window[k].probability,
                ];
                let prob = sequential_probability(&picked, total);

                combinations.push(Combination {
                    combination_type: CombinationType::TierceOrdre,
                    horses: vec![
                        window[i].horse_name.clone(),
                        window[j].horse_name.clone(),
                        window[k].horse_name.clone(),
                    ],
                    horse_ids: vec![
                        window[i].horse_id.clone(),
                        window[j].horse_id.clone(),
                        window[k].horse_id.clone(),
                    ],
                    probability: prob * 100.0,
                    estimated_odds: estimate_tierce_odds(prob, true, cfg),
                    base_ranks: vec![i + 1, j + 1, k + 1],
                    expected_value: None,
                });
            }
        }
    }

    combinations.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());
    combinations.truncate(limit);
    combinations
}

/// Generate tiercé désordre combinations over the top of the prediction
/// list.
///
/// The probability of an unordered triple is the exact sum of the six
/// ordered sequential probabilities of its members.
pub fn generate_tierce_desordre(
    predictions: &[Prediction],
    cfg: &CombinationConfig,
    limit: usize,
) -> Vec<Combination> {
    let window = &predictions[..predictions.len().min(cfg.desordre_window)];
    if window.len() < 3 {
        return Vec::new();
    }

    let total: f64 = window.iter().map(|p| p.probability).sum();
    let mut combinations = Vec::new();

    for i in 0..window.len() - 2 {
        for j in (i + 1)..window.len() - 1 {
            for k in (j + 1)..window.len() {
                let picked = [
                    window[i].probability,
                    window[j].probability,
                    window[k].probability,
                ];

                let prob: f64 = PERMUTATIONS
                    .iter()
                    .map(|perm| {
                        let ordered = [picked[perm[0]], picked[perm[1]], picked[perm[2]]];
                        sequential_probability(&ordered, total)
                    })
                    .sum();

                combinations.push(Combination {
                    combination_type: CombinationType::TierceDesordre,
                    horses: vec![
                        window[i].horse_name.clone(),
                        window[j].horse_name.clone(),
                        window[k].horse_name.clone(),
                    ],
                    horse_ids: vec![
                        window[i].horse_id.clone(),
                        window[j].horse_id.clone(),
                        window[k].horse_id.clone(),
                    ],
                    probability: (prob * 100.0).min(100.0),
                    estimated_odds: estimate_tierce_odds(prob, false, cfg),
                    base_ranks: vec![i + 1, j + 1, k + 1],
                    expected_value: None,
                });
            }
        }
    }

    combinations.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());
    combinations.truncate(limit);
    combinations
}

//! Quinté combination generation.
//!
//! The probability of five runners filling the top five in any order is
//! approximated with a single sequential conditional ordering multiplied by
//! 5! = 120, instead of summing all 120 orderings the way the tiercé
//! désordre sums its 6. The approximation is cheap but not exact for
//! skewed probability distributions.

use crate::config::CombinationConfig;
use crate::types::{Combination, CombinationType, Prediction};

/// Orderings of a five-runner subset.
const ORDERINGS: f64 = 120.0;

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

/// Estimated market payout odds for a quinté with the given probability.
///
/// The bonus-pool multiplier and the heavier house take are policy
/// constants, not market data.
fn estimate_quinte_odds(probability: f64, cfg: &CombinationConfig) -> f64 {
    if probability <= 0.0 {
        return 0.0;
    }

    let base_odds = 1.0 / probability;
    (base_odds * cfg.quinte_multiplier * cfg.quinte_take * 10.0).round() / 10.0
}

/// Generate quinté désordre combinations over the top of the prediction
/// list.
///
/// The nested loop bounds keep the search space to a few hundred candidate
/// subsets regardless of field size. Fields of fewer than 5 runners yield
/// an empty list.
pub fn generate_quinte_desordre(
    predictions: &[Prediction],
    cfg: &CombinationConfig,
    limit: usize,
) -> Vec<Combination> {
    let window = &predictions[..predictions.len().min(cfg.quinte_window)];
    let n = window.len();
    if n < 5 {
        return Vec::new();
    }

    let total: f64 = window.iter().map(|p| p.probability).sum();
    let mut combinations = Vec::new();

    for i in 0..(n - 4).min(6) {
        for j in (i + 1)..(n - 3).min(7) {
            for k in (j + 1)..(n - 2).min(8) {
                for l in (k + 1)..(n - 1).min(9) {
                    for m in (l + 1)..n.min(10) {
                        let indices = [i, j, k, l, m];
                        let picked: Vec<f64> =
                            indices.iter().map(|&x| window[x].probability).collect();

                        let prob = sequential_probability(&picked, total) * ORDERINGS;

                        combinations.push(Combination {
                            combination_type: CombinationType::QuinteDesordre,
                            horses: indices
                                .iter()
                                .map(|&x| window[x].horse_name.clone())
                                .collect(),
                            horse_ids: indices
                                .iter()
                                .map(|&x| window[x].horse_id.clone())
                                .collect(),
                            probability: (prob * 100.0).min(100.0),
                            estimated_odds: estimate_quinte_odds(prob, cfg),
                            base_ranks: indices.iter().map(|&x| x + 1).collect(),
                            expected_value: None,
                        });
                    }
                }
            }
        }
    }

    combinations.sort_by(|a, b| b.probability.partial_cmp(&a.probability).unwrap());
    combinations.truncate(limit);
    combinations
}

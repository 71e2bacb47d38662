//! Kelly criterion stake sizing and per-race value-bet analysis.
//!
//! The Kelly criterion formula:
//!     f* = (b*p - q) / b
//!
//! Where:
//!     f* = fraction of bankroll to bet
//!     b = odds - 1 (net odds)
//!     p = probability of winning
//!     q = 1 - p (probability of losing)
//!
//! Full Kelly is aggressive; the engine stakes a configured fraction of it
//! (quarter Kelly by default) for risk control.

use serde::Serialize;

use crate::config::KellyConfig;
use crate::error::{validate_bankroll, EngineError};
use crate::types::Prediction;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Stake recommendation for a single bet.
#[derive(Debug, Clone, Serialize)]
pub struct KellyBet {
    pub is_value: bool,
    /// Fractional Kelly as a percentage of bankroll.
    pub kelly_fraction: f64,
    /// Full Kelly as a percentage of bankroll.
    pub full_kelly: f64,
    /// Recommended stake in currency units (at least 1 for value bets).
    pub recommended_stake: f64,
    /// Expected profit per unit staked: b*p - q.
    pub edge: f64,
    /// Edge as a percentage.
    pub expected_value: f64,
    /// Expected ROI per bet, guarded against near-zero fractions.
    pub roi_per_bet: f64,
    /// Market-implied win probability (100 / odds), when odds are usable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implied_probability: Option<f64>,
    /// Model probability minus implied, in percentage points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_edge: Option<f64>,
}

impl KellyBet {
    fn no_value() -> Self {
        Self {
            is_value: false,
            kelly_fraction: 0.0,
            full_kelly: 0.0,
            recommended_stake: 0.0,
            edge: 0.0,
            expected_value: 0.0,
            roi_per_bet: 0.0,
            implied_probability: None,
            probability_edge: None,
        }
    }
}

/// Size a bet with fractional Kelly.
///
/// Missing odds, odds at or below 1.0, or a probability outside (0, 100]
/// make the bet unplayable: zero stake, no value. A Kelly fraction at or
/// below the configured floor is likewise not a value bet, but its edge and
/// expected value are still reported for transparency.
pub fn calculate_kelly_bet(
    probability: f64,
    odds_ref: Option<f64>,
    bankroll: f64,
    cfg: &KellyConfig,
) -> KellyBet {
    let odds = match odds_ref {
        Some(o) if o > 1.0 => o,
        _ => return KellyBet::no_value(),
    };
    if probability <= 0.0 || probability > 100.0 {
        return KellyBet::no_value();
    }

    let p = probability / 100.0;
    let q = 1.0 - p;
    let b = odds - 1.0;

    let kelly = (b * p - q) / b;
    let edge = b * p - q;
    let implied = 100.0 / odds;

    if kelly <= cfg.min_fraction {
        return KellyBet {
            is_value: false,
            kelly_fraction: 0.0,
            full_kelly: 0.0,
            recommended_stake: 0.0,
            edge: round4(edge),
            expected_value: round2(edge * 100.0),
            roi_per_bet: 0.0,
            implied_probability: Some(round2(implied)),
            probability_edge: Some(round2(probability - implied)),
        };
    }

    let fractional = kelly * cfg.fraction;
    let stake = round2(bankroll * fractional).max(cfg.min_stake);

    KellyBet {
        is_value: true,
        kelly_fraction: round2(fractional * 100.0),
        full_kelly: round2(kelly * 100.0),
        recommended_stake: stake,
        edge: round4(edge),
        expected_value: round2(edge * 100.0),
        roi_per_bet: round2(edge / fractional.max(0.001) * 100.0),
        implied_probability: Some(round2(implied)),
        probability_edge: Some(round2(probability - implied)),
    }
}

/// One value bet found in a race.
#[derive(Debug, Clone, Serialize)]
pub struct ValueBetEntry {
    pub horse_id: String,
    pub horse_name: String,
    pub probability: f64,
    pub odds: f64,
    pub kelly: KellyBet,
}

/// Value-bet sweep over a race's predictions.
#[derive(Debug, Clone, Serialize)]
pub struct RaceValueBets {
    /// Sorted by expected value descending.
    pub value_bets: Vec<ValueBetEntry>,
    pub count: usize,
    pub total_stake: f64,
    /// Total stake as a percentage of bankroll.
    pub bankroll_usage: f64,
    pub total_expected_value: f64,
}

/// Run the Kelly sizer over every prediction of a race and keep the value
/// bets.
pub fn analyze_race_value_bets(
    predictions: &[Prediction],
    bankroll: f64,
    cfg: &KellyConfig,
) -> Result<RaceValueBets, EngineError> {
    validate_bankroll(bankroll)?;

    let mut value_bets = Vec::new();
    let mut total_stake = 0.0;

    for prediction in predictions {
        let kelly = calculate_kelly_bet(prediction.probability, prediction.odds_ref, bankroll, cfg);

        if kelly.is_value {
            total_stake += kelly.recommended_stake;
            value_bets.push(ValueBetEntry {
                horse_id: prediction.horse_id.clone(),
                horse_name: prediction.horse_name.clone(),
                probability: prediction.probability,
                odds: prediction.odds_ref.unwrap_or(0.0),
                kelly,
            });
        }
    }

    value_bets.sort_by(|a, b| {
        b.kelly
            .expected_value
            .partial_cmp(&a.kelly.expected_value)
            .unwrap()
    });

    let total_expected_value: f64 = value_bets.iter().map(|v| v.kelly.expected_value).sum();

    Ok(RaceValueBets {
        count: value_bets.len(),
        total_stake: round2(total_stake),
        bankroll_usage: round2(total_stake / bankroll * 100.0),
        total_expected_value: round2(total_expected_value),
        value_bets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Prediction;

    fn prediction(id: &str, probability: f64, odds: Option<f64>) -> Prediction {
        Prediction {
            horse_id: id.to_string(),
            horse_name: format!("Horse {id}"),
            probability,
            raw_score: probability,
            odds_ref: odds,
            value_bet: false,
            rank: 0,
            in_top_group: false,
            race_scenario: None,
        }
    }

    #[test]
    fn test_kelly_positive_edge() {
        // 60% at 3.0: f = (2*0.6 - 0.4) / 2 = 0.4
        let bet = calculate_kelly_bet(60.0, Some(3.0), 1000.0, &KellyConfig::default());

        assert!(bet.is_value);
        assert!((bet.full_kelly - 40.0).abs() < 1e-9);
        assert!((bet.kelly_fraction - 10.0).abs() < 1e-9);
        assert!((bet.recommended_stake - 100.0).abs() < 1e-9);
        assert!((bet.edge - 0.8).abs() < 1e-9);
        assert!((bet.expected_value - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_kelly_negative_edge_reports_transparency() {
        // 20% at 2.0: edge = 1*0.2 - 0.8 = -0.6
        let bet = calculate_kelly_bet(20.0, Some(2.0), 1000.0, &KellyConfig::default());

        assert!(!bet.is_value);
        assert_eq!(bet.recommended_stake, 0.0);
        assert!((bet.edge + 0.6).abs() < 1e-9);
        assert!((bet.expected_value + 60.0).abs() < 1e-9);
        assert_eq!(bet.implied_probability, Some(50.0));
        assert_eq!(bet.probability_edge, Some(-30.0));
    }

    #[test]
    fn test_kelly_rejects_unusable_inputs() {
        let cfg = KellyConfig::default();
        assert!(!calculate_kelly_bet(60.0, None, 1000.0, &cfg).is_value);
        assert!(!calculate_kelly_bet(60.0, Some(1.0), 1000.0, &cfg).is_value);
        assert!(!calculate_kelly_bet(60.0, Some(0.8), 1000.0, &cfg).is_value);
        assert!(!calculate_kelly_bet(0.0, Some(3.0), 1000.0, &cfg).is_value);
        assert!(!calculate_kelly_bet(150.0, Some(3.0), 1000.0, &cfg).is_value);
    }

    #[test]
    fn test_kelly_tiny_positive_fraction_floored() {
        // Just above break-even: f is positive but below the floor.
        let bet = calculate_kelly_bet(33.4, Some(3.0), 1000.0, &KellyConfig::default());
        assert!(!bet.is_value);
        assert_eq!(bet.recommended_stake, 0.0);
        assert!(bet.edge > 0.0);
    }

    #[test]
    fn test_kelly_minimum_stake_floor() {
        // Value bet on a tiny bankroll still recommends at least 1 unit.
        let bet = calculate_kelly_bet(60.0, Some(3.0), 5.0, &KellyConfig::default());
        assert!(bet.is_value);
        assert!((bet.recommended_stake - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_kelly_implied_probability() {
        let bet = calculate_kelly_bet(60.0, Some(3.0), 1000.0, &KellyConfig::default());
        assert_eq!(bet.implied_probability, Some(33.33));
        assert_eq!(bet.probability_edge, Some(26.67));
    }

    #[test]
    fn test_analyze_race_keeps_only_value_bets() {
        let predictions = vec![
            prediction("A", 60.0, Some(3.0)),
            prediction("B", 20.0, Some(2.0)),
            prediction("C", 10.0, None),
        ];
        let result =
            analyze_race_value_bets(&predictions, 1000.0, &KellyConfig::default()).unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.value_bets[0].horse_id, "A");
        assert!((result.total_stake - 100.0).abs() < 1e-9);
        assert!((result.bankroll_usage - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_analyze_race_sorted_by_expected_value() {
        let predictions = vec![
            prediction("A", 40.0, Some(3.0)),
            prediction("B", 60.0, Some(3.0)),
        ];
        let result =
            analyze_race_value_bets(&predictions, 1000.0, &KellyConfig::default()).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.value_bets[0].horse_id, "B");
        assert!(
            result.value_bets[0].kelly.expected_value
                >= result.value_bets[1].kelly.expected_value
        );
    }

    #[test]
    fn test_analyze_race_rejects_bad_bankroll() {
        let result = analyze_race_value_bets(&[], 0.0, &KellyConfig::default());
        assert!(matches!(result, Err(EngineError::InvalidBankroll(_))));
    }
}

//! Input and output value objects for the prediction engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::scenario::RaceScenario;

/// One entrant in one race, as supplied by the data-access layer.
///
/// All fields are plain values; the engine performs no I/O to enrich them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerRecord {
    pub horse_id: String,
    pub horse_name: String,
    pub race_id: String,
    #[serde(default)]
    pub jockey_id: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
    /// Final finishing rank, absent pre-race.
    #[serde(default)]
    pub finish_rank: Option<u32>,
    /// Body weight carried, in grams.
    #[serde(default)]
    pub weight_g: Option<u32>,
    /// Starting gate position.
    #[serde(default)]
    pub draw: Option<u32>,
    /// Compact form-history string ("musique"), e.g. `"1p4p(24)2pDa"`.
    #[serde(default)]
    pub raw_musique: Option<String>,
    /// Market decimal odds.
    #[serde(default)]
    pub odds_ref: Option<f64>,
    /// Race date; form-history year buckets are weighted relative to it.
    pub race_date: NaiveDate,
}

/// Win prediction for a single runner.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub horse_id: String,
    pub horse_name: String,
    /// Win probability on the 0-100 scale; a race's predictions sum to ~100.
    pub probability: f64,
    /// Raw probability score in [1,100]; not itself a probability.
    pub raw_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odds_ref: Option<f64>,
    pub value_bet: bool,
    /// 1-based position in descending probability order.
    pub rank: usize,
    /// Whether the runner belongs to the detected scenario's top group.
    pub in_top_group: bool,
    /// Attached to the rank-1 entry only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_scenario: Option<RaceScenario>,
}

/// Multi-runner bet shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CombinationType {
    /// Three runners in exact finishing order.
    TierceOrdre,
    /// Three runners in the top 3 in any order.
    TierceDesordre,
    /// Five runners in the top 5 in any order.
    QuinteDesordre,
}

/// A candidate multi-runner wager.
#[derive(Debug, Clone, Serialize)]
pub struct Combination {
    pub combination_type: CombinationType,
    pub horses: Vec<String>,
    pub horse_ids: Vec<String>,
    /// Joint probability on the 0-100 scale.
    pub probability: f64,
    /// Estimated market payout odds (policy approximation, not market data).
    pub estimated_odds: f64,
    /// 1-based prediction ranks of the picked runners.
    pub base_ranks: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<ExpectedValue>,
}

/// Expected-value breakdown for a combination at a given stake and payout.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectedValue {
    pub stake: f64,
    pub estimated_payout: f64,
    /// Joint probability on the 0-100 scale.
    pub probability: f64,
    pub expected_gain: f64,
    pub expected_loss: f64,
    pub expected_value: f64,
    pub ev_percentage: f64,
    pub is_profitable: bool,
}

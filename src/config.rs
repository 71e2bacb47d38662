//! Configuration for the prediction engine.
//!
//! All policy knobs live here and are passed into the engine explicitly, so
//! alternate tunings can be tested without recompilation. Defaults reproduce
//! the production constants.

use serde::{Deserialize, Serialize};

/// Points awarded per form-history finishing position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormTiers {
    #[serde(default = "default_tier_first")]
    pub first: f64,
    #[serde(default = "default_tier_second")]
    pub second: f64,
    #[serde(default = "default_tier_third")]
    pub third: f64,
    #[serde(default = "default_tier_fourth")]
    pub fourth: f64,
    #[serde(default = "default_tier_fifth")]
    pub fifth: f64,
    /// Unplaced or out of the scored positions.
    #[serde(default = "default_tier_other")]
    pub other: f64,
    /// Disqualified or did not finish.
    #[serde(default = "default_tier_non_finisher")]
    pub non_finisher: f64,
}

fn default_tier_first() -> f64 {
    10.0
}

fn default_tier_second() -> f64 {
    7.0
}

fn default_tier_third() -> f64 {
    5.0
}

fn default_tier_fourth() -> f64 {
    3.0
}

fn default_tier_fifth() -> f64 {
    2.0
}

fn default_tier_other() -> f64 {
    1.0
}

fn default_tier_non_finisher() -> f64 {
    0.0
}

impl Default for FormTiers {
    fn default() -> Self {
        Self {
            first: default_tier_first(),
            second: default_tier_second(),
            third: default_tier_third(),
            fourth: default_tier_fourth(),
            fifth: default_tier_fifth(),
            other: default_tier_other(),
            non_finisher: default_tier_non_finisher(),
        }
    }
}

/// Temporal weights applied to form-history year buckets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyWeights {
    #[serde(default = "default_recency_current")]
    pub current: f64,
    #[serde(default = "default_recency_one_back")]
    pub one_back: f64,
    #[serde(default = "default_recency_two_back")]
    pub two_back: f64,
    #[serde(default = "default_recency_older")]
    pub older: f64,
}

fn default_recency_current() -> f64 {
    1.0
}

fn default_recency_one_back() -> f64 {
    0.5
}

fn default_recency_two_back() -> f64 {
    0.25
}

fn default_recency_older() -> f64 {
    0.1
}

impl Default for RecencyWeights {
    fn default() -> Self {
        Self {
            current: default_recency_current(),
            one_back: default_recency_one_back(),
            two_back: default_recency_two_back(),
            older: default_recency_older(),
        }
    }
}

impl RecencyWeights {
    /// Weight for a year bucket `diff` years behind the race year.
    /// Buckets dated in the future are treated as current.
    pub fn for_years_back(&self, diff: i32) -> f64 {
        match diff {
            d if d <= 0 => self.current,
            1 => self.one_back,
            2 => self.two_back,
            _ => self.older,
        }
    }
}

/// Scoring engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_form_weight")]
    pub form_weight: f64,
    #[serde(default = "default_class_weight")]
    pub class_weight: f64,
    #[serde(default = "default_connections_weight")]
    pub connections_weight: f64,
    #[serde(default = "default_aptitude_weight")]
    pub aptitude_weight: f64,
    /// Sub-score substituted when no information is available.
    #[serde(default = "default_neutral_score")]
    pub neutral_score: f64,
    #[serde(default)]
    pub form_tiers: FormTiers,
    #[serde(default)]
    pub recency: RecencyWeights,
    /// Completed races required for full confidence in the win rate.
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: u32,
    /// Earnings per race that map to one class point.
    #[serde(default = "default_earnings_scale")]
    pub earnings_scale: f64,
    /// Reference carried weight in kilograms.
    #[serde(default = "default_weight_reference_kg")]
    pub weight_reference_kg: f64,
    /// Aptitude points lost per kilogram above the reference.
    #[serde(default = "default_weight_penalty_per_kg")]
    pub weight_penalty_per_kg: f64,
    /// Aptitude points gained per kilogram below the reference.
    #[serde(default = "default_weight_bonus_per_kg")]
    pub weight_bonus_per_kg: f64,
    /// Cap on the under-weight bonus.
    #[serde(default = "default_weight_bonus_cap")]
    pub weight_bonus_cap: f64,
    /// Aptitude points for a favorable or unfavorable draw.
    #[serde(default = "default_draw_adjustment")]
    pub draw_adjustment: f64,
}

fn default_form_weight() -> f64 {
    0.4
}

fn default_class_weight() -> f64 {
    0.25
}

fn default_connections_weight() -> f64 {
    0.25
}

fn default_aptitude_weight() -> f64 {
    0.1
}

fn default_neutral_score() -> f64 {
    5.0
}

fn default_confidence_floor() -> u32 {
    20
}

fn default_earnings_scale() -> f64 {
    5000.0
}

fn default_weight_reference_kg() -> f64 {
    60.0
}

fn default_weight_penalty_per_kg() -> f64 {
    0.5
}

fn default_weight_bonus_per_kg() -> f64 {
    0.25
}

fn default_weight_bonus_cap() -> f64 {
    1.0
}

fn default_draw_adjustment() -> f64 {
    2.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            form_weight: default_form_weight(),
            class_weight: default_class_weight(),
            connections_weight: default_connections_weight(),
            aptitude_weight: default_aptitude_weight(),
            neutral_score: default_neutral_score(),
            form_tiers: FormTiers::default(),
            recency: RecencyWeights::default(),
            confidence_floor: default_confidence_floor(),
            earnings_scale: default_earnings_scale(),
            weight_reference_kg: default_weight_reference_kg(),
            weight_penalty_per_kg: default_weight_penalty_per_kg(),
            weight_bonus_per_kg: default_weight_bonus_per_kg(),
            weight_bonus_cap: default_weight_bonus_cap(),
            draw_adjustment: default_draw_adjustment(),
        }
    }
}

/// Scenario detector gap thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// First gap above this detects a dominant favorite.
    #[serde(default = "default_dominant_gap")]
    pub dominant_gap: f64,
    /// First and second gaps above this detect a clear top two.
    #[serde(default = "default_clear_gap")]
    pub clear_gap: f64,
    /// Gaps at or below this mark grouped front-runners.
    #[serde(default = "default_grouped_gap")]
    pub grouped_gap: f64,
}

fn default_dominant_gap() -> f64 {
    15.0
}

fn default_clear_gap() -> f64 {
    10.0
}

fn default_grouped_gap() -> f64 {
    5.0
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            dominant_gap: default_dominant_gap(),
            clear_gap: default_clear_gap(),
            grouped_gap: default_grouped_gap(),
        }
    }
}

/// Value-bet flagging thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueBetConfig {
    /// Model probability must exceed this multiple of the market-implied one.
    #[serde(default = "default_edge_ratio")]
    pub edge_ratio: f64,
    /// Or differ from it by more than this many percentage points.
    #[serde(default = "default_edge_points")]
    pub edge_points: f64,
}

fn default_edge_ratio() -> f64 {
    1.2
}

fn default_edge_points() -> f64 {
    5.0
}

impl Default for ValueBetConfig {
    fn default() -> Self {
        Self {
            edge_ratio: default_edge_ratio(),
            edge_points: default_edge_points(),
        }
    }
}

/// Kelly stake sizing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyConfig {
    /// Fraction of full Kelly to stake (0.25 = quarter Kelly).
    #[serde(default = "default_kelly_fraction")]
    pub fraction: f64,
    /// Kelly fractions at or below this are not value bets.
    #[serde(default = "default_min_kelly_fraction")]
    pub min_fraction: f64,
    /// Minimum recommended stake in currency units.
    #[serde(default = "default_min_stake")]
    pub min_stake: f64,
}

fn default_kelly_fraction() -> f64 {
    0.25
}

fn default_min_kelly_fraction() -> f64 {
    0.001
}

fn default_min_stake() -> f64 {
    1.0
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            fraction: default_kelly_fraction(),
            min_fraction: default_min_kelly_fraction(),
            min_stake: default_min_stake(),
        }
    }
}

/// Combination generator windows, limits and payout estimation constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinationConfig {
    /// Runners considered for ordered triples.
    #[serde(default = "default_ordre_window")]
    pub ordre_window: usize,
    /// Runners considered for unordered triples.
    #[serde(default = "default_desordre_window")]
    pub desordre_window: usize,
    /// Runners considered for unordered quintuples.
    #[serde(default = "default_quinte_window")]
    pub quinte_window: usize,
    /// Combinations returned per bet type.
    #[serde(default = "default_combination_limit")]
    pub limit: usize,
    #[serde(default = "default_tierce_ordre_multiplier")]
    pub tierce_ordre_multiplier: f64,
    #[serde(default = "default_tierce_ordre_take")]
    pub tierce_ordre_take: f64,
    #[serde(default = "default_tierce_desordre_multiplier")]
    pub tierce_desordre_multiplier: f64,
    #[serde(default = "default_tierce_desordre_take")]
    pub tierce_desordre_take: f64,
    #[serde(default = "default_quinte_multiplier")]
    pub quinte_multiplier: f64,
    #[serde(default = "default_quinte_take")]
    pub quinte_take: f64,
}

fn default_ordre_window() -> usize {
    8
}

fn default_desordre_window() -> usize {
    10
}

fn default_quinte_window() -> usize {
    10
}

fn default_combination_limit() -> usize {
    10
}

fn default_tierce_ordre_multiplier() -> f64 {
    1.3
}

fn default_tierce_ordre_take() -> f64 {
    0.70
}

fn default_tierce_desordre_multiplier() -> f64 {
    1.1
}

fn default_tierce_desordre_take() -> f64 {
    0.75
}

fn default_quinte_multiplier() -> f64 {
    1.5
}

fn default_quinte_take() -> f64 {
    0.70
}

impl Default for CombinationConfig {
    fn default() -> Self {
        Self {
            ordre_window: default_ordre_window(),
            desordre_window: default_desordre_window(),
            quinte_window: default_quinte_window(),
            limit: default_combination_limit(),
            tierce_ordre_multiplier: default_tierce_ordre_multiplier(),
            tierce_ordre_take: default_tierce_ordre_take(),
            tierce_desordre_multiplier: default_tierce_desordre_multiplier(),
            tierce_desordre_take: default_tierce_desordre_take(),
            quinte_multiplier: default_quinte_multiplier(),
            quinte_take: default_quinte_take(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub value_bet: ValueBetConfig,
    #[serde(default)]
    pub kelly: KellyConfig,
    #[serde(default)]
    pub combination: CombinationConfig,
}

impl EngineConfig {
    /// Load configuration from an optional `config` file and environment
    /// variables (`PMU_*`), layered over the defaults.
    ///
    /// The engine itself never reads the environment; this is a convenience
    /// for callers wiring it up at the boundary.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&EngineConfig::default())?)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("PMU")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

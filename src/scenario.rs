//! Race-shape scenario detection.
//!
//! The detector classifies how concentrated predicted ability is among the
//! front-runners by inspecting the gaps between consecutive sorted scores.
//! Each scenario carries the probability split the distributor applies:
//! a top group size, the percentage of probability mass reserved for that
//! group, and the percentage left for the rest of the field. Two scenarios
//! additionally pin fixed per-rank shares.

use serde::{Deserialize, Serialize};

use crate::config::ScenarioConfig;

/// Fixed per-rank shares for a dominant favorite: 50/18/12.
const DOMINANT_SHARES: [f64; 3] = [50.0, 18.0, 12.0];

/// Fixed per-rank shares for a clear top two: 38/32.
const CLEAR_TOP_2_SHARES: [f64; 2] = [38.0, 32.0];

/// Field-concentration classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioKind {
    /// Fewer than 3 runners; no meaningful shape to detect.
    InsufficientData,
    /// One runner more than 15 score points clear of the field.
    DominantFavorite,
    /// Two runners each more than 10 points clear of the next.
    ClearTop2,
    GroupedTop3,
    GroupedTop4,
    GroupedTop5,
    StandardTop3,
}

/// A detected scenario and its probability split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceScenario {
    pub scenario: ScenarioKind,
    pub top_size: usize,
    /// Probability mass (0-100) reserved for the top group.
    pub top_percentage: f64,
    /// Probability mass (0-100) spread over the rest of the field.
    pub rest_percentage: f64,
}

impl RaceScenario {
    fn of(kind: ScenarioKind, field_size: usize) -> Self {
        let (top_size, top_percentage, rest_percentage) = match kind {
            ScenarioKind::InsufficientData => (field_size, 100.0, 0.0),
            ScenarioKind::DominantFavorite => (3, 80.0, 20.0),
            ScenarioKind::ClearTop2 => (2, 70.0, 30.0),
            ScenarioKind::GroupedTop3 => (3, 70.0, 30.0),
            ScenarioKind::GroupedTop4 => (4, 75.0, 25.0),
            ScenarioKind::GroupedTop5 => (5, 80.0, 20.0),
            ScenarioKind::StandardTop3 => (3, 70.0, 30.0),
        };

        Self {
            scenario: kind,
            top_size,
            top_percentage,
            rest_percentage,
        }
    }

    /// Fixed per-rank shares for the top group, when the scenario pins them.
    ///
    /// Scenarios without fixed shares split `top_percentage` over the top
    /// group in proportion to score.
    pub fn fixed_shares(&self) -> Option<&'static [f64]> {
        match self.scenario {
            ScenarioKind::DominantFavorite => Some(&DOMINANT_SHARES),
            ScenarioKind::ClearTop2 => Some(&CLEAR_TOP_2_SHARES),
            _ => None,
        }
    }
}

/// Classify a race from its raw scores, sorted descending.
///
/// Pure and order-sensitive: callers must sort stably so that score ties
/// keep their original input order.
pub fn detect_scenario(sorted_scores: &[f64], cfg: &ScenarioConfig) -> RaceScenario {
    let n = sorted_scores.len();
    if n < 3 {
        return RaceScenario::of(ScenarioKind::InsufficientData, n);
    }

    // Successive gaps between the first six sorted scores.
    let gaps: Vec<f64> = sorted_scores
        .windows(2)
        .take(5)
        .map(|pair| pair[0] - pair[1])
        .collect();

    if gaps[0] > cfg.dominant_gap {
        return RaceScenario::of(ScenarioKind::DominantFavorite, n);
    }

    if gaps[0] > cfg.clear_gap && gaps[1] > cfg.clear_gap {
        return RaceScenario::of(ScenarioKind::ClearTop2, n);
    }

    if gaps[0].max(gaps[1]) <= cfg.grouped_gap {
        let grouped = |i: usize| gaps.get(i).is_some_and(|g| *g <= cfg.grouped_gap);

        let kind = if grouped(2) && grouped(3) {
            ScenarioKind::GroupedTop5
        } else if grouped(2) {
            ScenarioKind::GroupedTop4
        } else {
            ScenarioKind::GroupedTop3
        };
        return RaceScenario::of(kind, n);
    }

    RaceScenario::of(ScenarioKind::StandardTop3, n)
}

//! Race analysis pipeline.
//!
//! Ties the stages together: scoring -> scenario detection -> probability
//! distribution, fanning out to combination generation and Kelly sizing.
//! Every entry point is a pure function of its inputs; the analyzer holds
//! configuration and a stats provider, never per-race state.

use serde::Serialize;

use crate::config::EngineConfig;
use crate::distribution::distribute;
use crate::error::EngineError;
use crate::kelly::{analyze_race_value_bets, RaceValueBets};
use crate::quinte::generate_quinte_desordre;
use crate::scenario::detect_scenario;
use crate::scoring::score_runner;
use crate::stats::StatsProvider;
use crate::tierce::{generate_tierce_desordre, generate_tierce_ordre};
use crate::types::{Combination, Prediction, RunnerRecord};

/// Full output of a race evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RaceAnalysis {
    pub predictions: Vec<Prediction>,
    pub tierce_ordre: Vec<Combination>,
    pub tierce_desordre: Vec<Combination>,
    pub quinte_desordre: Vec<Combination>,
    pub value_bets: RaceValueBets,
}

/// Stateless race analyzer.
///
/// Holds the engine configuration and a read-only stats provider; safe to
/// share across threads and invoke concurrently for independent races.
pub struct RaceAnalyzer<P> {
    config: EngineConfig,
    stats: P,
}

impl<P: StatsProvider> RaceAnalyzer<P> {
    pub fn new(config: EngineConfig, stats: P) -> Self {
        Self { config, stats }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank a race: score every runner, detect the scenario, distribute
    /// probabilities.
    ///
    /// Deterministic for identical inputs; score ties keep input order.
    pub fn predict(&self, runners: &[RunnerRecord]) -> Result<Vec<Prediction>, EngineError> {
        if runners.is_empty() {
            return Err(EngineError::EmptyField);
        }

        let field_size = Some(runners.len() as u32);
        let mut scored: Vec<(&RunnerRecord, f64)> = runners
            .iter()
            .map(|record| {
                (
                    record,
                    score_runner(record, field_size, &self.stats, &self.config.scoring),
                )
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

        let sorted_scores: Vec<f64> = scored.iter().map(|(_, score)| *score).collect();
        let scenario = detect_scenario(&sorted_scores, &self.config.scenario);

        Ok(distribute(&scored, &scenario, &self.config.value_bet))
    }

    /// Full race evaluation: predictions, bet combinations and the Kelly
    /// value-bet sweep.
    ///
    /// Fields too small for a bet type yield empty combination lists, not
    /// errors.
    pub fn analyze(
        &self,
        runners: &[RunnerRecord],
        bankroll: f64,
    ) -> Result<RaceAnalysis, EngineError> {
        let predictions = self.predict(runners)?;

        let combo_cfg = &self.config.combination;
        let limit = combo_cfg.limit;

        let tierce_ordre = generate_tierce_ordre(&predictions, combo_cfg, limit);
        let tierce_desordre = generate_tierce_desordre(&predictions, combo_cfg, limit);
        let quinte_desordre = generate_quinte_desordre(&predictions, combo_cfg, limit);
        let value_bets = analyze_race_value_bets(&predictions, bankroll, &self.config.kelly)?;

        Ok(RaceAnalysis {
            predictions,
            tierce_ordre,
            tierce_desordre,
            quinte_desordre,
            value_bets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioKind;
    use crate::stats::StaticStats;
    use chrono::NaiveDate;

    fn runner(id: &str, musique: &str, draw: u32) -> RunnerRecord {
        RunnerRecord {
            horse_id: id.to_string(),
            horse_name: format!("Horse {id}"),
            race_id: "R1C3".to_string(),
            jockey_id: None,
            trainer_id: None,
            finish_rank: None,
            weight_g: Some(58_000),
            draw: Some(draw),
            raw_musique: Some(musique.to_string()),
            odds_ref: Some(4.0),
            race_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
        }
    }

    fn analyzer() -> RaceAnalyzer<StaticStats> {
        RaceAnalyzer::new(EngineConfig::default(), StaticStats::new())
    }

    fn field(n: usize) -> Vec<RunnerRecord> {
        let musiques = ["1p1p1p", "2p1p3p", "3p2p4p", "4p5p3p", "5p4p6p", "0p6p5p"];
        (0..n)
            .map(|i| {
                runner(
                    &format!("H{i}"),
                    musiques[i % musiques.len()],
                    i as u32 + 1,
                )
            })
            .collect()
    }

    #[test]
    fn test_predict_empty_field_is_an_error() {
        let result = analyzer().predict(&[]);
        assert!(matches!(result, Err(EngineError::EmptyField)));
    }

    #[test]
    fn test_predict_orders_and_sums() {
        let predictions = analyzer().predict(&field(6)).unwrap();

        assert_eq!(predictions.len(), 6);
        let sum: f64 = predictions.iter().map(|p| p.probability).sum();
        assert!((sum - 100.0).abs() < 5.0);
        for pair in predictions.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert!(predictions[0].race_scenario.is_some());
    }

    #[test]
    fn test_predict_is_deterministic() {
        let runners = field(6);
        let a = analyzer().predict(&runners).unwrap();
        let b = analyzer().predict(&runners).unwrap();

        let a_json = serde_json::to_string(&a).unwrap();
        let b_json = serde_json::to_string(&b).unwrap();
        assert_eq!(a_json, b_json);
    }

    #[test]
    fn test_predict_ties_keep_input_order() {
        // Identical runners score identically; stable sorting must keep
        // their input order.
        let mut runners = field(4);
        for r in &mut runners {
            r.raw_musique = Some("2p2p2p".to_string());
            r.draw = Some(5);
        }
        let predictions = analyzer().predict(&runners).unwrap();
        let ids: Vec<&str> = predictions.iter().map(|p| p.horse_id.as_str()).collect();
        assert_eq!(ids, vec!["H0", "H1", "H2", "H3"]);
    }

    #[test]
    fn test_analyze_small_field_skips_combinations() {
        let analysis = analyzer().analyze(&field(2), 1000.0).unwrap();

        let scenario = analysis.predictions[0].race_scenario.as_ref().unwrap();
        assert_eq!(scenario.scenario, ScenarioKind::InsufficientData);
        assert!(analysis.tierce_ordre.is_empty());
        assert!(analysis.tierce_desordre.is_empty());
        assert!(analysis.quinte_desordre.is_empty());
    }

    #[test]
    fn test_analyze_full_field_produces_all_outputs() {
        let analysis = analyzer().analyze(&field(6), 1000.0).unwrap();

        assert!(!analysis.tierce_ordre.is_empty());
        assert!(!analysis.tierce_desordre.is_empty());
        assert!(!analysis.quinte_desordre.is_empty());
        assert!(analysis.tierce_ordre.len() <= 10);
        for combos in [
            &analysis.tierce_ordre,
            &analysis.tierce_desordre,
            &analysis.quinte_desordre,
        ] {
            for pair in combos.windows(2) {
                assert!(pair[0].probability >= pair[1].probability);
            }
        }
    }

    #[test]
    fn test_analyze_rejects_bad_bankroll() {
        let result = analyzer().analyze(&field(6), -10.0);
        assert!(matches!(result, Err(EngineError::InvalidBankroll(_))));
    }

    #[test]
    fn test_analyze_four_runner_field_has_triples_but_no_quinte() {
        let analysis = analyzer().analyze(&field(4), 1000.0).unwrap();
        assert!(!analysis.tierce_ordre.is_empty());
        assert!(analysis.quinte_desordre.is_empty());
    }
}

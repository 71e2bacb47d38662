//! Historical aggregate lookups consumed by the scoring engine.
//!
//! The engine treats these as pure reads; "unknown" is an expected answer
//! and maps to neutral sub-scores, never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Career aggregates for one horse.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HorseStats {
    /// Races started.
    pub starts: u32,
    /// Races with a known finishing rank.
    pub completed: u32,
    pub wins: u32,
    /// Top-3 finishes.
    pub places: u32,
    /// Cumulative earnings in currency units.
    pub total_earnings: f64,
}

impl HorseStats {
    /// Wins per completed race, 0.0 when nothing completed.
    pub fn win_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.wins as f64 / self.completed as f64
    }

    /// Top-3 finishes per completed race, 0.0 when nothing completed.
    pub fn place_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.places as f64 / self.completed as f64
    }

    /// Earnings per started race, 0.0 when no starts.
    pub fn earnings_per_race(&self) -> f64 {
        if self.starts == 0 {
            return 0.0;
        }
        self.total_earnings / self.starts as f64
    }
}

/// Read accessor for historical aggregates and connection synergy rates.
///
/// Rates are fractions in [0,1]. Implementations return `None` for unknown
/// identifiers.
pub trait StatsProvider {
    fn horse_stats(&self, horse_id: &str) -> Option<HorseStats>;

    /// Overall win rate of a jockey across all mounts.
    fn jockey_win_rate(&self, jockey_id: &str) -> Option<f64>;

    /// Win rate of a jockey restricted to races ridden for a given trainer.
    fn synergy_rate(&self, jockey_id: &str, trainer_id: &str) -> Option<f64>;
}

/// In-memory [`StatsProvider`] backed by maps.
///
/// The default instance knows nothing, which makes every runner score
/// neutrally on class and connections.
#[derive(Debug, Clone, Default)]
pub struct StaticStats {
    horses: HashMap<String, HorseStats>,
    jockeys: HashMap<String, f64>,
    synergies: HashMap<(String, String), f64>,
}

impl StaticStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horse(mut self, horse_id: impl Into<String>, stats: HorseStats) -> Self {
        self.horses.insert(horse_id.into(), stats);
        self
    }

    pub fn with_jockey(mut self, jockey_id: impl Into<String>, win_rate: f64) -> Self {
        self.jockeys.insert(jockey_id.into(), win_rate);
        self
    }

    pub fn with_synergy(
        mut self,
        jockey_id: impl Into<String>,
        trainer_id: impl Into<String>,
        rate: f64,
    ) -> Self {
        self.synergies
            .insert((jockey_id.into(), trainer_id.into()), rate);
        self
    }
}

impl StatsProvider for StaticStats {
    fn horse_stats(&self, horse_id: &str) -> Option<HorseStats> {
        self.horses.get(horse_id).copied()
    }

    fn jockey_win_rate(&self, jockey_id: &str) -> Option<f64> {
        self.jockeys.get(jockey_id).copied()
    }

    fn synergy_rate(&self, jockey_id: &str, trainer_id: &str) -> Option<f64> {
        self.synergies
            .get(&(jockey_id.to_string(), trainer_id.to_string()))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_rate_never_divides_by_zero() {
        let stats = HorseStats::default();
        assert_eq!(stats.win_rate(), 0.0);
        assert_eq!(stats.place_rate(), 0.0);
        assert_eq!(stats.earnings_per_race(), 0.0);
    }

    #[test]
    fn test_win_rate() {
        let stats = HorseStats {
            starts: 12,
            completed: 10,
            wins: 3,
            places: 6,
            total_earnings: 60_000.0,
        };
        assert!((stats.win_rate() - 0.3).abs() < 1e-9);
        assert!((stats.place_rate() - 0.6).abs() < 1e-9);
        assert!((stats.earnings_per_race() - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_static_stats_lookup() {
        let provider = StaticStats::new()
            .with_horse(
                "H1",
                HorseStats {
                    starts: 5,
                    completed: 5,
                    wins: 1,
                    places: 2,
                    total_earnings: 10_000.0,
                },
            )
            .with_jockey("J1", 0.18)
            .with_synergy("J1", "T1", 0.25);

        assert!(provider.horse_stats("H1").is_some());
        assert!(provider.horse_stats("H2").is_none());
        assert_eq!(provider.jockey_win_rate("J1"), Some(0.18));
        assert_eq!(provider.jockey_win_rate("J2"), None);
        assert_eq!(provider.synergy_rate("J1", "T1"), Some(0.25));
        assert_eq!(provider.synergy_rate("J1", "T2"), None);
    }
}

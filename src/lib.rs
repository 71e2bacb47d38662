//! PMU prediction engine.
//!
//! This library provides:
//! - Per-runner scoring from form history, class, connections and aptitude
//! - Race-shape scenario detection and scenario-aware win probabilities
//! - Tiercé / quinté combination probabilities with estimated payouts
//! - Kelly criterion stake sizing and value-bet detection
//!
//! The engine is pure and stateless: it consumes in-memory runner records,
//! performs no I/O, and returns plain values for the surrounding layers to
//! persist or serve.
//!
//! # Example
//!
//! ```
//! use pmu_engine::config::KellyConfig;
//! use pmu_engine::kelly::calculate_kelly_bet;
//!
//! // 60% model probability against decimal odds of 3.0.
//! let bet = calculate_kelly_bet(60.0, Some(3.0), 1000.0, &KellyConfig::default());
//! assert!(bet.is_value);
//! assert_eq!(bet.recommended_stake, 100.0);
//! ```

pub mod betting;
pub mod config;
pub mod distribution;
pub mod error;
pub mod kelly;
pub mod musique;
pub mod predictor;
pub mod quinte;
pub mod scenario;
pub mod scoring;
pub mod stats;
pub mod tierce;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::EngineError;
pub use kelly::{KellyBet, RaceValueBets, ValueBetEntry};
pub use predictor::{RaceAnalysis, RaceAnalyzer};
pub use scenario::{RaceScenario, ScenarioKind};
pub use stats::{HorseStats, StaticStats, StatsProvider};
pub use types::{Combination, CombinationType, ExpectedValue, Prediction, RunnerRecord};

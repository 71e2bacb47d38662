//! Engine error types and input validation.

use thiserror::Error;

/// Errors surfaced to callers when a request is unsatisfiable.
///
/// Recoverable conditions (malformed form history, missing jockey or
/// trainer context, degenerate probability masses) never reach this type;
/// they are absorbed by neutral defaults inside the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No runners were supplied for the race.
    #[error("no runners supplied for race")]
    EmptyField,

    /// Probability outside the [0, 100] percentage scale.
    #[error("probability must be within [0, 100], got {0}")]
    InvalidProbability(f64),

    /// Stake must be strictly positive to compute an expected value.
    #[error("stake must be positive, got {0}")]
    InvalidStake(f64),

    /// Bankroll must be strictly positive for stake sizing.
    #[error("bankroll must be positive, got {0}")]
    InvalidBankroll(f64),
}

/// Validate a percentage-scale probability.
pub fn validate_probability(prob: f64) -> Result<(), EngineError> {
    if !(0.0..=100.0).contains(&prob) {
        return Err(EngineError::InvalidProbability(prob));
    }
    Ok(())
}

/// Validate a stake amount.
pub fn validate_stake(stake: f64) -> Result<(), EngineError> {
    if stake <= 0.0 {
        return Err(EngineError::InvalidStake(stake));
    }
    Ok(())
}

/// Validate a bankroll amount.
pub fn validate_bankroll(bankroll: f64) -> Result<(), EngineError> {
    if bankroll <= 0.0 {
        return Err(EngineError::InvalidBankroll(bankroll));
    }
    Ok(())
}

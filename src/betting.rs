//! Expected-value analysis for combinations.

use crate::error::{validate_probability, validate_stake, EngineError};
use crate::types::{Combination, ExpectedValue};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Expected-value breakdown for a combination at a given stake and assumed
/// payout.
///
/// `expected_gain = P x payout x stake`, `expected_loss = (1 - P) x stake`,
/// `EV = gain - loss`. The stake must be positive; a race too small for the
/// bet type never reaches this point because the generators return empty
/// lists instead.
pub fn expected_value(
    combination: &Combination,
    stake: f64,
    estimated_payout: f64,
) -> Result<ExpectedValue, EngineError> {
    validate_stake(stake)?;
    validate_probability(combination.probability)?;

    let prob = combination.probability / 100.0;
    let expected_gain = prob * estimated_payout * stake;
    let expected_loss = (1.0 - prob) * stake;
    let ev = expected_gain - expected_loss;

    Ok(ExpectedValue {
        stake,
        estimated_payout,
        probability: combination.probability,
        expected_gain: round2(expected_gain),
        expected_loss: round2(expected_loss),
        expected_value: round2(ev),
        ev_percentage: round2(ev / stake * 100.0),
        is_profitable: ev > 0.0,
    })
}

/// Attach an expected-value breakdown to a combination.
pub fn with_expected_value(
    mut combination: Combination,
    stake: f64,
    estimated_payout: f64,
) -> Result<Combination, EngineError> {
    let breakdown = expected_value(&combination, stake, estimated_payout)?;
    combination.expected_value = Some(breakdown);
    Ok(combination)
}

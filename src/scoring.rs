//! Scoring engine: one raw probability score per runner.
//!
//! Score = form*0.4 + class*0.25 + connections*0.25 + aptitude*0.1, each
//! sub-score on a 0-10 scale, combined and rescaled to [1,100].
//!
//! Sub-scores that cannot be computed fall back to the neutral default
//! configured in [`ScoringConfig::neutral_score`]. The fallback is applied
//! in one place, [`score_runner`], so a single bad record never aborts
//! scoring for the rest of the field.

use chrono::Datelike;
use thiserror::Error;

use crate::config::ScoringConfig;
use crate::musique::{is_non_finisher, parse_musique, token_rank};
use crate::stats::{HorseStats, StatsProvider};
use crate::types::RunnerRecord;

/// A sub-score that could not be computed from the supplied record.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("carried weight of {0}g is outside the plausible range")]
    ImplausibleWeight(u32),
    #[error("draw position {0} is outside the plausible range")]
    ImplausibleDraw(u32),
}

/// Points for a single form-history token.
fn token_points(token: &str, cfg: &ScoringConfig) -> f64 {
    if is_non_finisher(token) {
        return cfg.form_tiers.non_finisher;
    }
    match token_rank(token) {
        Some(1) => cfg.form_tiers.first,
        Some(2) => cfg.form_tiers.second,
        Some(3) => cfg.form_tiers.third,
        Some(4) => cfg.form_tiers.fourth,
        Some(5) => cfg.form_tiers.fifth,
        _ => cfg.form_tiers.other,
    }
}

/// Form sub-score from the musique, recency-weighted by year bucket.
///
/// An empty history scores neutral: a runner with no past is unknown, not
/// proven bad.
pub fn form_score(raw_musique: Option<&str>, race_year: i32, cfg: &ScoringConfig) -> f64 {
    let raw = match raw_musique {
        Some(m) if !m.trim().is_empty() => m,
        _ => return cfg.neutral_score,
    };

    let buckets = parse_musique(raw, race_year);
    if buckets.is_empty() {
        return cfg.neutral_score;
    }

    let mut score = 0.0;
    let mut total_weight = 0.0;

    for (year, tokens) in &buckets {
        if tokens.is_empty() {
            continue;
        }
        let weight = cfg.recency.for_years_back(race_year - year);
        let year_score: f64 =
            tokens.iter().map(|t| token_points(t, cfg)).sum::<f64>() / tokens.len() as f64;

        score += year_score * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        cfg.neutral_score
    }
}

/// Class sub-score from career aggregates.
///
/// The win-rate contribution is damped by a confidence factor that only
/// reaches 1.0 once the horse has completed [`ScoringConfig::confidence_floor`]
/// races, so one lucky win off a tiny sample cannot dominate. Earnings per
/// race add up to 5 more points.
pub fn class_score(stats: Option<&HorseStats>, cfg: &ScoringConfig) -> f64 {
    let stats = match stats {
        Some(s) if s.completed > 0 => s,
        _ => return cfg.neutral_score,
    };

    let confidence = (stats.completed as f64 / cfg.confidence_floor as f64).min(1.0);
    let win_component = stats.win_rate() * 5.0 * confidence;
    let earnings_component = (stats.earnings_per_race() / cfg.earnings_scale).clamp(0.0, 5.0);

    (win_component + earnings_component).clamp(0.0, 10.0)
}

/// Connections sub-score from jockey and jockey-trainer synergy rates.
///
/// Starts at neutral; each known rate pulls the score half-way toward that
/// rate mapped onto the 0-10 scale. Missing identifiers or unknown lookups
/// leave the baseline untouched.
pub fn connections_score<P: StatsProvider>(
    jockey_id: Option<&str>,
    trainer_id: Option<&str>,
    provider: &P,
    cfg: &ScoringConfig,
) -> f64 {
    let mut score = cfg.neutral_score;

    if let Some(jockey) = jockey_id {
        if let Some(rate) = provider.jockey_win_rate(jockey) {
            let component = (rate * 10.0).clamp(0.0, 10.0);
            score += 0.5 * (component - cfg.neutral_score);
        }

        if let Some(trainer) = trainer_id {
            if let Some(rate) = provider.synergy_rate(jockey, trainer) {
                let component = (rate * 10.0).clamp(0.0, 10.0);
                score += 0.5 * (component - cfg.neutral_score);
            }
        }
    }

    score.clamp(0.0, 10.0)
}

/// Aptitude sub-score from draw position and carried weight.
///
/// The draw bonus uses the runner's percentile of the field when the field
/// size is known, fixed gate bands otherwise. Weight above the reference is
/// penalized proportionally; weight below it earns a smaller, capped bonus.
pub fn aptitude_score(
    draw: Option<u32>,
    field_size: Option<u32>,
    weight_g: Option<u32>,
    cfg: &ScoringConfig,
) -> Result<f64, ScoreError> {
    let mut score = cfg.neutral_score;

    if let Some(draw) = draw {
        if draw == 0 || draw > 40 {
            return Err(ScoreError::ImplausibleDraw(draw));
        }

        match field_size {
            Some(n) if n > 0 => {
                let percentile = draw as f64 / n as f64;
                if percentile <= 0.25 {
                    score += cfg.draw_adjustment;
                } else if percentile >= 0.75 {
                    score -= cfg.draw_adjustment;
                }
            }
            _ => {
                if draw <= 3 {
                    score += cfg.draw_adjustment;
                } else if draw >= 12 {
                    score -= cfg.draw_adjustment;
                }
            }
        }
    }

    if let Some(grams) = weight_g {
        if !(20_000..=150_000).contains(&grams) {
            return Err(ScoreError::ImplausibleWeight(grams));
        }

        let kg = grams as f64 / 1000.0;
        if kg > cfg.weight_reference_kg {
            score -= (kg - cfg.weight_reference_kg) * cfg.weight_penalty_per_kg;
        } else {
            score += ((cfg.weight_reference_kg - kg) * cfg.weight_bonus_per_kg)
                .min(cfg.weight_bonus_cap);
        }
    }

    Ok(score.clamp(0.0, 10.0))
}

/// Combined raw probability score for one runner, clamped to [1,100].
///
/// A sub-score failure substitutes that component's neutral default; the
/// rest of the field is unaffected.
pub fn score_runner<P: StatsProvider>(
    record: &RunnerRecord,
    field_size: Option<u32>,
    provider: &P,
    cfg: &ScoringConfig,
) -> f64 {
    let race_year = record.race_date.year();

    let form = form_score(record.raw_musique.as_deref(), race_year, cfg);
    let stats = provider.horse_stats(&record.horse_id);
    let class = class_score(stats.as_ref(), cfg);
    let connections = connections_score(
        record.jockey_id.as_deref(),
        record.trainer_id.as_deref(),
        provider,
        cfg,
    );
    let aptitude = match aptitude_score(record.draw, field_size, record.weight_g, cfg) {
        Ok(score) => score,
        Err(err) => {
            tracing::warn!(
                horse_id = %record.horse_id,
                race_id = %record.race_id,
                "aptitude score fell back to neutral: {}",
                err
            );
            cfg.neutral_score
        }
    };

    let combined = form * cfg.form_weight
        + class * cfg.class_weight
        + connections * cfg.connections_weight
        + aptitude * cfg.aptitude_weight;

    (combined * 10.0).clamp(1.0, 100.0)
}

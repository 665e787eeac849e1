use std::collections::HashMap;

use crate::fuel_opr::calculate_fuel_opr;
use crate::match_data::MatchRecord;
use crate::samples::{alliance_sample, eligible_matches};

pub const DEFAULT_LAMBDA_CANDIDATES: [f64; 8] =
    [0.001, 0.003, 0.01, 0.03, 0.1, 0.3, 0.75, 1.0];

/// Default holdout: a quarter of the eligible matches, never fewer than two.
const DEFAULT_HOLDOUT_DIVISOR: usize = 4;
const MIN_DEFAULT_HOLDOUT: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct LambdaSweepRow {
    pub lambda: f64,
    pub holdout_rmse: f64,
}

#[derive(Debug, Clone)]
pub struct LambdaSweepResult {
    pub train_match_count: usize,
    pub holdout_match_count: usize,
    pub rows: Vec<LambdaSweepRow>,
    pub best_lambda: Option<f64>,
}

impl LambdaSweepResult {
    fn empty() -> Self {
        Self {
            train_match_count: 0,
            holdout_match_count: 0,
            rows: Vec::new(),
            best_lambda: None,
        }
    }
}

/// Evaluate candidate ridge strengths against a chronological holdout: fit
/// on the earlier matches, score combined-total prediction RMSE on the later
/// ones. The split is never random; later matches are predicted from
/// earlier ones, matching how the estimator is used mid-event.
pub fn sweep_fuel_opr_lambda(
    matches: &[MatchRecord],
    candidates: &[f64],
    include_playoffs: bool,
    holdout_match_count: Option<usize>,
) -> LambdaSweepResult {
    let eligible = eligible_matches(matches, include_playoffs);
    if eligible.len() < 2 || candidates.is_empty() {
        return LambdaSweepResult::empty();
    }

    let requested = holdout_match_count
        .unwrap_or_else(|| (eligible.len() / DEFAULT_HOLDOUT_DIVISOR).max(MIN_DEFAULT_HOLDOUT));
    let holdout = requested.clamp(1, eligible.len() - 1);
    let split = eligible.len() - holdout;
    let train_matches = &eligible[..split];
    let holdout_matches = &eligible[split..];

    let mut rows = Vec::with_capacity(candidates.len());
    let mut best_lambda: Option<f64> = None;
    let mut best_rmse = f64::INFINITY;

    for &lambda in candidates {
        // The chronological split already encodes the caller's intended
        // match population, so the train fit takes every match it is given.
        let fit = calculate_fuel_opr(train_matches, lambda, true);
        let total_by_team: HashMap<u32, f64> = fit
            .teams
            .iter()
            .map(|t| (t.team_number, t.total_fuel_opr))
            .collect();

        let mut squared_error = 0.0_f64;
        let mut observations = 0_usize;
        for m in holdout_matches {
            for alliance in [&m.red, &m.blue] {
                let Some(sample) = alliance_sample(alliance) else {
                    continue;
                };
                let predicted: f64 = sample
                    .teams
                    .iter()
                    .map(|t| total_by_team.get(t).copied().unwrap_or(0.0))
                    .sum();
                let err = sample.total_fuel - predicted;
                squared_error += err * err;
                observations += 1;
            }
        }

        let holdout_rmse = if observations == 0 {
            f64::INFINITY
        } else {
            (squared_error / observations as f64).sqrt()
        };
        rows.push(LambdaSweepRow {
            lambda,
            holdout_rmse,
        });

        // Strict `<`: the first candidate reaching the lowest finite RMSE
        // wins on exact ties.
        if holdout_rmse.is_finite() && holdout_rmse < best_rmse {
            best_rmse = holdout_rmse;
            best_lambda = Some(lambda);
        }
    }

    LambdaSweepResult {
        train_match_count: train_matches.len(),
        holdout_match_count: holdout_matches.len(),
        rows,
        best_lambda,
    }
}

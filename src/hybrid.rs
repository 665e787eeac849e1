use crate::fuel_opr::{FuelOprResult, calculate_fuel_opr};
use crate::lambda_sweep::{DEFAULT_LAMBDA_CANDIDATES, LambdaSweepResult, sweep_fuel_opr_lambda};
use crate::match_data::MatchRecord;
use crate::samples::eligible_matches;

/// Regularization schedule for a progressing event: hold a fixed fallback
/// while data is thin, then periodically re-sweep and ease toward the swept
/// value instead of jumping to it.
#[derive(Debug, Clone)]
pub struct HybridConfig {
    pub fallback_lambda: f64,
    pub min_matches_for_sweep: usize,
    pub update_every_matches: usize,
    /// Fraction of the gap between the current and freshly swept lambda to
    /// adopt at each resweep checkpoint.
    pub smoothing: f64,
    pub min_lambda: f64,
    pub max_lambda: f64,
    pub candidates: Vec<f64>,
    pub include_playoffs: bool,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            fallback_lambda: 0.3,
            min_matches_for_sweep: 7,
            update_every_matches: 3,
            smoothing: 0.35,
            min_lambda: 0.01,
            max_lambda: 0.75,
            candidates: DEFAULT_LAMBDA_CANDIDATES.to_vec(),
            include_playoffs: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LambdaMode {
    Fixed,
    Carry,
    Swept,
}

#[derive(Debug, Clone, Copy)]
pub struct HybridTimelinePoint {
    pub match_count: usize,
    pub lambda: f64,
    pub mode: LambdaMode,
}

#[derive(Debug, Clone)]
pub struct FuelOprHybridResult {
    pub opr: FuelOprResult,
    pub selected_lambda: f64,
    pub mode: LambdaMode,
    pub timeline: Vec<HybridTimelinePoint>,
    pub latest_sweep: Option<LambdaSweepResult>,
}

/// Replay match counts `1..N` over the eligible matches, evolving a single
/// lambda through the fixed / swept / carry regimes, then solve once over
/// the full match list at the final value.
///
/// Stateless across invocations: callers re-invoke with the accumulated
/// match history as new results arrive, and the whole timeline is replayed.
pub fn calculate_fuel_opr_hybrid(
    matches: &[MatchRecord],
    cfg: &HybridConfig,
) -> FuelOprHybridResult {
    let eligible = eligible_matches(matches, cfg.include_playoffs);
    let update_every = cfg.update_every_matches.max(1);

    let mut current = cfg.fallback_lambda.clamp(cfg.min_lambda, cfg.max_lambda);
    let mut timeline = Vec::with_capacity(eligible.len());
    let mut latest_sweep: Option<LambdaSweepResult> = None;

    for count in 1..=eligible.len() {
        let mode = if count < cfg.min_matches_for_sweep || cfg.candidates.is_empty() {
            LambdaMode::Fixed
        } else if (count - cfg.min_matches_for_sweep) % update_every == 0 {
            // Prefix matches are already filtered and ordered, so the sweep
            // sees its full population.
            let sweep = sweep_fuel_opr_lambda(&eligible[..count], &cfg.candidates, true, None);
            let adopted = sweep.best_lambda;
            latest_sweep = Some(sweep);
            if let Some(best) = adopted {
                current = (current * (1.0 - cfg.smoothing) + best * cfg.smoothing)
                    .clamp(cfg.min_lambda, cfg.max_lambda);
                LambdaMode::Swept
            } else {
                LambdaMode::Carry
            }
        } else {
            LambdaMode::Carry
        };
        timeline.push(HybridTimelinePoint {
            match_count: count,
            lambda: current,
            mode,
        });
    }

    let opr = calculate_fuel_opr(matches, current, cfg.include_playoffs);
    let mode = timeline.last().map(|p| p.mode).unwrap_or(LambdaMode::Fixed);

    FuelOprHybridResult {
        opr,
        selected_lambda: current,
        mode,
        timeline,
        latest_sweep,
    }
}

use std::collections::HashMap;

use crate::match_data::MatchRecord;
use crate::samples::{SampleSet, extract_alliance_samples};

pub const DEFAULT_RIDGE_LAMBDA: f64 = 0.75;

/// Pivots below this magnitude abort the elimination; the affected target
/// degrades to an all-zero coefficient vector instead of raising an error.
const PIVOT_EPSILON: f64 = 1e-12;

/// Solved per-team scoring-rate estimates for the three targets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelOprTeamResult {
    pub team_number: u32,
    pub matches_played: usize,
    pub auto_fuel_opr: f64,
    pub teleop_fuel_opr: f64,
    pub total_fuel_opr: f64,
}

/// Residuals (observed − predicted alliance sum) for one retained sample.
#[derive(Debug, Clone, Copy)]
pub struct FuelOprFitSample {
    pub teams: [u32; 3],
    pub observed_total: f64,
    pub predicted_total: f64,
    pub auto_residual: f64,
    pub teleop_residual: f64,
    pub total_residual: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FuelOprFitSummary {
    pub samples: usize,
    pub auto_mae: f64,
    pub auto_rmse: f64,
    pub teleop_mae: f64,
    pub teleop_rmse: f64,
    pub total_mae: f64,
    pub total_rmse: f64,
}

#[derive(Debug, Clone)]
pub struct FuelOprResult {
    pub lambda: f64,
    pub teams: Vec<FuelOprTeamResult>,
    pub match_count: usize,
    pub alliance_samples: usize,
    pub fit_samples: Vec<FuelOprFitSample>,
    pub fit_summary: FuelOprFitSummary,
}

impl FuelOprResult {
    fn empty(lambda: f64, match_count: usize) -> Self {
        Self {
            lambda,
            teams: Vec::new(),
            match_count,
            alliance_samples: 0,
            fit_samples: Vec::new(),
            fit_summary: FuelOprFitSummary::default(),
        }
    }

    pub fn opr_for_team(&self, team_number: u32) -> Option<&FuelOprTeamResult> {
        self.teams.iter().find(|t| t.team_number == team_number)
    }
}

/// Fit per-team rates from raw match records at a fixed ridge strength.
/// Pure and deterministic: identical inputs produce bit-identical output.
pub fn calculate_fuel_opr(
    matches: &[MatchRecord],
    ridge_lambda: f64,
    include_playoffs: bool,
) -> FuelOprResult {
    let set = extract_alliance_samples(matches, include_playoffs);
    solve_samples(&set, ridge_lambda)
}

/// Solve `(AᵗA + λI) x = Aᵗb` for the auto, teleop, and total targets, where
/// `A` is the 0/1 alliance-membership design matrix (three ones per row).
/// The three targets are fit independently; `total` is not derived from
/// `auto + teleop`, it regresses against the separately observed total.
pub fn solve_samples(set: &SampleSet, ridge_lambda: f64) -> FuelOprResult {
    let samples = &set.samples;

    let mut team_numbers: Vec<u32> = samples.iter().flat_map(|s| s.teams).collect();
    team_numbers.sort_unstable();
    team_numbers.dedup();

    if samples.is_empty() || team_numbers.is_empty() {
        return FuelOprResult::empty(ridge_lambda, set.match_count);
    }

    let col: HashMap<u32, usize> = team_numbers
        .iter()
        .enumerate()
        .map(|(i, &t)| (t, i))
        .collect();
    let n = team_numbers.len();

    // Normal-equation assembly only touches the three nonzero entries per
    // design row, so AᵗA accumulates pairwise co-membership counts.
    let mut ata = vec![vec![0.0_f64; n]; n];
    let mut atb_auto = vec![0.0_f64; n];
    let mut atb_teleop = vec![0.0_f64; n];
    let mut atb_total = vec![0.0_f64; n];
    let mut played = vec![0_usize; n];

    for s in samples {
        let idx = [col[&s.teams[0]], col[&s.teams[1]], col[&s.teams[2]]];
        for &i in &idx {
            played[i] += 1;
            atb_auto[i] += s.auto_fuel;
            atb_teleop[i] += s.teleop_fuel;
            atb_total[i] += s.total_fuel;
            for &j in &idx {
                ata[i][j] += 1.0;
            }
        }
    }
    for (i, row) in ata.iter_mut().enumerate() {
        row[i] += ridge_lambda;
    }

    let auto = solve_linear_system(&ata, &atb_auto);
    let teleop = solve_linear_system(&ata, &atb_teleop);
    let total = solve_linear_system(&ata, &atb_total);

    let teams: Vec<FuelOprTeamResult> = team_numbers
        .iter()
        .enumerate()
        .map(|(i, &team_number)| FuelOprTeamResult {
            team_number,
            matches_played: played[i],
            auto_fuel_opr: auto[i],
            teleop_fuel_opr: teleop[i],
            total_fuel_opr: total[i],
        })
        .collect();

    let mut fit_samples = Vec::with_capacity(samples.len());
    let mut abs = [0.0_f64; 3];
    let mut sq = [0.0_f64; 3];
    for s in samples {
        let idx = [col[&s.teams[0]], col[&s.teams[1]], col[&s.teams[2]]];
        let predicted_auto: f64 = idx.iter().map(|&i| auto[i]).sum();
        let predicted_teleop: f64 = idx.iter().map(|&i| teleop[i]).sum();
        let predicted_total: f64 = idx.iter().map(|&i| total[i]).sum();

        let auto_residual = s.auto_fuel - predicted_auto;
        let teleop_residual = s.teleop_fuel - predicted_teleop;
        let total_residual = s.total_fuel - predicted_total;

        abs[0] += auto_residual.abs();
        abs[1] += teleop_residual.abs();
        abs[2] += total_residual.abs();
        sq[0] += auto_residual * auto_residual;
        sq[1] += teleop_residual * teleop_residual;
        sq[2] += total_residual * total_residual;

        fit_samples.push(FuelOprFitSample {
            teams: s.teams,
            observed_total: s.total_fuel,
            predicted_total,
            auto_residual,
            teleop_residual,
            total_residual,
        });
    }

    let count = samples.len() as f64;
    let fit_summary = FuelOprFitSummary {
        samples: samples.len(),
        auto_mae: abs[0] / count,
        auto_rmse: (sq[0] / count).sqrt(),
        teleop_mae: abs[1] / count,
        teleop_rmse: (sq[1] / count).sqrt(),
        total_mae: abs[2] / count,
        total_rmse: (sq[2] / count).sqrt(),
    };

    FuelOprResult {
        lambda: ridge_lambda,
        teams,
        match_count: set.match_count,
        alliance_samples: samples.len(),
        fit_samples,
        fit_summary,
    }
}

/// Gaussian elimination with partial pivoting. The row-swap uses a strict
/// `>` comparison, so the first-encountered maximum wins on exact ties.
fn solve_linear_system(a: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut m: Vec<Vec<f64>> = a.to_vec();
    let mut rhs = b.to_vec();

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_mag = m[k][k].abs();
        for r in (k + 1)..n {
            let mag = m[r][k].abs();
            if mag > pivot_mag {
                pivot_mag = mag;
                pivot_row = r;
            }
        }
        if pivot_mag < PIVOT_EPSILON {
            return vec![0.0; n];
        }
        if pivot_row != k {
            m.swap(k, pivot_row);
            rhs.swap(k, pivot_row);
        }

        let pivot = m[k][k];
        for r in (k + 1)..n {
            let factor = m[r][k] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in k..n {
                m[r][c] -= factor * m[k][c];
            }
            rhs[r] -= factor * rhs[k];
        }
    }

    let mut x = vec![0.0; n];
    for k in (0..n).rev() {
        let mut acc = rhs[k];
        for c in (k + 1)..n {
            acc -= m[k][c] * x[c];
        }
        x[k] = acc / m[k][k];
    }
    x
}

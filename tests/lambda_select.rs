use fuelscout::hybrid::{HybridConfig, LambdaMode, calculate_fuel_opr_hybrid};
use fuelscout::lambda_sweep::{DEFAULT_LAMBDA_CANDIDATES, sweep_fuel_opr_lambda};
use fuelscout::match_data::{AllianceRecord, HubCounts, MatchRecord};

const TEAMS: [u32; 9] = [101, 102, 103, 104, 105, 106, 107, 108, 109];
const AUTO_RATES: [f64; 9] = [38.0, 18.0, 25.0, 10.0, 30.0, 22.0, 14.0, 27.0, 20.0];
const TELEOP_RATES: [f64; 9] = [50.0, 30.0, 42.0, 25.0, 45.0, 38.0, 28.0, 44.0, 35.0];

fn alliance(idx: [usize; 3], auto_noise: f64, teleop_noise: f64) -> AllianceRecord {
    let auto = (idx.iter().map(|&i| AUTO_RATES[i]).sum::<f64>() + auto_noise).max(0.0);
    let teleop = (idx.iter().map(|&i| TELEOP_RATES[i]).sum::<f64>() + teleop_noise).max(0.0);
    AllianceRecord {
        team_keys: idx.iter().map(|&i| format!("frc{}", TEAMS[i])).collect(),
        hub: Some(HubCounts {
            auto_count: auto,
            teleop_count: teleop,
            total_count: auto + teleop,
        }),
    }
}

fn triple(start: usize, offset: usize) -> [usize; 3] {
    [start % 9, (start + offset) % 9, (start + 2 * offset) % 9]
}

fn bounded_noise(k: usize) -> f64 {
    const PATTERN: [f64; 7] = [3.0, -2.5, 1.5, -3.0, 2.0, -1.0, 2.5];
    PATTERN[k % PATTERN.len()]
}

/// Same rotating nine-team schedule the solver tests use, truncated to
/// `count` matches.
fn rotation_matches(count: usize) -> Vec<MatchRecord> {
    let mut out: Vec<MatchRecord> = Vec::new();
    for offset in 1..=3_usize {
        let blue_shift = match offset {
            1 => 3,
            2 => 1,
            _ => 4,
        };
        for start in 0..9_usize {
            if out.len() == count {
                return out;
            }
            let n = out.len() as u32 + 1;
            let k = out.len() * 4;
            out.push(MatchRecord {
                key: format!("2026test_qm{n}"),
                comp_level: "qm".to_string(),
                match_number: n,
                time: Some(i64::from(n) * 600),
                red: alliance(triple(start, offset), bounded_noise(k), bounded_noise(k + 1)),
                blue: alliance(
                    triple(start + blue_shift, offset),
                    bounded_noise(k + 2),
                    bounded_noise(k + 3),
                ),
            });
        }
    }
    out
}

#[test]
fn sweep_beats_heavy_regularization_on_noisy_data() {
    let matches = rotation_matches(27);
    let sweep = sweep_fuel_opr_lambda(&matches, &DEFAULT_LAMBDA_CANDIDATES, false, None);

    let best = sweep.best_lambda.expect("a best lambda exists");
    assert!(best < 0.75, "best lambda was {best}");

    let best_rmse = sweep
        .rows
        .iter()
        .find(|r| r.lambda == best)
        .expect("best row present")
        .holdout_rmse;
    let heavy_rmse = sweep
        .rows
        .iter()
        .find(|r| r.lambda == 0.75)
        .expect("0.75 is a candidate")
        .holdout_rmse;
    assert!(
        best_rmse < heavy_rmse,
        "best {best_rmse} should beat heavy {heavy_rmse}"
    );
}

#[test]
fn sweep_reports_every_candidate_and_the_split() {
    let matches = rotation_matches(27);
    let sweep = sweep_fuel_opr_lambda(&matches, &DEFAULT_LAMBDA_CANDIDATES, false, None);
    assert_eq!(sweep.rows.len(), DEFAULT_LAMBDA_CANDIDATES.len());
    // 27 eligible matches: default holdout is a quarter of them.
    assert_eq!(sweep.holdout_match_count, 6);
    assert_eq!(sweep.train_match_count, 21);
}

#[test]
fn hybrid_walks_fixed_then_swept_then_carry() {
    let matches = rotation_matches(18);
    let cfg = HybridConfig::default();
    assert_eq!(cfg.min_matches_for_sweep, 7);
    assert_eq!(cfg.update_every_matches, 3);

    let result = calculate_fuel_opr_hybrid(&matches, &cfg);
    assert_eq!(result.timeline.len(), 18);

    let mode_at = |count: usize| {
        result
            .timeline
            .iter()
            .find(|p| p.match_count == count)
            .expect("timeline point")
            .mode
    };
    assert_eq!(mode_at(3), LambdaMode::Fixed);
    assert_eq!(mode_at(7), LambdaMode::Swept);
    assert_eq!(mode_at(12), LambdaMode::Carry);
    assert_eq!(mode_at(18), LambdaMode::Carry);

    for point in &result.timeline {
        assert!(
            point.lambda >= cfg.min_lambda && point.lambda <= cfg.max_lambda,
            "lambda {} escaped [{}, {}] at match {}",
            point.lambda,
            cfg.min_lambda,
            cfg.max_lambda,
            point.match_count
        );
    }
    assert!(result.selected_lambda >= cfg.min_lambda);
    assert!(result.selected_lambda <= cfg.max_lambda);
    assert_eq!(result.mode, LambdaMode::Carry);
    assert!(result.latest_sweep.is_some());
    assert_eq!(result.opr.match_count, 18);
}

#[test]
fn hybrid_smooths_instead_of_jumping() {
    let matches = rotation_matches(18);
    let cfg = HybridConfig::default();
    let result = calculate_fuel_opr_hybrid(&matches, &cfg);

    // At the first sweep checkpoint the lambda moves at most the smoothing
    // fraction of the gap from the fallback toward the swept value.
    let first_swept = result
        .timeline
        .iter()
        .find(|p| p.mode == LambdaMode::Swept)
        .expect("a sweep happened");
    let max_gap = DEFAULT_LAMBDA_CANDIDATES
        .iter()
        .map(|c| (c - cfg.fallback_lambda).abs())
        .fold(0.0, f64::max);
    let max_step = cfg.smoothing * max_gap;
    assert!((first_swept.lambda - cfg.fallback_lambda).abs() <= max_step + 1e-12);
}

#[test]
fn single_match_produces_an_empty_sweep() {
    let matches = rotation_matches(1);
    let sweep = sweep_fuel_opr_lambda(&matches, &DEFAULT_LAMBDA_CANDIDATES, false, None);
    assert!(sweep.rows.is_empty());
    assert!(sweep.best_lambda.is_none());
    assert_eq!(sweep.train_match_count, 0);
    assert_eq!(sweep.holdout_match_count, 0);
}

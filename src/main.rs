use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};

use fuelscout::event_fetch::fetch_event_matches;
use fuelscout::export::{build_artifact, write_artifact};
use fuelscout::fuel_opr::calculate_fuel_opr;
use fuelscout::hybrid::{HybridConfig, LambdaMode, calculate_fuel_opr_hybrid};
use fuelscout::lambda_sweep::{DEFAULT_LAMBDA_CANDIDATES, sweep_fuel_opr_lambda};
use fuelscout::match_data::{MatchRecord, parse_event_matches_json};
use fuelscout::rankings::{TeamRankingRow, rank_teams};
use fuelscout::synthetic::{SyntheticEventSpec, generate_event};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR] {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let include_playoffs = has_flag(&args, "--playoffs");
    let (label, matches) = load_matches(&args)?;
    if matches.is_empty() {
        return Err(anyhow!("no matches available for {label}"));
    }

    if has_flag(&args, "--sweep") {
        let holdout = arg_value(&args, "--holdout")
            .map(|raw| raw.parse::<usize>().context("--holdout expects a match count"))
            .transpose()?;
        let sweep =
            sweep_fuel_opr_lambda(&matches, &DEFAULT_LAMBDA_CANDIDATES, include_playoffs, holdout);
        print_sweep(&sweep.rows, sweep.best_lambda);
        println!(
            "train matches: {}   holdout matches: {}",
            sweep.train_match_count, sweep.holdout_match_count
        );
        return Ok(());
    }

    let (result, schedule_note) = if let Some(raw) = arg_value(&args, "--lambda") {
        let lambda: f64 = raw.parse().context("--lambda expects a number")?;
        let result = calculate_fuel_opr(&matches, lambda, include_playoffs);
        (result, format!("fixed lambda {lambda}"))
    } else {
        let cfg = HybridConfig {
            include_playoffs,
            ..HybridConfig::default()
        };
        let hybrid = calculate_fuel_opr_hybrid(&matches, &cfg);
        let note = format!(
            "hybrid lambda {:.4} ({} after {} eligible matches)",
            hybrid.selected_lambda,
            mode_label(hybrid.mode),
            hybrid.timeline.len()
        );
        if let Some(sweep) = &hybrid.latest_sweep {
            print_sweep(&sweep.rows, sweep.best_lambda);
        }
        (hybrid.opr, note)
    };

    let rows = rank_teams(&result);
    print_rankings(&label, &rows);
    println!(
        "{} matches, {} alliance samples, total RMSE {:.2} ({})",
        result.match_count, result.alliance_samples, result.fit_summary.total_rmse, schedule_note
    );

    if let Some(out) = arg_value(&args, "--out") {
        let path = PathBuf::from(out);
        let artifact = build_artifact(&label, &result, &rows);
        write_artifact(&path, &artifact)?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn load_matches(args: &[String]) -> Result<(String, Vec<MatchRecord>)> {
    if has_flag(args, "--demo") {
        let spec = SyntheticEventSpec::demo();
        return Ok(("demo".to_string(), generate_event(&spec)));
    }
    if let Some(path) = arg_value(args, "--json") {
        let raw = fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        return Ok((path, parse_event_matches_json(&raw)?));
    }
    let Some(event_key) = args.iter().find(|a| !a.starts_with("--")) else {
        return Err(anyhow!("no event key given; see --help"));
    };
    Ok((event_key.clone(), fetch_event_matches(event_key)?))
}

fn print_rankings(label: &str, rows: &[TeamRankingRow]) {
    println!("Fuel OPR rankings — {label}");
    println!(
        "{:>4}  {:>6}  {:>7}  {:>9}  {:>11}  {:>9}",
        "rank", "team", "matches", "auto", "teleop", "total"
    );
    for row in rows {
        println!(
            "{:>4}  {:>6}  {:>7}  {:>9.2}  {:>11.2}  {:>9.2}",
            row.rank,
            row.team_number,
            row.matches_played,
            row.auto_fuel_opr,
            row.teleop_fuel_opr,
            row.total_fuel_opr
        );
    }
}

fn print_sweep(rows: &[fuelscout::lambda_sweep::LambdaSweepRow], best: Option<f64>) {
    println!("{:>8}  {:>12}", "lambda", "holdout RMSE");
    for row in rows {
        let marker = if Some(row.lambda) == best { "  <- best" } else { "" };
        if row.holdout_rmse.is_finite() {
            println!("{:>8.3}  {:>12.3}{marker}", row.lambda, row.holdout_rmse);
        } else {
            println!("{:>8.3}  {:>12}", row.lambda, "inf");
        }
    }
}

fn mode_label(mode: LambdaMode) -> &'static str {
    match mode {
        LambdaMode::Fixed => "fixed",
        LambdaMode::Carry => "carry",
        LambdaMode::Swept => "swept",
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn print_usage() {
    println!("usage: fuelscout <event-key> [options]");
    println!("       fuelscout --json FILE [options]");
    println!("       fuelscout --demo [options]");
    println!();
    println!("options:");
    println!("  --playoffs     include playoff matches in the fit");
    println!("  --lambda X     fixed ridge strength instead of the hybrid schedule");
    println!("  --sweep        print the candidate-lambda holdout table and exit");
    println!("  --holdout N    holdout match count for --sweep");
    println!("  --out FILE     write the ranking artifact JSON");
}

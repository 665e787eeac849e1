use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::match_data::{AllianceRecord, HubCounts, MatchRecord, QUALIFICATION_LEVEL};

/// A team's true per-match scoring rates, used to synthesize alliance totals.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticTeam {
    pub team_number: u32,
    pub auto_rate: f64,
    pub teleop_rate: f64,
}

/// Parameters for a synthetic event: the demo mode of the CLI and the data
/// source for benches. Seeded, so a given spec always produces the same
/// schedule and the same scores.
#[derive(Debug, Clone)]
pub struct SyntheticEventSpec {
    pub teams: Vec<SyntheticTeam>,
    pub matches: usize,
    /// Symmetric bound on the per-alliance noise added to each phase total.
    pub noise: f64,
    pub seed: u64,
}

impl SyntheticEventSpec {
    pub fn demo() -> Self {
        let teams = (0..12)
            .map(|i| SyntheticTeam {
                team_number: 100 + i,
                auto_rate: 6.0 + 3.0 * f64::from(i),
                teleop_rate: 15.0 + 5.0 * f64::from(i),
            })
            .collect();
        Self {
            teams,
            matches: 40,
            noise: 4.0,
            seed: 7,
        }
    }
}

/// Generate qualification matches with random three-team alliances whose
/// observed totals are the sums of their members' true rates plus bounded
/// noise. Needs at least six teams for two disjoint alliances.
pub fn generate_event(spec: &SyntheticEventSpec) -> Vec<MatchRecord> {
    if spec.teams.len() < 6 || spec.matches == 0 {
        return Vec::new();
    }
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut out = Vec::with_capacity(spec.matches);
    for number in 1..=spec.matches {
        let mut order: Vec<usize> = (0..spec.teams.len()).collect();
        order.shuffle(&mut rng);
        let red_teams = [
            spec.teams[order[0]],
            spec.teams[order[1]],
            spec.teams[order[2]],
        ];
        let blue_teams = [
            spec.teams[order[3]],
            spec.teams[order[4]],
            spec.teams[order[5]],
        ];
        out.push(MatchRecord {
            key: format!("demo_qm{number}"),
            comp_level: QUALIFICATION_LEVEL.to_string(),
            match_number: number as u32,
            time: Some(number as i64 * 420),
            red: synthesize_alliance(&mut rng, &red_teams, spec.noise),
            blue: synthesize_alliance(&mut rng, &blue_teams, spec.noise),
        });
    }
    out
}

fn synthesize_alliance(rng: &mut StdRng, teams: &[SyntheticTeam; 3], noise: f64) -> AllianceRecord {
    let true_auto: f64 = teams.iter().map(|t| t.auto_rate).sum();
    let true_teleop: f64 = teams.iter().map(|t| t.teleop_rate).sum();
    let auto_count = (true_auto + jitter(rng, noise)).max(0.0);
    let teleop_count = (true_teleop + jitter(rng, noise)).max(0.0);
    AllianceRecord {
        team_keys: teams.iter().map(|t| format!("frc{}", t.team_number)).collect(),
        hub: Some(HubCounts {
            auto_count,
            teleop_count,
            total_count: auto_count + teleop_count,
        }),
    }
}

fn jitter(rng: &mut StdRng, noise: f64) -> f64 {
    if noise > 0.0 {
        rng.gen_range(-noise..=noise)
    } else {
        0.0
    }
}

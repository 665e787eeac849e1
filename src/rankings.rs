use std::cmp::Ordering;

use crate::fuel_opr::FuelOprResult;

/// One display row for the team-ranking view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamRankingRow {
    pub rank: usize,
    pub team_number: u32,
    pub matches_played: usize,
    pub auto_fuel_opr: f64,
    pub teleop_fuel_opr: f64,
    pub total_fuel_opr: f64,
}

/// Rank teams by combined-total rate, highest first; team number breaks
/// exact ties so the ordering is reproducible.
pub fn rank_teams(result: &FuelOprResult) -> Vec<TeamRankingRow> {
    let mut teams = result.teams.clone();
    teams.sort_by(|a, b| {
        b.total_fuel_opr
            .partial_cmp(&a.total_fuel_opr)
            .unwrap_or(Ordering::Equal)
            .then(a.team_number.cmp(&b.team_number))
    });
    teams
        .iter()
        .enumerate()
        .map(|(i, t)| TeamRankingRow {
            rank: i + 1,
            team_number: t.team_number,
            matches_played: t.matches_played,
            auto_fuel_opr: t.auto_fuel_opr,
            teleop_fuel_opr: t.teleop_fuel_opr,
            total_fuel_opr: t.total_fuel_opr,
        })
        .collect()
}

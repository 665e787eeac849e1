use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fuel_opr::FuelOprResult;
use crate::rankings::TeamRankingRow;

pub const ARTIFACT_VERSION: u32 = 1;

/// Versioned on-disk snapshot of a ranking run, for the display layer and
/// for diffing runs across an event day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelOprArtifact {
    pub version: u32,
    pub generated_at: String,
    pub event_key: String,
    pub lambda: f64,
    pub match_count: usize,
    pub alliance_samples: usize,
    pub teams: Vec<ArtifactTeamRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactTeamRow {
    pub rank: usize,
    pub team_number: u32,
    pub matches_played: usize,
    pub auto_fuel_opr: f64,
    pub teleop_fuel_opr: f64,
    pub total_fuel_opr: f64,
}

pub fn build_artifact(
    event_key: &str,
    result: &FuelOprResult,
    rows: &[TeamRankingRow],
) -> FuelOprArtifact {
    FuelOprArtifact {
        version: ARTIFACT_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        event_key: event_key.to_string(),
        lambda: result.lambda,
        match_count: result.match_count,
        alliance_samples: result.alliance_samples,
        teams: rows
            .iter()
            .map(|r| ArtifactTeamRow {
                rank: r.rank,
                team_number: r.team_number,
                matches_played: r.matches_played,
                auto_fuel_opr: r.auto_fuel_opr,
                teleop_fuel_opr: r.teleop_fuel_opr,
                total_fuel_opr: r.total_fuel_opr,
            })
            .collect(),
    }
}

pub fn write_artifact(path: &Path, artifact: &FuelOprArtifact) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact).context("serialize opr artifact")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).context("write opr artifact")?;
    fs::rename(&tmp, path).context("swap opr artifact")?;
    Ok(())
}

pub fn load_artifact(path: &Path) -> Result<FuelOprArtifact> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read opr artifact {}", path.display()))?;
    let artifact = serde_json::from_str::<FuelOprArtifact>(&raw)
        .with_context(|| format!("parse opr artifact {}", path.display()))?;
    if artifact.version != ARTIFACT_VERSION {
        return Err(anyhow::anyhow!(
            "unsupported opr artifact version {}",
            artifact.version
        ));
    }
    Ok(artifact)
}

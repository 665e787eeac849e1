use anyhow::{Context, Result};
use serde_json::Value;

pub const QUALIFICATION_LEVEL: &str = "qm";

/// One event match as served by The Blue Alliance `/event/{key}/matches`
/// endpoint, reduced to the fields the estimator consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub key: String,
    pub comp_level: String,
    pub match_number: u32,
    pub time: Option<i64>,
    pub red: AllianceRecord,
    pub blue: AllianceRecord,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllianceRecord {
    pub team_keys: Vec<String>,
    pub hub: Option<HubCounts>,
}

/// Per-alliance fuel counters from `score_breakdown.{red,blue}.hubScore`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HubCounts {
    pub auto_count: f64,
    pub teleop_count: f64,
    pub total_count: f64,
}

impl MatchRecord {
    pub fn is_qualification(&self) -> bool {
        self.comp_level == QUALIFICATION_LEVEL
    }
}

/// Parse the raw `/event/{key}/matches` body. Malformed individual match
/// objects are skipped; missing or non-numeric counter fields read as zero.
pub fn parse_event_matches_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty event matches response"));
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid event matches json")?;
    let Some(arr) = v.as_array() else {
        return Err(anyhow::anyhow!("event matches payload is not an array"));
    };

    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        if let Some(m) = parse_match_record(item) {
            out.push(m);
        }
    }
    Ok(out)
}

fn parse_match_record(v: &Value) -> Option<MatchRecord> {
    let key = v.get("key")?.as_str()?.to_string();
    let comp_level = v.get("comp_level")?.as_str()?.to_string();
    let match_number = v
        .get("match_number")
        .and_then(|x| x.as_u64())
        .unwrap_or(0) as u32;
    // Scheduled time is absent for some offseason events; predicted_time is
    // the usual fallback there.
    let time = v
        .get("time")
        .and_then(|x| x.as_i64())
        .or_else(|| v.get("predicted_time").and_then(|x| x.as_i64()));

    let alliances = v.get("alliances")?;
    let breakdown = v.get("score_breakdown");
    let red = parse_alliance(alliances.get("red"), breakdown.and_then(|b| b.get("red")));
    let blue = parse_alliance(alliances.get("blue"), breakdown.and_then(|b| b.get("blue")));

    Some(MatchRecord {
        key,
        comp_level,
        match_number,
        time,
        red,
        blue,
    })
}

fn parse_alliance(alliance: Option<&Value>, breakdown: Option<&Value>) -> AllianceRecord {
    let team_keys = alliance
        .and_then(|a| a.get("team_keys"))
        .and_then(|x| x.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|k| k.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default();
    let hub = breakdown
        .and_then(|b| b.get("hubScore"))
        .filter(|h| h.is_object())
        .map(parse_hub_counts);
    AllianceRecord { team_keys, hub }
}

fn parse_hub_counts(v: &Value) -> HubCounts {
    HubCounts {
        auto_count: number_field(v, "autoCount"),
        teleop_count: number_field(v, "teleopCount"),
        total_count: number_field(v, "totalCount"),
    }
}

fn number_field(v: &Value, field: &str) -> f64 {
    match v.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// `"frc254"` → `Some(254)`. Keys without a purely numeric suffix (`frc254b`
/// and the like) drop out of the roster.
pub fn team_number_from_key(key: &str) -> Option<u32> {
    let trimmed = key.trim();
    let rest = trimmed.strip_prefix("frc").unwrap_or(trimmed);
    if rest.is_empty() {
        return None;
    }
    rest.parse::<u32>().ok()
}

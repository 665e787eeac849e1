use anyhow::{Context, Result};

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::match_data::{MatchRecord, parse_event_matches_json};

const TBA_API_BASE: &str = "https://www.thebluealliance.com/api/v3";
const AUTH_KEY_ENV: &str = "TBA_AUTH_KEY";

/// Download every match of an event (e.g. `"2026casj"`) from The Blue
/// Alliance read API. Requires `TBA_AUTH_KEY` in the environment.
pub fn fetch_event_matches(event_key: &str) -> Result<Vec<MatchRecord>> {
    let event_key = event_key.trim();
    if event_key.is_empty() {
        return Err(anyhow::anyhow!("empty event key"));
    }
    let auth_key = auth_key()?;
    let client = http_client()?;
    let url = format!("{TBA_API_BASE}/event/{event_key}/matches");
    let body = fetch_json_cached(client, &url, &[("X-TBA-Auth-Key", auth_key.as_str())])
        .with_context(|| format!("event matches request failed for {event_key}"))?;
    parse_event_matches_json(&body)
        .with_context(|| format!("could not parse matches for {event_key}"))
}

fn auth_key() -> Result<String> {
    let key = std::env::var(AUTH_KEY_ENV).unwrap_or_default();
    if key.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "{AUTH_KEY_ENV} is not set; add it to the environment or a .env file"
        ));
    }
    Ok(key.trim().to_string())
}

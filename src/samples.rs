use crate::match_data::{AllianceRecord, MatchRecord, team_number_from_key};

/// One per-alliance observation: the three participants and the fuel totals
/// they jointly produced in a single match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllianceSample {
    pub teams: [u32; 3],
    pub auto_fuel: f64,
    pub teleop_fuel: f64,
    pub total_fuel: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub samples: Vec<AllianceSample>,
    pub match_count: usize,
}

/// A match is usable only if it is a qualification match (or playoffs are
/// explicitly included) and both alliances carry a hub-score breakdown.
pub fn match_is_eligible(m: &MatchRecord, include_playoffs: bool) -> bool {
    (m.is_qualification() || include_playoffs) && m.red.hub.is_some() && m.blue.hub.is_some()
}

/// Eligible matches in chronological order. Scheduled time is the primary
/// key; match number breaks ties for events without timestamps.
pub fn eligible_matches(matches: &[MatchRecord], include_playoffs: bool) -> Vec<MatchRecord> {
    let mut out: Vec<MatchRecord> = matches
        .iter()
        .filter(|m| match_is_eligible(m, include_playoffs))
        .cloned()
        .collect();
    out.sort_by(|a, b| a.time.cmp(&b.time).then(a.match_number.cmp(&b.match_number)));
    out
}

/// Flatten match records into alliance observations. Each eligible match
/// counts toward `match_count` even when only one of its alliances resolves
/// to a full roster; malformed alliances are skipped, never errors.
pub fn extract_alliance_samples(matches: &[MatchRecord], include_playoffs: bool) -> SampleSet {
    let mut set = SampleSet::default();
    for m in matches {
        if !match_is_eligible(m, include_playoffs) {
            continue;
        }
        set.match_count += 1;
        if let Some(sample) = alliance_sample(&m.red) {
            set.samples.push(sample);
        }
        if let Some(sample) = alliance_sample(&m.blue) {
            set.samples.push(sample);
        }
    }
    set
}

/// An alliance contributes a sample only if its roster resolves to exactly
/// three distinct team numbers and its hub counts are present.
pub fn alliance_sample(alliance: &AllianceRecord) -> Option<AllianceSample> {
    let hub = alliance.hub?;
    let teams: Vec<u32> = alliance
        .team_keys
        .iter()
        .filter_map(|k| team_number_from_key(k))
        .collect();
    if teams.len() != 3 {
        return None;
    }
    if teams[0] == teams[1] || teams[0] == teams[2] || teams[1] == teams[2] {
        return None;
    }
    Some(AllianceSample {
        teams: [teams[0], teams[1], teams[2]],
        auto_fuel: hub.auto_count.max(0.0),
        teleop_fuel: hub.teleop_count.max(0.0),
        total_fuel: hub.total_count.max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_data::HubCounts;

    fn alliance(keys: &[&str], hub: Option<HubCounts>) -> AllianceRecord {
        AllianceRecord {
            team_keys: keys.iter().map(|k| k.to_string()).collect(),
            hub,
        }
    }

    fn hub(auto: f64, teleop: f64) -> Option<HubCounts> {
        Some(HubCounts {
            auto_count: auto,
            teleop_count: teleop,
            total_count: auto + teleop,
        })
    }

    fn match_record(comp_level: &str, n: u32, red: AllianceRecord, blue: AllianceRecord) -> MatchRecord {
        MatchRecord {
            key: format!("2026test_{comp_level}{n}"),
            comp_level: comp_level.to_string(),
            match_number: n,
            time: Some(i64::from(n) * 600),
            red,
            blue,
        }
    }

    #[test]
    fn playoff_matches_need_opt_in() {
        let matches = vec![
            match_record(
                "qm",
                1,
                alliance(&["frc1", "frc2", "frc3"], hub(10.0, 20.0)),
                alliance(&["frc4", "frc5", "frc6"], hub(8.0, 25.0)),
            ),
            match_record(
                "sf",
                1,
                alliance(&["frc1", "frc2", "frc3"], hub(10.0, 20.0)),
                alliance(&["frc4", "frc5", "frc6"], hub(8.0, 25.0)),
            ),
        ];

        let quals = extract_alliance_samples(&matches, false);
        assert_eq!(quals.match_count, 1);
        assert_eq!(quals.samples.len(), 2);

        let all = extract_alliance_samples(&matches, true);
        assert_eq!(all.match_count, 2);
        assert_eq!(all.samples.len(), 4);
    }

    #[test]
    fn half_resolved_match_still_counts() {
        let matches = vec![match_record(
            "qm",
            3,
            alliance(&["frc1", "frc2", "frc3"], hub(10.0, 20.0)),
            alliance(&["frc4", "frc5b", "frc6"], hub(8.0, 25.0)),
        )];
        let set = extract_alliance_samples(&matches, false);
        assert_eq!(set.match_count, 1);
        assert_eq!(set.samples.len(), 1);
        assert_eq!(set.samples[0].teams, [1, 2, 3]);
    }

    #[test]
    fn missing_breakdown_disqualifies_the_match() {
        let matches = vec![match_record(
            "qm",
            4,
            alliance(&["frc1", "frc2", "frc3"], hub(10.0, 20.0)),
            alliance(&["frc4", "frc5", "frc6"], None),
        )];
        let set = extract_alliance_samples(&matches, false);
        assert_eq!(set.match_count, 0);
        assert!(set.samples.is_empty());
    }

    #[test]
    fn duplicate_roster_entries_are_rejected() {
        let record = alliance(&["frc7", "frc7", "frc9"], hub(5.0, 5.0));
        assert!(alliance_sample(&record).is_none());
    }

    #[test]
    fn eligible_matches_sort_chronologically() {
        let mut early = match_record(
            "qm",
            2,
            alliance(&["frc1", "frc2", "frc3"], hub(1.0, 1.0)),
            alliance(&["frc4", "frc5", "frc6"], hub(1.0, 1.0)),
        );
        early.time = Some(100);
        let mut late = match_record(
            "qm",
            1,
            alliance(&["frc1", "frc2", "frc3"], hub(1.0, 1.0)),
            alliance(&["frc4", "frc5", "frc6"], hub(1.0, 1.0)),
        );
        late.time = Some(200);

        let ordered = eligible_matches(&[late, early], false);
        assert_eq!(ordered[0].match_number, 2);
        assert_eq!(ordered[1].match_number, 1);
    }
}

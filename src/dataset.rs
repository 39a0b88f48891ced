use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{
    Event, FormationSlot, PassCombination, PlayerMatchStats, TeamMatchStats, MAX_MINUTE,
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerSide<T> {
    #[serde(default)]
    pub home: T,
    #[serde(default)]
    pub away: T,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub kickoff: Option<NaiveDate>,
    pub home: TeamMatchStats,
    pub away: TeamMatchStats,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub players: Vec<PlayerMatchStats>,
    #[serde(default)]
    pub pass_combinations: PerSide<Vec<PassCombination>>,
    #[serde(default)]
    pub defensive_line: PerSide<Vec<f64>>,
    #[serde(default)]
    pub formation: PerSide<Vec<FormationSlot>>,
}

impl MatchRecord {
    pub fn label(&self) -> String {
        format!("{} v {}", self.home.name, self.away.name)
    }

    /// Last minute with an event, never earlier than full time.
    pub fn final_minute(&self) -> u16 {
        self.events
            .iter()
            .map(|e| e.minute)
            .max()
            .unwrap_or(0)
            .max(90)
    }

    pub fn players_for<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a PlayerMatchStats> + 'a {
        self.players
            .iter()
            .filter(move |p| p.team.trim().eq_ignore_ascii_case(team.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchDataset {
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

#[derive(Deserialize)]
struct Wrapped {
    matches: Vec<MatchRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetShape {
    Wrapped(Wrapped),
    List(Vec<MatchRecord>),
    Single(Box<MatchRecord>),
}

/// Accepts `{"matches": [...]}`, a bare array of matches, a single match, or `null`.
pub fn parse_dataset_json(raw: &str) -> Result<MatchDataset> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchDataset::default());
    }
    let shape: DatasetShape = serde_json::from_str(trimmed).context("invalid dataset json")?;
    let mut dataset = match shape {
        DatasetShape::Wrapped(w) => MatchDataset { matches: w.matches },
        DatasetShape::List(matches) => MatchDataset { matches },
        DatasetShape::Single(m) => MatchDataset { matches: vec![*m] },
    };
    for record in &mut dataset.matches {
        sanitize(record);
    }
    Ok(dataset)
}

pub fn load_dataset(path: &Path) -> Result<MatchDataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read dataset {}", path.display()))?;
    let dataset =
        parse_dataset_json(&raw).with_context(|| format!("parse dataset {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        matches = dataset.matches.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

fn sanitize(record: &mut MatchRecord) {
    let before = record.events.len();
    record.events.retain(|e| !e.team.trim().is_empty());
    let dropped = before - record.events.len();
    if dropped > 0 {
        tracing::warn!(match_id = %record.id, dropped, "events without a team were dropped");
    }

    for ev in &mut record.events {
        ev.minute = ev.minute.min(MAX_MINUTE);
    }
    record.events.sort_by_key(|e| e.minute);

    for p in &mut record.players {
        if !p.minutes.is_finite() || p.minutes < 0.0 {
            p.minutes = 0.0;
        }
        p.minutes = p.minutes.min(f64::from(MAX_MINUTE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_and_empty_are_empty() {
        assert!(parse_dataset_json("null").unwrap().matches.is_empty());
        assert!(parse_dataset_json("  ").unwrap().matches.is_empty());
    }

    #[test]
    fn accepts_bare_list_and_single_match() {
        let one = r#"{"id": "m1", "home": {"name": "A"}, "away": {"name": "B"}}"#;
        assert_eq!(parse_dataset_json(one).unwrap().matches.len(), 1);
        let list = format!("[{one}, {one}]");
        assert_eq!(parse_dataset_json(&list).unwrap().matches.len(), 2);
    }

    #[test]
    fn minutes_are_clamped_and_sorted() {
        let raw = r#"{"matches": [{
            "id": "m1",
            "home": {"name": "A"},
            "away": {"name": "B"},
            "events": [
                {"minute": 150, "team": "A", "kind": "shot"},
                {"minute": 3, "team": "B", "kind": "pass"},
                {"minute": 10, "team": " ", "kind": "pass"},
                {"minute": 12, "team": "B", "kind": "backheel-flick"}
            ],
            "players": [{"name": "P", "team": "A", "minutes": -5}]
        }]}"#;
        let dataset = parse_dataset_json(raw).unwrap();
        let m = &dataset.matches[0];
        assert_eq!(m.events.len(), 3);
        assert_eq!(m.events[0].minute, 3);
        assert_eq!(m.events[2].minute, MAX_MINUTE);
        assert_eq!(m.events[1].kind, crate::types::EventKind::Other);
        assert_eq!(m.players[0].minutes, 0.0);
        assert_eq!(m.final_minute(), MAX_MINUTE);
    }

    #[test]
    fn malformed_structure_is_an_error() {
        assert!(parse_dataset_json(r#"{"matches": 5}"#).is_err());
    }
}

use std::fs;
use std::path::PathBuf;

use pitch_metrics::dataset::{load_dataset, parse_dataset_json};
use pitch_metrics::types::{EventKind, Position};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

#[test]
fn parses_sample_match_fixture() {
    let dataset = parse_dataset_json(&read_fixture("sample_match.json")).expect("fixture should parse");
    assert_eq!(dataset.matches.len(), 1);

    let m = &dataset.matches[0];
    assert_eq!(m.label(), "Riverside v Hillcrest");
    assert_eq!(m.kickoff.map(|d| d.to_string()).as_deref(), Some("2024-05-01"));
    // the team-less event is dropped, the rest sorted by minute
    assert_eq!(m.events.len(), 9);
    assert_eq!(m.events[0].minute, 5);
    assert_eq!(m.events[8].kind, EventKind::Shot);
    assert_eq!(m.final_minute(), 93);
}

#[test]
fn stat_cells_are_normalised() {
    let dataset = parse_dataset_json(&read_fixture("sample_match.json")).unwrap();
    let m = &dataset.matches[0];
    assert_eq!(m.home.stats.get("passes_completed"), 412.0);
    assert_eq!(m.home.stats.get("Pass Accuracy"), 84.0);
    assert_eq!(m.home.stats.get("fouls"), 3.0);
    assert_eq!(m.away.stats.get("passes_completed"), 1204.0);
    assert!(!m.away.stats.contains("flank_isolation"));
}

#[test]
fn positions_map_to_groups() {
    let dataset = parse_dataset_json(&read_fixture("sample_match.json")).unwrap();
    let by_name = |name: &str| {
        dataset.matches[0]
            .players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.position)
    };
    assert_eq!(by_name("Doyle"), Some(Position::Striker));
    assert_eq!(by_name("Keane"), Some(Position::CentreBack));
    assert_eq!(by_name("Okafor"), Some(Position::Striker));
    assert_eq!(by_name("Vidal"), Some(Position::Goalkeeper));
}

#[test]
fn load_dataset_reports_missing_file() {
    let err = load_dataset(&fixture_path("does_not_exist.json")).unwrap_err();
    assert!(format!("{err:#}").contains("does_not_exist.json"));
}

#[test]
fn load_dataset_reads_fixture_from_disk() {
    let dataset = load_dataset(&fixture_path("sample_match.json")).expect("fixture should load");
    assert_eq!(dataset.matches[0].players.len(), 5);
    assert_eq!(dataset.matches[0].defensive_line.home, vec![30.0, 32.0, 34.0]);
    assert!(dataset.matches[0].defensive_line.away.is_empty());
}

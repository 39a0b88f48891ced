use std::fs;
use std::path::PathBuf;

use pitch_metrics::dataset::{parse_dataset_json, MatchDataset};
use pitch_metrics::injury_risk::RiskCategory;
use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::report::{build_match_report, build_reports, MatchReport};
use pitch_metrics::xg::player_expected_assists;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn sample() -> (MatchDataset, MatchReport) {
    let dataset = parse_dataset_json(&read_fixture("sample_match.json")).expect("fixture should parse");
    let report = build_match_report(&dataset.matches[0]);
    (dataset, report)
}

#[test]
fn pressing_and_territory() {
    let (_, report) = sample();
    // 1204 / (10 + 5 + 3)
    assert_eq!(report.home.ppda, 66.89);
    // 412 / (14 + 8 + 12)
    assert_eq!(report.away.ppda, 12.12);
    assert_eq!(report.home.field_tilt, 59.5);
    assert_eq!(report.away.field_tilt, 44.0);
}

#[test]
fn progression_and_possession_value() {
    let (_, report) = sample();
    assert_eq!(report.home.progressive_actions, 2);
    assert_eq!(report.away.progressive_actions, 1);
    assert_eq!(report.home.possession_value.total, 12.3);
    // away has no touch counts, so they come from its events
    assert_eq!(report.away.possession_value.middle_third, 0.04);
    assert_eq!(report.away.possession_value.total, 0.16);
}

#[test]
fn chance_quality() {
    let (dataset, report) = sample();
    assert_eq!(report.home.shots, 2);
    assert_eq!(report.away.shots, 2);
    assert!(report.home.xg > report.away.xg);
    assert!(report.home.xa > 0.0);
    assert_eq!(report.away.xa, 0.0);
    let marsh = player_expected_assists(&dataset.matches[0].events, "Marsh");
    assert_eq!(marsh, report.home.xa);

    assert_eq!(report.timeline.len(), 94);
    let last = report.timeline.last().copied().unwrap();
    assert!((last.home - report.home.xg).abs() < 1e-6);
    assert_eq!(report.timeline_at(12).unwrap().home, 0.0);
    assert!(report.timeline_at(13).unwrap().home > 0.0);
}

#[test]
fn shape_metrics() {
    let (_, report) = sample();
    assert_eq!(report.home.coordination.players, 3);
    assert_eq!(report.home.coordination.index, 100.0);
    assert_eq!(report.away.coordination.index, 70.0);

    assert_eq!(report.home.defensive_line.mean_height, 32.0);
    assert_eq!(report.home.defensive_line.stability, 0.273);
    assert_eq!(report.away.defensive_line.samples, 0);
    assert_eq!(report.away.defensive_line.stability, 0.0);

    assert_eq!(report.home.discipline.matched_players, 3);
    assert_eq!(report.home.discipline.score, 100.0);
    assert_eq!(report.away.discipline.score, 0.0);

    assert_eq!(report.home.top_pairs.len(), 3);
    assert!(report.home.top_pairs.iter().all(|p| p.score == 60.0));
    assert_eq!(report.away.top_pairs[0].score, 18.0);
}

#[test]
fn players_carry_risk_and_value() {
    let (_, report) = sample();
    assert_eq!(report.players.len(), 5);
    assert!(report
        .players
        .windows(2)
        .all(|w| w[0].impact.score >= w[1].impact.score));

    let find = |name: &str| report.players.iter().find(|p| p.impact.player == name).unwrap();
    let marsh = find("Marsh");
    let risk = marsh.injury.expect("workload present");
    assert_eq!(risk.risk_score, 74.0);
    assert_eq!(risk.risk_category, RiskCategory::High);
    assert!(marsh.value.is_some());

    let doyle = find("Doyle");
    assert_eq!(doyle.injury.map(|r| r.risk_category), Some(RiskCategory::Medium));

    let keane = find("Keane");
    assert!(keane.injury.is_none());
    assert!(keane.value.is_none());
}

#[test]
fn opaque_metrics_pass_through() {
    let (_, report) = sample();
    assert_eq!(report.home.opaque.get("sustained_threat_index"), Some(&6.4));
    assert_eq!(report.home.opaque.get("transition_exposure"), Some(&2.1));
    assert!(report.away.opaque.is_empty());
}

#[test]
fn multi_match_reports_are_deterministic() {
    let dataset = mock_dataset(21, 6);
    let first = build_reports(&dataset);
    let second = build_reports(&dataset);
    assert_eq!(first, second);
    let ids: Vec<_> = first.iter().map(|r| r.match_id.clone()).collect();
    let expected: Vec<_> = dataset.matches.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn reports_serialise_to_json() {
    let (_, report) = sample();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["home"]["team"], "Riverside");
    assert!(json["players"][0]["impact"]["position"].is_string());
}

//! Deterministic mock datasets for the dashboard, benches and tests.

use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dataset::{MatchDataset, MatchRecord, PerSide};
use crate::types::{
    Event, EventKind, EventTag, FormationSlot, PassCombination, PitchPoint, PlayerMatchStats,
    Position, ShotDetail, ShotType, StatLine, TeamMatchStats, Workload, ZoneShares, ZoneTouches,
    PITCH_LENGTH, PITCH_WIDTH,
};

const TEAMS: &[&str] = &[
    "Harbour City",
    "Northbank Rovers",
    "Ironvale",
    "Southport Athletic",
    "Kingsmere",
    "Eastfield United",
];

/// 4-3-3 from the team's own perspective (attacking towards x = 105).
const SHAPE: [(Position, f64, f64); 11] = [
    (Position::Goalkeeper, 5.0, 34.0),
    (Position::FullBack, 30.0, 8.0),
    (Position::CentreBack, 22.0, 24.0),
    (Position::CentreBack, 22.0, 44.0),
    (Position::FullBack, 30.0, 60.0),
    (Position::DefensiveMidfielder, 40.0, 34.0),
    (Position::CentralMidfielder, 52.0, 22.0),
    (Position::CentralMidfielder, 52.0, 46.0),
    (Position::Winger, 75.0, 10.0),
    (Position::Striker, 82.0, 34.0),
    (Position::Winger, 75.0, 58.0),
];

const OPAQUE_FIELDS: [&str; 3] = [
    "sustained_threat_index",
    "transition_exposure",
    "flank_isolation",
];

pub fn mock_dataset(seed: u64, matches: usize) -> MatchDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let base_date = NaiveDate::from_ymd_opt(2024, 8, 17).unwrap_or_default();
    let matches = (0..matches)
        .map(|i| {
            let home = TEAMS[(2 * i) % TEAMS.len()];
            let away = TEAMS[(2 * i + 1) % TEAMS.len()];
            let kickoff = base_date + ChronoDuration::days(7 * i as i64);
            mock_match(&mut rng, &format!("mock-{}", i + 1), home, away, kickoff)
        })
        .collect();
    MatchDataset { matches }
}

fn player_name(team: &str, idx: usize) -> String {
    let short: String = team
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect();
    format!("{short} #{}", idx + 1)
}

fn jitter(rng: &mut StdRng, at: PitchPoint, spread: f64) -> PitchPoint {
    PitchPoint::new(
        (at.x + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_LENGTH),
        (at.y + rng.gen_range(-spread..spread)).clamp(0.0, PITCH_WIDTH),
    )
}

fn mock_match(
    rng: &mut StdRng,
    id: &str,
    home: &str,
    away: &str,
    kickoff: NaiveDate,
) -> MatchRecord {
    let mut events = Vec::new();
    for team in [home, away] {
        events.extend(mock_team_events(rng, team));
    }
    events.sort_by_key(|e| e.minute);

    let mut players = Vec::new();
    let mut combos = PerSide::<Vec<PassCombination>>::default();
    let mut formation = PerSide::<Vec<FormationSlot>>::default();
    for (side, team) in [(0, home), (1, away)] {
        players.extend(mock_players(rng, team));
        let slots: Vec<FormationSlot> = SHAPE
            .iter()
            .enumerate()
            .map(|(idx, (_, x, y))| FormationSlot {
                player: player_name(team, idx),
                x: *x,
                y: *y,
            })
            .collect();
        let table = mock_combinations(rng, team);
        if side == 0 {
            formation.home = slots;
            combos.home = table;
        } else {
            formation.away = slots;
            combos.away = table;
        }
    }

    let defensive_line = PerSide {
        home: (0..18).map(|_| rng.gen_range(28.0..46.0)).collect(),
        away: (0..18).map(|_| rng.gen_range(26.0..44.0)).collect(),
    };

    MatchRecord {
        id: id.to_string(),
        competition: "Mock League".to_string(),
        kickoff: Some(kickoff),
        home: mock_team_stats(rng, home, &events, away),
        away: mock_team_stats(rng, away, &events, home),
        events,
        players,
        pass_combinations: combos,
        defensive_line,
        formation,
    }
}

fn mock_team_events(rng: &mut StdRng, team: &str) -> Vec<Event> {
    let mut out = Vec::new();
    let passes = rng.gen_range(60..110);
    for _ in 0..passes {
        let start = PitchPoint::new(rng.gen_range(5.0..90.0), rng.gen_range(2.0..66.0));
        let gain = rng.gen_range(-12.0..22.0);
        let end = jitter(rng, PitchPoint::new(start.x + gain, start.y), 10.0);
        let key = end.x > 85.0 && rng.gen_bool(0.35);
        let mut tags = Vec::new();
        if key {
            tags.push(EventTag::KeyPass);
            if rng.gen_bool(0.3) {
                tags.push(EventTag::ThroughBall);
            }
        }
        out.push(Event {
            minute: rng.gen_range(0..=93),
            team: team.to_string(),
            kind: if rng.gen_bool(0.8) {
                EventKind::Pass
            } else {
                EventKind::Carry
            },
            player: Some(player_name(team, rng.gen_range(1..11))),
            outcome: rng.gen_bool(0.82),
            location: start,
            end: Some(end),
            value: None,
            shot: None,
            tags,
        });
    }

    let shots = rng.gen_range(6..18);
    for _ in 0..shots {
        let at = PitchPoint::new(rng.gen_range(78.0..101.0), rng.gen_range(14.0..54.0));
        let shot_type = match rng.gen_range(0..20) {
            0 => ShotType::Penalty,
            1..=4 => ShotType::Header,
            5..=6 => ShotType::Volley,
            _ => ShotType::Foot,
        };
        let mut tags = Vec::new();
        if rng.gen_bool(0.25) {
            tags.push(EventTag::FirstTime);
        }
        if rng.gen_bool(0.12) {
            tags.push(EventTag::CounterAttack);
        }
        let location = if shot_type == ShotType::Penalty {
            PitchPoint::new(94.0, 34.0)
        } else {
            at
        };
        out.push(Event {
            minute: rng.gen_range(1..=94),
            team: team.to_string(),
            kind: EventKind::Shot,
            player: Some(player_name(team, rng.gen_range(6..11))),
            outcome: rng.gen_bool(0.1),
            location,
            end: None,
            value: None,
            shot: Some(ShotDetail {
                shot_type,
                pressure: if shot_type == ShotType::Penalty {
                    0.0
                } else {
                    f64::from(rng.gen_range(0..4u8))
                },
                distance: None,
                angle: None,
            }),
            tags,
        });
    }

    for kind in [
        EventKind::Tackle,
        EventKind::Interception,
        EventKind::Foul,
        EventKind::Pressure,
    ] {
        for _ in 0..rng.gen_range(5..18) {
            out.push(Event {
                minute: rng.gen_range(0..=93),
                team: team.to_string(),
                kind,
                player: Some(player_name(team, rng.gen_range(1..8))),
                outcome: rng.gen_bool(0.6),
                location: PitchPoint::new(rng.gen_range(5.0..80.0), rng.gen_range(2.0..66.0)),
                end: None,
                value: None,
                shot: None,
                tags: Vec::new(),
            });
        }
    }
    out
}

fn count_kind(events: &[Event], team: &str, kind: EventKind) -> f64 {
    events
        .iter()
        .filter(|e| e.kind == kind && e.is_team(team))
        .count() as f64
}

fn mock_team_stats(rng: &mut StdRng, team: &str, events: &[Event], opponent: &str) -> TeamMatchStats {
    let completed = |t: &str| {
        events
            .iter()
            .filter(|e| e.kind == EventKind::Pass && e.outcome && e.is_team(t))
            .count() as f64
    };
    let own_passes = completed(team) * 5.0;
    let opp_passes = completed(opponent) * 5.0;

    let mut stats = StatLine::from([
        ("passes_completed", own_passes),
        ("opponent_passes", opp_passes),
        ("tackles", count_kind(events, team, EventKind::Tackle)),
        ("interceptions", count_kind(events, team, EventKind::Interception)),
        ("fouls", count_kind(events, team, EventKind::Foul)),
        ("shots", count_kind(events, team, EventKind::Shot)),
        (
            "possession",
            (100.0 * own_passes / (own_passes + opp_passes).max(1.0)).round(),
        ),
    ]);
    for key in OPAQUE_FIELDS {
        stats.set(key, (rng.gen_range(0.0..10.0_f64) * 10.0).round() / 10.0);
    }

    let final_third = rng.gen_range(18.0..42.0);
    let defensive_third = rng.gen_range(15.0..35.0);
    let zones = ZoneShares {
        defensive_third,
        middle_third: (100.0 - final_third - defensive_third).max(0.0),
        final_third,
    };
    let touches = ZoneTouches {
        defensive_third: rng.gen_range(80.0..180.0),
        middle_third: rng.gen_range(150.0..260.0),
        final_third: rng.gen_range(60.0..150.0),
        penalty_box: rng.gen_range(10.0..40.0),
    };

    TeamMatchStats {
        name: team.to_string(),
        stats,
        zones,
        touches,
    }
}

fn mock_players(rng: &mut StdRng, team: &str) -> Vec<PlayerMatchStats> {
    SHAPE
        .iter()
        .enumerate()
        .map(|(idx, (position, x, y))| {
            let minutes = if rng.gen_bool(0.8) {
                90.0
            } else {
                f64::from(rng.gen_range(55..90u8))
            };
            let mut stats = StatLine::from([
                ("passes", f64::from(rng.gen_range(15..75u8))),
                ("touches", f64::from(rng.gen_range(25..95u8))),
                ("duels_won", f64::from(rng.gen_range(0..9u8))),
                ("tackles", f64::from(rng.gen_range(0..6u8))),
                ("interceptions", f64::from(rng.gen_range(0..5u8))),
                ("key_passes", f64::from(rng.gen_range(0..4u8))),
                ("progressive_passes", f64::from(rng.gen_range(0..8u8))),
            ]);
            match position.group() {
                crate::types::PositionGroup::Goalkeeper => {
                    stats.set("saves", f64::from(rng.gen_range(0..7u8)));
                    stats.set("save_percentage", f64::from(rng.gen_range(50..100u8)));
                    stats.set("goals_conceded", f64::from(rng.gen_range(0..3u8)));
                }
                crate::types::PositionGroup::Defender => {
                    stats.set("clearances", f64::from(rng.gen_range(0..9u8)));
                    stats.set("blocks", f64::from(rng.gen_range(0..3u8)));
                    stats.set("aerials_won", f64::from(rng.gen_range(0..6u8)));
                }
                crate::types::PositionGroup::Midfielder => {
                    stats.set("xa", (rng.gen_range(0.0..0.5_f64) * 100.0).round() / 100.0);
                }
                crate::types::PositionGroup::Attacker => {
                    stats.set("shots_on_target", f64::from(rng.gen_range(0..4u8)));
                    stats.set("dribbles", f64::from(rng.gen_range(0..6u8)));
                    stats.set("xg", (rng.gen_range(0.0..0.9_f64) * 100.0).round() / 100.0);
                    if rng.gen_bool(0.25) {
                        stats.set("goals", 1.0);
                    }
                    if rng.gen_bool(0.2) {
                        stats.set("assists", 1.0);
                    }
                }
            }
            let age = f64::from(rng.gen_range(19..35u8));
            PlayerMatchStats {
                name: player_name(team, idx),
                team: team.to_string(),
                position: *position,
                minutes,
                stats,
                workload: Some(Workload {
                    load_score: rng.gen_range(20.0..85.0),
                    fatigue_index: rng.gen_range(10.0..80.0),
                    injuries_last_12_months: rng.gen_range(0..3),
                    games_played: rng.gen_range(18..48),
                    age,
                }),
                market_value: Some(f64::from(rng.gen_range(2..90u8))),
                average_position: Some(jitter(rng, PitchPoint::new(*x, *y), 9.0)),
            }
        })
        .collect()
}

fn mock_combinations(rng: &mut StdRng, team: &str) -> Vec<PassCombination> {
    let mut out = Vec::new();
    for a in 1..SHAPE.len() {
        for b in 1..SHAPE.len() {
            if a == b || rng.gen_bool(0.45) {
                continue;
            }
            out.push(PassCombination {
                passer: player_name(team, a),
                receiver: player_name(team, b),
                count: rng.gen_range(1..16),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        assert_eq!(mock_dataset(11, 3), mock_dataset(11, 3));
        assert_ne!(mock_dataset(11, 2), mock_dataset(12, 2));
    }

    #[test]
    fn mock_matches_are_complete() {
        let dataset = mock_dataset(3, 2);
        assert_eq!(dataset.matches.len(), 2);
        for m in &dataset.matches {
            assert_eq!(m.players.len(), 22);
            assert_eq!(m.players_for(&m.home.name).count(), 11);
            assert!(m.events.iter().any(|e| e.kind == EventKind::Shot && e.is_team(&m.away.name)));
            assert!(m.events.windows(2).all(|w| w[0].minute <= w[1].minute));
            assert_eq!(m.formation.home.len(), 11);
            assert!(!m.pass_combinations.away.is_empty());
            assert!(m.home.stats.contains("sustained_threat_index"));
        }
    }
}

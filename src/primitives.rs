use serde::{Deserialize, Serialize};

use crate::types::{round_dp, Event, EventKind, PitchZone, StatLine, ZoneShares, ZoneTouches};

const PROGRESSIVE_MIN_GAIN: f64 = 10.0;

const ZONE_VALUE_DEFENSIVE: f64 = 0.005;
const ZONE_VALUE_MIDDLE: f64 = 0.02;
const ZONE_VALUE_FINAL: f64 = 0.06;
const ZONE_VALUE_BOX: f64 = 0.15;

/// Passes allowed per defensive action.
///
/// Reads `opponent_passes`, `tackles`, `interceptions` and `fouls` from the
/// stat line. The denominator is floored at 1 so a team with no defensive
/// actions gets the raw opponent pass count back.
pub fn ppda(stats: &StatLine) -> f64 {
    let opponent_passes = stats.get("opponent_passes").max(0.0);
    let actions = stats.get("tackles") + stats.get("interceptions") + stats.get("fouls");
    round_dp(opponent_passes / actions.max(1.0), 2)
}

/// PPDA when the opponent pass count lives on the opponent's own stat line.
pub fn ppda_against(team: &StatLine, opponent: &StatLine) -> f64 {
    let mut line = team.clone();
    if !line.contains("opponent_passes") {
        let passes = opponent
            .get_opt("passes_completed")
            .or_else(|| opponent.get_opt("accurate_passes"))
            .unwrap_or_else(|| opponent.get("passes"));
        line.set("opponent_passes", passes);
    }
    ppda(&line)
}

/// Territorial dominance from zone occupancy shares. Not normalised to 0-100.
pub fn field_tilt(zones: &ZoneShares) -> f64 {
    let tilt = zones.final_third * 1.0 + zones.middle_third * 0.5 + zones.defensive_third * 0.1;
    round_dp(tilt, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PossessionValue {
    pub defensive_third: f64,
    pub middle_third: f64,
    pub final_third: f64,
    pub penalty_box: f64,
    pub total: f64,
}

pub fn zone_value(zone: PitchZone) -> f64 {
    match zone {
        PitchZone::DefensiveThird => ZONE_VALUE_DEFENSIVE,
        PitchZone::MiddleThird => ZONE_VALUE_MIDDLE,
        PitchZone::FinalThird => ZONE_VALUE_FINAL,
        PitchZone::PenaltyBox => ZONE_VALUE_BOX,
    }
}

pub fn possession_value_by_zone(touches: &ZoneTouches) -> PossessionValue {
    let d = touches.defensive_third.max(0.0) * ZONE_VALUE_DEFENSIVE;
    let m = touches.middle_third.max(0.0) * ZONE_VALUE_MIDDLE;
    let f = touches.final_third.max(0.0) * ZONE_VALUE_FINAL;
    let b = touches.penalty_box.max(0.0) * ZONE_VALUE_BOX;
    PossessionValue {
        defensive_third: round_dp(d, 3),
        middle_third: round_dp(m, 3),
        final_third: round_dp(f, 3),
        penalty_box: round_dp(b, 3),
        total: round_dp(d + m + f + b, 3),
    }
}

/// Zone touch counts from a team's on-ball events (passes, carries, shots).
pub fn touches_from_events(events: &[Event], team: &str) -> ZoneTouches {
    let mut out = ZoneTouches::default();
    for ev in events.iter().filter(|e| e.is_team(team)) {
        if !matches!(ev.kind, EventKind::Pass | EventKind::Carry | EventKind::Shot) {
            continue;
        }
        match ev.location.zone() {
            PitchZone::DefensiveThird => out.defensive_third += 1.0,
            PitchZone::MiddleThird => out.middle_third += 1.0,
            PitchZone::FinalThird => out.final_third += 1.0,
            PitchZone::PenaltyBox => out.penalty_box += 1.0,
        }
    }
    out
}

pub fn is_progressive(event: &Event) -> bool {
    if !matches!(event.kind, EventKind::Pass | EventKind::Carry) {
        return false;
    }
    let Some(end) = event.end else {
        return false;
    };
    let start = event.location;
    if end.x - start.x >= PROGRESSIVE_MIN_GAIN {
        return true;
    }
    !start.in_final_third() && end.in_final_third()
}

pub fn progressive_actions(events: &[Event], team: &str) -> usize {
    events
        .iter()
        .filter(|e| e.is_team(team))
        .filter(|e| is_progressive(e))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PitchPoint;

    fn action(kind: EventKind, from: (f64, f64), to: (f64, f64)) -> Event {
        Event {
            minute: 10,
            team: "Home".to_string(),
            kind,
            player: None,
            outcome: true,
            location: PitchPoint::new(from.0, from.1),
            end: Some(PitchPoint::new(to.0, to.1)),
            value: None,
            shot: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn ppda_matches_reference_example() {
        let stats = StatLine::from([
            ("opponent_passes", 501.0),
            ("tackles", 10.0),
            ("interceptions", 5.0),
            ("fouls", 3.0),
        ]);
        assert_eq!(ppda(&stats), 27.83);
    }

    #[test]
    fn ppda_floors_denominator() {
        let stats = StatLine::from([("opponent_passes", 312.0)]);
        assert_eq!(ppda(&stats), 312.0);
        assert_eq!(ppda(&StatLine::new()), 0.0);
    }

    #[test]
    fn ppda_against_reads_opponent_line() {
        let home = StatLine::from([("tackles", 6.0), ("interceptions", 4.0)]);
        let away = StatLine::from([("passes_completed", 400.0), ("passes", 480.0)]);
        assert_eq!(ppda_against(&home, &away), 40.0);
    }

    #[test]
    fn ppda_against_falls_back_through_pass_counts() {
        let home = StatLine::from([("tackles", 6.0), ("interceptions", 4.0)]);
        let accurate = StatLine::from([("accurate_passes", 350.0), ("passes", 480.0)]);
        assert_eq!(ppda_against(&home, &accurate), 35.0);
        let raw = StatLine::from([("passes", 480.0)]);
        assert_eq!(ppda_against(&home, &raw), 48.0);
        let own = home.clone().with("opponent_passes", 100.0);
        assert_eq!(ppda_against(&own, &raw), 10.0);
    }

    #[test]
    fn ppda_stays_finite_for_huge_counts() {
        let stats = StatLine::from([("opponent_passes", 1e307)]);
        let v = ppda(&stats);
        assert!(v.is_finite());
        assert_eq!(v, 1e307);
    }

    #[test]
    fn field_tilt_weights_thirds() {
        let zones = ZoneShares {
            defensive_third: 20.0,
            middle_third: 45.0,
            final_third: 35.0,
        };
        assert_eq!(field_tilt(&zones), 59.5);
    }

    #[test]
    fn possession_value_sums_zones() {
        let pv = possession_value_by_zone(&ZoneTouches {
            defensive_third: 100.0,
            middle_third: 200.0,
            final_third: 50.0,
            penalty_box: 10.0,
        });
        assert_eq!(pv.total, 0.5 + 4.0 + 3.0 + 1.5);
    }

    #[test]
    fn progressive_threshold_and_third_entry() {
        let long = action(EventKind::Pass, (20.0, 30.0), (31.0, 30.0));
        let short_entry = action(EventKind::Carry, (66.0, 30.0), (71.0, 30.0));
        let short = action(EventKind::Pass, (40.0, 30.0), (45.0, 10.0));
        let tackle = action(EventKind::Tackle, (10.0, 30.0), (40.0, 30.0));
        assert!(is_progressive(&long));
        assert!(is_progressive(&short_entry));
        assert!(!is_progressive(&short));
        assert!(!is_progressive(&tackle));
        let both = action(EventKind::Pass, (50.0, 30.0), (80.0, 30.0));
        assert_eq!(progressive_actions(&[long, short_entry, short, tackle, both], "home"), 3);
    }
}

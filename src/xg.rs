//! Heuristic shot model: expected goals, expected assists and the cumulative
//! xG timeline used by the dashboard chart.
//!
//! Not a calibrated statistical model. Factors multiply and the per-shot value
//! is clamped to `[XG_MIN, XG_MAX]` before any summation.

use serde::{Deserialize, Serialize};

use crate::types::{
    round_dp, Event, EventKind, EventTag, PitchPoint, ShotType, PITCH_LENGTH,
    PITCH_WIDTH,
};

pub const XG_MIN: f64 = 0.01;
pub const XG_MAX: f64 = 0.99;

const DISTANCE_SCALE: f64 = 35.0;
const FACTOR_FLOOR: f64 = 0.1;
const PRESSURE_FLOOR: f64 = 0.7;
const PASS_DIFFICULTY_LENGTH: f64 = 30.0;

pub const GOAL_CENTRE: PitchPoint = PitchPoint {
    x: PITCH_LENGTH,
    y: PITCH_WIDTH / 2.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShotContext {
    /// Metres from goal centre.
    pub distance: f64,
    /// Radians off the goal-centre line.
    pub angle: f64,
    pub shot_type: ShotType,
    pub first_time: bool,
    pub through_ball: bool,
    pub counter_attack: bool,
    pub pressure: f64,
}

impl ShotContext {
    pub fn from_location(at: PitchPoint) -> Self {
        let (distance, angle) = shot_geometry(at);
        Self {
            distance,
            angle,
            ..Default::default()
        }
    }

    pub fn from_event(event: &Event) -> Self {
        let detail = event.shot.unwrap_or_default();
        let (geo_distance, geo_angle) = shot_geometry(event.location);
        let distance = detail
            .distance
            .or(event.value)
            .unwrap_or(geo_distance);
        Self {
            distance,
            angle: detail.angle.unwrap_or(geo_angle),
            shot_type: detail.shot_type,
            first_time: event.has_tag(EventTag::FirstTime),
            through_ball: event.has_tag(EventTag::ThroughBall),
            counter_attack: event.has_tag(EventTag::CounterAttack),
            pressure: detail.pressure,
        }
    }
}

/// Distance (m) and off-centre angle (rad) from a location to the goal centre.
pub fn shot_geometry(at: PitchPoint) -> (f64, f64) {
    let dx = (GOAL_CENTRE.x - at.x).max(0.0);
    let dy = (GOAL_CENTRE.y - at.y).abs();
    (dx.hypot(dy), dy.atan2(dx))
}

pub fn shot_type_multiplier(shot_type: ShotType) -> f64 {
    match shot_type {
        ShotType::Header => 0.8,
        ShotType::Foot => 1.0,
        ShotType::Volley => 1.2,
        ShotType::Penalty => 0.76,
    }
}

pub fn shot_xg(shot: &ShotContext) -> f64 {
    let distance = if shot.distance.is_finite() {
        shot.distance.max(0.0)
    } else {
        DISTANCE_SCALE
    };
    let angle = if shot.angle.is_finite() { shot.angle } else { 0.0 };

    let distance_factor = (1.0 - distance / DISTANCE_SCALE).max(FACTOR_FLOOR);
    let angle_factor = angle.cos().max(FACTOR_FLOOR);
    let mut xg = distance_factor * angle_factor * shot_type_multiplier(shot.shot_type);

    if shot.first_time {
        xg *= 1.1;
    }
    if shot.through_ball {
        xg *= 1.15;
    }
    if shot.counter_attack {
        xg *= 1.05;
    }
    let pressure = if shot.pressure.is_finite() {
        shot.pressure.max(0.0)
    } else {
        0.0
    };
    xg *= (1.0 - pressure * 0.1).max(PRESSURE_FLOOR);

    xg.clamp(XG_MIN, XG_MAX)
}

/// Sum of clamped per-shot values, rounded to three decimals.
pub fn expected_goals(shots: &[ShotContext]) -> f64 {
    round_dp(shots.iter().map(shot_xg).sum(), 3)
}

pub fn team_shots(events: &[Event], team: &str) -> Vec<ShotContext> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Shot && e.is_team(team))
        .map(ShotContext::from_event)
        .collect()
}

pub fn team_expected_goals(events: &[Event], team: &str) -> f64 {
    expected_goals(&team_shots(events, team))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPass {
    /// Where the receiver takes the ball.
    pub end: PitchPoint,
    pub length: f64,
}

impl KeyPass {
    pub fn from_event(event: &Event) -> Option<Self> {
        let end = event.end?;
        let length = event
            .value
            .unwrap_or_else(|| event.location.distance_to(end));
        Some(Self { end, length })
    }
}

pub fn pass_difficulty(length: f64) -> f64 {
    if !length.is_finite() || length <= 0.0 {
        return 0.0;
    }
    (length / PASS_DIFFICULTY_LENGTH).min(1.0)
}

pub fn key_pass_xa(pass: &KeyPass) -> f64 {
    let implied = shot_xg(&ShotContext::from_location(pass.end));
    implied * (1.0 - pass_difficulty(pass.length) * 0.3)
}

pub fn expected_assists(passes: &[KeyPass]) -> f64 {
    round_dp(passes.iter().map(key_pass_xa).sum(), 3)
}

pub fn team_key_passes(events: &[Event], team: &str) -> Vec<KeyPass> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Pass && e.is_team(team) && e.has_tag(EventTag::KeyPass))
        .filter_map(KeyPass::from_event)
        .collect()
}

pub fn team_expected_assists(events: &[Event], team: &str) -> f64 {
    expected_assists(&team_key_passes(events, team))
}

fn key_passes_by(events: &[Event], player: &str, team: Option<&str>) -> Vec<KeyPass> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::Pass && e.has_tag(EventTag::KeyPass))
        .filter(|e| team.is_none_or(|t| e.is_team(t)))
        .filter(|e| {
            e.player
                .as_deref()
                .is_some_and(|p| p.trim().eq_ignore_ascii_case(player.trim()))
        })
        .filter_map(KeyPass::from_event)
        .collect()
}

/// xA for every key pass credited to `player`, whichever team made it.
pub fn player_expected_assists(events: &[Event], player: &str) -> f64 {
    expected_assists(&key_passes_by(events, player, None))
}

/// xA for `player` counting only key passes made for `team`.
pub fn team_player_expected_assists(events: &[Event], team: &str, player: &str) -> f64 {
    expected_assists(&key_passes_by(events, player, Some(team)))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub minute: u16,
    pub home: f64,
    pub away: f64,
}

/// Cumulative xG per minute from kick-off through `until`. Later shots land on `until`.
pub fn xg_timeline(events: &[Event], home: &str, away: &str, until: u16) -> Vec<TimelinePoint> {
    let mut per_minute_home = vec![0.0; usize::from(until) + 1];
    let mut per_minute_away = vec![0.0; usize::from(until) + 1];

    for ev in events.iter().filter(|e| e.kind == EventKind::Shot) {
        let idx = usize::from(ev.minute.min(until));
        let xg = shot_xg(&ShotContext::from_event(ev));
        if ev.is_team(home) {
            per_minute_home[idx] += xg;
        } else if ev.is_team(away) {
            per_minute_away[idx] += xg;
        }
    }

    let mut out = Vec::with_capacity(per_minute_home.len());
    let (mut h, mut a) = (0.0, 0.0);
    for (minute, (dh, da)) in per_minute_home.iter().zip(&per_minute_away).enumerate() {
        h += dh;
        a += da;
        out.push(TimelinePoint {
            minute: minute as u16,
            home: round_dp(h, 3),
            away: round_dp(a, 3),
        });
    }
    out
}

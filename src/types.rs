use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PITCH_LENGTH: f64 = 105.0;
pub const PITCH_WIDTH: f64 = 68.0;
/// x coordinate where the attacking (final) third starts.
pub const FINAL_THIRD_X: f64 = 70.0;
pub const MIDDLE_THIRD_X: f64 = 35.0;
pub const PENALTY_BOX_X: f64 = 88.5;
pub const PENALTY_BOX_HALF_WIDTH: f64 = 20.16;
pub const MAX_MINUTE: u16 = 120;

/// Location in metres on a 105x68 pitch, attacking towards x = 105.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PitchPoint {
    pub x: f64,
    pub y: f64,
}

impl PitchPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: PitchPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn in_final_third(&self) -> bool {
        self.x >= FINAL_THIRD_X
    }

    pub fn in_penalty_box(&self) -> bool {
        self.x >= PENALTY_BOX_X && (self.y - PITCH_WIDTH / 2.0).abs() <= PENALTY_BOX_HALF_WIDTH
    }

    pub fn zone(&self) -> PitchZone {
        if self.in_penalty_box() {
            PitchZone::PenaltyBox
        } else if self.x >= FINAL_THIRD_X {
            PitchZone::FinalThird
        } else if self.x >= MIDDLE_THIRD_X {
            PitchZone::MiddleThird
        } else {
            PitchZone::DefensiveThird
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchZone {
    DefensiveThird,
    MiddleThird,
    FinalThird,
    PenaltyBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Shot,
    Pass,
    Carry,
    Tackle,
    Interception,
    Pressure,
    Foul,
    Clearance,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTag {
    FirstTime,
    ThroughBall,
    CounterAttack,
    KeyPass,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    Header,
    #[default]
    Foot,
    Volley,
    Penalty,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotDetail {
    #[serde(default)]
    pub shot_type: ShotType,
    /// Number of defenders closing the shooter down.
    #[serde(default)]
    pub pressure: f64,
    /// Overrides the distance derived from the event location.
    #[serde(default)]
    pub distance: Option<f64>,
    /// Overrides the angle (radians off the goal-centre line).
    #[serde(default)]
    pub angle: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub minute: u16,
    pub team: String,
    pub kind: EventKind,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub outcome: bool,
    #[serde(default)]
    pub location: PitchPoint,
    #[serde(default)]
    pub end: Option<PitchPoint>,
    /// Shot distance, pass length, ... depending on `kind`.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub shot: Option<ShotDetail>,
    #[serde(default)]
    pub tags: Vec<EventTag>,
}

impl Event {
    pub fn has_tag(&self, tag: EventTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_team(&self, team: &str) -> bool {
        self.team.trim().eq_ignore_ascii_case(team.trim())
    }
}

/// Named numeric counters. Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StatLine(BTreeMap<String, f64>);

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> f64 {
        self.0.get(&normalize_key(key)).copied().unwrap_or(0.0)
    }

    pub fn get_opt(&self, key: &str) -> Option<f64> {
        self.0.get(&normalize_key(key)).copied()
    }

    pub fn set(&mut self, key: &str, value: f64) {
        if value.is_finite() {
            self.0.insert(normalize_key(key), value);
        }
    }

    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'de> Deserialize<'de> for StatLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
        let mut line = StatLine::new();
        for (key, value) in raw {
            if let Some(v) = stat_value(&value) {
                line.set(&key, v);
            }
        }
        Ok(line)
    }
}

impl<const N: usize> From<[(&str, f64); N]> for StatLine {
    fn from(pairs: [(&str, f64); N]) -> Self {
        let mut line = StatLine::new();
        for (k, v) in pairs {
            line.set(k, v);
        }
        line
    }
}

/// "Shots on Target" -> "shots_on_target".
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_us = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            prev_us = false;
        } else if !prev_us && !out.is_empty() {
            out.push('_');
            prev_us = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn stat_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_stat_cell(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Parses display cells such as `"58%"`, `"1,204"` or `"-"`.
pub fn parse_stat_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.trim_end_matches('%').replace(',', "");
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Goalkeeper,
    CentreBack,
    FullBack,
    DefensiveMidfielder,
    #[default]
    CentralMidfielder,
    AttackingMidfielder,
    Winger,
    Striker,
}

impl Position {
    pub fn from_tag(raw: &str) -> Option<Position> {
        let s = raw.trim().to_ascii_lowercase();
        let pos = match s.as_str() {
            "gk" | "goalkeeper" | "keeper" => Position::Goalkeeper,
            "cb" | "centre-back" | "center-back" | "centre back" | "center back" | "sw" => {
                Position::CentreBack
            }
            "lb" | "rb" | "fb" | "lwb" | "rwb" | "wb" | "full-back" | "fullback" | "wing-back" => {
                Position::FullBack
            }
            "dm" | "cdm" | "dmf" => Position::DefensiveMidfielder,
            "cm" | "lcm" | "rcm" | "mf" | "midfielder" => Position::CentralMidfielder,
            "am" | "cam" | "amf" | "lm" | "rm" => Position::AttackingMidfielder,
            "lw" | "rw" | "w" | "winger" => Position::Winger,
            "st" | "cf" | "fw" | "ss" | "striker" | "forward" => Position::Striker,
            _ if s.contains("keeper") => Position::Goalkeeper,
            _ if s.contains("back") || s.contains("defender") => Position::CentreBack,
            _ if s.contains("wing") => Position::Winger,
            _ if s.contains("midfield") => Position::CentralMidfielder,
            _ if s.contains("forward") || s.contains("striker") || s.contains("attack") => {
                Position::Striker
            }
            _ => return None,
        };
        Some(pos)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::CentreBack => "CB",
            Position::FullBack => "FB",
            Position::DefensiveMidfielder => "DM",
            Position::CentralMidfielder => "CM",
            Position::AttackingMidfielder => "AM",
            Position::Winger => "W",
            Position::Striker => "ST",
        }
    }

    pub fn group(self) -> PositionGroup {
        match self {
            Position::Goalkeeper => PositionGroup::Goalkeeper,
            Position::CentreBack | Position::FullBack => PositionGroup::Defender,
            Position::DefensiveMidfielder
            | Position::CentralMidfielder
            | Position::AttackingMidfielder => PositionGroup::Midfielder,
            Position::Winger | Position::Striker => PositionGroup::Attacker,
        }
    }
}

impl From<String> for Position {
    fn from(raw: String) -> Self {
        Position::from_tag(&raw).unwrap_or_default()
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> Self {
        pos.tag().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneShares {
    #[serde(default)]
    pub defensive_third: f64,
    #[serde(default)]
    pub middle_third: f64,
    #[serde(default)]
    pub final_third: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneTouches {
    #[serde(default)]
    pub defensive_third: f64,
    #[serde(default)]
    pub middle_third: f64,
    #[serde(default)]
    pub final_third: f64,
    #[serde(default)]
    pub penalty_box: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamMatchStats {
    pub name: String,
    #[serde(default)]
    pub stats: StatLine,
    #[serde(default)]
    pub zones: ZoneShares,
    #[serde(default)]
    pub touches: ZoneTouches,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Workload {
    #[serde(default)]
    pub load_score: f64,
    #[serde(default)]
    pub fatigue_index: f64,
    #[serde(default)]
    pub injuries_last_12_months: u32,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub age: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerMatchStats {
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub minutes: f64,
    #[serde(default)]
    pub stats: StatLine,
    #[serde(default)]
    pub workload: Option<Workload>,
    /// Current market value in millions.
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub average_position: Option<PitchPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassCombination {
    pub passer: String,
    pub receiver: String,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationSlot {
    pub player: String,
    pub x: f64,
    pub y: f64,
}

pub(crate) fn round_dp(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_dp_leaves_unscalable_values_alone() {
        assert_eq!(round_dp(27.8333, 2), 27.83);
        assert_eq!(round_dp(1e307, 2), 1e307);
        assert_eq!(round_dp(-1e307, 3), -1e307);
    }

    #[test]
    fn stat_line_missing_key_reads_zero() {
        let line = StatLine::from([("tackles", 12.0)]);
        assert_eq!(line.get("tackles"), 12.0);
        assert_eq!(line.get("interceptions"), 0.0);
        assert_eq!(line.get("Tackles"), 12.0);
    }

    #[test]
    fn stat_line_parses_display_cells() {
        let line: StatLine = serde_json::from_str(
            r#"{"Possession": "58%", "Passes": "1,204", "xG": 1.72, "Fouls": "-", "Notes": null}"#,
        )
        .unwrap();
        assert_eq!(line.get("possession"), 58.0);
        assert_eq!(line.get("passes"), 1204.0);
        assert_eq!(line.get("xg"), 1.72);
        assert!(!line.contains("fouls"));
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn normalize_key_compacts() {
        assert_eq!(normalize_key(" Shots on Target "), "shots_on_target");
        assert_eq!(normalize_key("save%"), "save");
        assert_eq!(normalize_key("key-passes"), "key_passes");
    }

    #[test]
    fn position_tags_map_to_groups() {
        assert_eq!(Position::from_tag("RW").map(Position::group), Some(PositionGroup::Attacker));
        assert_eq!(Position::from_tag("lb").map(Position::group), Some(PositionGroup::Defender));
        assert_eq!(
            Position::from_tag("Defensive Midfielder").map(Position::group),
            Some(PositionGroup::Midfielder)
        );
        assert_eq!(Position::from_tag("GK"), Some(Position::Goalkeeper));
        assert!(Position::from_tag("coach").is_none());
    }

    #[test]
    fn unknown_position_deserializes_to_default() {
        let p: PlayerMatchStats =
            serde_json::from_str(r#"{"name": "X", "position": "???"}"#).unwrap();
        assert_eq!(p.position, Position::CentralMidfielder);
        assert_eq!(p.minutes, 0.0);
    }

    #[test]
    fn pitch_zones() {
        assert_eq!(PitchPoint::new(10.0, 34.0).zone(), PitchZone::DefensiveThird);
        assert_eq!(PitchPoint::new(50.0, 34.0).zone(), PitchZone::MiddleThird);
        assert_eq!(PitchPoint::new(80.0, 5.0).zone(), PitchZone::FinalThird);
        assert_eq!(PitchPoint::new(95.0, 30.0).zone(), PitchZone::PenaltyBox);
    }
}

use serde::{Deserialize, Serialize};

use crate::types::{round_dp, PlayerMatchStats, Position, PositionGroup, StatLine};

pub const IMPACT_CEILING: f64 = 10.0;

/// Rate stats rescaled to per-90 before weighting.
pub const PER90_STATS: [&str; 3] = ["passes", "touches", "duels_won"];

const GOALKEEPER_WEIGHTS: &[(&str, f64)] = &[
    ("saves", 0.45),
    ("save_percentage", 0.02),
    ("passes", 0.01),
    ("claims", 0.2),
    ("sweeper_actions", 0.15),
    ("goals_conceded", -0.4),
    ("errors_leading_to_goal", -1.0),
];

const DEFENDER_WEIGHTS: &[(&str, f64)] = &[
    ("tackles", 0.3),
    ("interceptions", 0.3),
    ("clearances", 0.15),
    ("blocks", 0.25),
    ("duels_won", 0.08),
    ("aerials_won", 0.1),
    ("passes", 0.012),
    ("progressive_passes", 0.1),
    ("errors_leading_to_goal", -1.0),
];

const MIDFIELDER_WEIGHTS: &[(&str, f64)] = &[
    ("passes", 0.015),
    ("touches", 0.006),
    ("key_passes", 0.4),
    ("progressive_passes", 0.15),
    ("tackles", 0.2),
    ("interceptions", 0.2),
    ("duels_won", 0.05),
    ("xa", 1.0),
];

const ATTACKER_WEIGHTS: &[(&str, f64)] = &[
    ("shots_on_target", 0.35),
    ("key_passes", 0.3),
    ("dribbles", 0.25),
    ("touches", 0.008),
    ("duels_won", 0.04),
    ("xg", 1.0),
    ("xa", 0.8),
];

const GOALKEEPER_BONUS: &[(&str, f64)] = &[("clean_sheets", 1.0), ("penalties_saved", 2.0)];
const DEFENDER_BONUS: &[(&str, f64)] = &[("goals", 1.5), ("clean_sheets", 1.0)];
const MIDFIELDER_BONUS: &[(&str, f64)] = &[("goals", 1.5), ("assists", 1.2)];
const ATTACKER_BONUS: &[(&str, f64)] = &[("goals", 2.0), ("assists", 1.5)];

pub fn weight_table(group: PositionGroup) -> &'static [(&'static str, f64)] {
    match group {
        PositionGroup::Goalkeeper => GOALKEEPER_WEIGHTS,
        PositionGroup::Defender => DEFENDER_WEIGHTS,
        PositionGroup::Midfielder => MIDFIELDER_WEIGHTS,
        PositionGroup::Attacker => ATTACKER_WEIGHTS,
    }
}

pub fn bonus_table(group: PositionGroup) -> &'static [(&'static str, f64)] {
    match group {
        PositionGroup::Goalkeeper => GOALKEEPER_BONUS,
        PositionGroup::Defender => DEFENDER_BONUS,
        PositionGroup::Midfielder => MIDFIELDER_BONUS,
        PositionGroup::Attacker => ATTACKER_BONUS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactFactor {
    pub stat: String,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerImpactRow {
    pub player: String,
    pub team: String,
    pub position: Position,
    pub minutes: f64,
    pub score: f64,
    /// Largest absolute contributions first, at most five.
    pub factors: Vec<ImpactFactor>,
}

/// Minutes used for per-90 scaling. A missing (zero) minutes field reads as a
/// full match so raw counts pass through unscaled.
fn effective_minutes(minutes: f64) -> f64 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.max(1.0)
    } else {
        90.0
    }
}

fn stat_input(stats: &StatLine, key: &str, minutes: f64) -> f64 {
    let raw = stats.get(key);
    if PER90_STATS.contains(&key) {
        raw * 90.0 / minutes
    } else {
        raw
    }
}

fn contributions(player: &PlayerMatchStats) -> Vec<ImpactFactor> {
    let group = player.position.group();
    let minutes = effective_minutes(player.minutes);
    let mut out = Vec::new();
    for (key, weight) in weight_table(group) {
        let value = stat_input(&player.stats, key, minutes) * weight;
        if value != 0.0 {
            out.push(ImpactFactor {
                stat: (*key).to_string(),
                contribution: value,
            });
        }
    }
    for (key, weight) in bonus_table(group) {
        let value = player.stats.get(key) * weight;
        if value != 0.0 {
            out.push(ImpactFactor {
                stat: format!("{key}_bonus"),
                contribution: value,
            });
        }
    }
    out
}

/// Position-weighted impact on a 0-10 scale. Saturates at the ceiling.
pub fn player_impact_score(player: &PlayerMatchStats) -> f64 {
    let raw: f64 = contributions(player).iter().map(|f| f.contribution).sum();
    if !raw.is_finite() {
        return if raw > 0.0 { IMPACT_CEILING } else { 0.0 };
    }
    round_dp(raw.clamp(0.0, IMPACT_CEILING), 2)
}

pub fn player_impact_row(player: &PlayerMatchStats) -> PlayerImpactRow {
    let mut factors = contributions(player);
    factors.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));
    factors.truncate(5);
    for f in &mut factors {
        f.contribution = round_dp(f.contribution, 2);
    }
    PlayerImpactRow {
        player: player.name.clone(),
        team: player.team.clone(),
        position: player.position,
        minutes: player.minutes,
        score: player_impact_score(player),
        factors,
    }
}

/// Ranked rows, highest score first; ties keep input order.
pub fn rank_players(players: &[PlayerMatchStats]) -> Vec<PlayerImpactRow> {
    let mut rows: Vec<PlayerImpactRow> = players.iter().map(player_impact_row).collect();
    rows.sort_by(|a, b| b.score.total_cmp(&a.score));
    rows
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamImpactSummary {
    pub players: usize,
    /// Minutes-weighted mean impact.
    pub mean_impact: f64,
    pub top_impact: f64,
}

pub fn team_impact_summary(team: &str, players: &[PlayerMatchStats]) -> TeamImpactSummary {
    let mut total_w = 0.0;
    let mut weighted = 0.0;
    let mut top: f64 = 0.0;
    let mut count = 0usize;

    for p in players
        .iter()
        .filter(|p| p.team.trim().eq_ignore_ascii_case(team.trim()))
    {
        let score = player_impact_score(p);
        let w = (effective_minutes(p.minutes) / 90.0).clamp(0.1, 1.0);
        total_w += w;
        weighted += score * w;
        top = top.max(score);
        count += 1;
    }

    if count == 0 || total_w <= 0.0 {
        return TeamImpactSummary::default();
    }
    TeamImpactSummary {
        players: count,
        mean_impact: round_dp(weighted / total_w, 2),
        top_impact: top,
    }
}

//! Per-match aggregation of every metric into one serialisable report.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::{MatchDataset, MatchRecord};
use crate::injury_risk::{injury_risk, InjuryRisk};
use crate::market_value::{market_value_impact, ValueInputs, ValueProjection};
use crate::player_impact::{rank_players, team_impact_summary, PlayerImpactRow, TeamImpactSummary};
use crate::primitives::{
    field_tilt, possession_value_by_zone, ppda_against, progressive_actions, touches_from_events,
    PossessionValue,
};
use crate::team_shape::{
    chemistry_pairs, coordination_index, defensive_line, formation_discipline,
    CoordinationReport, DefensiveLineReport, DisciplineReport, PairChemistry,
};
use crate::types::{round_dp, Event, EventKind, PlayerMatchStats, TeamMatchStats, ZoneTouches};
use crate::xg::{
    team_expected_assists, team_expected_goals, team_player_expected_assists, team_shots,
    xg_timeline, TimelinePoint,
};

/// Provider fields passed through without interpretation.
pub const OPAQUE_METRICS: [&str; 3] = [
    "sustained_threat_index",
    "transition_exposure",
    "flank_isolation",
];

const TOP_PAIRS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub team: String,
    pub ppda: f64,
    pub field_tilt: f64,
    pub xg: f64,
    pub xa: f64,
    pub shots: usize,
    pub progressive_actions: usize,
    pub possession_value: PossessionValue,
    pub coordination: CoordinationReport,
    pub defensive_line: DefensiveLineReport,
    pub discipline: DisciplineReport,
    pub top_pairs: Vec<PairChemistry>,
    pub impact: TeamImpactSummary,
    pub opaque: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub impact: PlayerImpactRow,
    pub xa: f64,
    pub injury: Option<InjuryRisk>,
    pub value: Option<ValueProjection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: String,
    pub label: String,
    pub final_minute: u16,
    pub home: TeamReport,
    pub away: TeamReport,
    /// Impact order, highest first.
    pub players: Vec<PlayerReport>,
    pub timeline: Vec<TimelinePoint>,
}

impl MatchReport {
    /// Timeline point at `minute`, clamped to the last recorded minute.
    pub fn timeline_at(&self, minute: u16) -> Option<TimelinePoint> {
        let idx = usize::from(minute).min(self.timeline.len().checked_sub(1)?);
        self.timeline.get(idx).copied()
    }
}

/// Completed share of a team's passes, falling back to a provider
/// `pass_accuracy` figure when the feed has no pass events.
pub(crate) fn pass_completion_pct(events: &[Event], team: &TeamMatchStats) -> f64 {
    let (mut attempted, mut completed) = (0usize, 0usize);
    for ev in events
        .iter()
        .filter(|e| e.kind == EventKind::Pass && e.is_team(&team.name))
    {
        attempted += 1;
        if ev.outcome {
            completed += 1;
        }
    }
    if attempted > 0 {
        round_dp(100.0 * completed as f64 / attempted as f64, 1)
    } else {
        team.stats.get("pass_accuracy")
    }
}

fn is_empty_touches(t: &ZoneTouches) -> bool {
    t.defensive_third + t.middle_third + t.final_third + t.penalty_box <= 0.0
}

fn team_report(record: &MatchRecord, home_side: bool) -> TeamReport {
    let (team, opponent) = if home_side {
        (&record.home, &record.away)
    } else {
        (&record.away, &record.home)
    };
    let (combos, line, slots) = if home_side {
        (
            &record.pass_combinations.home,
            &record.defensive_line.home,
            &record.formation.home,
        )
    } else {
        (
            &record.pass_combinations.away,
            &record.defensive_line.away,
            &record.formation.away,
        )
    };

    let touches = if is_empty_touches(&team.touches) {
        touches_from_events(&record.events, &team.name)
    } else {
        team.touches
    };

    let squad: Vec<PlayerMatchStats> = record.players_for(&team.name).cloned().collect();

    let mut top_pairs = chemistry_pairs(combos, pass_completion_pct(&record.events, team));
    top_pairs.truncate(TOP_PAIRS);

    let opaque = OPAQUE_METRICS
        .iter()
        .filter_map(|key| team.stats.get_opt(key).map(|v| ((*key).to_string(), v)))
        .collect();

    TeamReport {
        team: team.name.clone(),
        ppda: ppda_against(&team.stats, &opponent.stats),
        field_tilt: field_tilt(&team.zones),
        xg: team_expected_goals(&record.events, &team.name),
        xa: team_expected_assists(&record.events, &team.name),
        shots: team_shots(&record.events, &team.name).len(),
        progressive_actions: progressive_actions(&record.events, &team.name),
        possession_value: possession_value_by_zone(&touches),
        coordination: coordination_index(combos),
        defensive_line: defensive_line(line),
        discipline: formation_discipline(slots, &squad),
        top_pairs,
        impact: team_impact_summary(&team.name, &squad),
        opaque,
    }
}

fn player_reports(record: &MatchRecord) -> Vec<PlayerReport> {
    let available = f64::from(record.final_minute());
    let rows = rank_players(&record.players);
    rows.into_iter()
        .map(|row| {
            let player = record
                .players
                .iter()
                .find(|p| p.name == row.player && p.team == row.team);
            let injury = player.and_then(|p| p.workload.as_ref()).map(injury_risk);
            let value = player
                .filter(|p| p.market_value.is_some())
                .map(|p| market_value_impact(&ValueInputs::from_player(p, row.score, available)));
            PlayerReport {
                xa: team_player_expected_assists(&record.events, &row.team, &row.player),
                impact: row,
                injury,
                value,
            }
        })
        .collect()
}

pub fn build_match_report(record: &MatchRecord) -> MatchReport {
    let final_minute = record.final_minute();
    MatchReport {
        match_id: record.id.clone(),
        label: record.label(),
        final_minute,
        home: team_report(record, true),
        away: team_report(record, false),
        players: player_reports(record),
        timeline: xg_timeline(
            &record.events,
            &record.home.name,
            &record.away.name,
            final_minute,
        ),
    }
}

/// Reports for every match, in dataset order.
pub fn build_reports(dataset: &MatchDataset) -> Vec<MatchReport> {
    let started = Instant::now();
    let reports: Vec<MatchReport> = dataset.matches.par_iter().map(build_match_report).collect();
    tracing::debug!(
        matches = reports.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "reports built"
    );
    reports
}

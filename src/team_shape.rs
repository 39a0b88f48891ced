use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{round_dp, FormationSlot, PassCombination, PitchPoint, PlayerMatchStats};

const DENSITY_WEIGHT: f64 = 0.6;
const EVENNESS_WEIGHT: f64 = 0.4;
const DISCIPLINE_TOLERANCE_M: f64 = 20.0;
const CHEMISTRY_FULL_VOLUME: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinationReport {
    pub players: usize,
    pub observed_pairs: usize,
    pub density: f64,
    pub evenness: f64,
    /// 0-100.
    pub index: f64,
}

/// Passing-network coordination from a pass-combination table.
///
/// Duplicate (passer, receiver) rows are merged; self-passes and zero counts
/// are ignored.
pub fn coordination_index(combinations: &[PassCombination]) -> CoordinationReport {
    let mut pairs: HashMap<(String, String), u32> = HashMap::new();
    for c in combinations {
        let passer = c.passer.trim();
        let receiver = c.receiver.trim();
        if passer.is_empty() || receiver.is_empty() || passer == receiver || c.count == 0 {
            continue;
        }
        let total = pairs
            .entry((passer.to_string(), receiver.to_string()))
            .or_insert(0);
        *total = total.saturating_add(c.count);
    }

    let players: BTreeSet<&str> = pairs
        .keys()
        .flat_map(|(a, b)| [a.as_str(), b.as_str()])
        .collect();
    let n = players.len();
    let possible = n * n.saturating_sub(1);
    if possible == 0 {
        return CoordinationReport::default();
    }

    let observed = pairs.len();
    let density = observed as f64 / possible as f64;

    let counts: Vec<f64> = pairs.values().map(|c| f64::from(*c)).collect();
    let mean = counts.iter().sum::<f64>() / counts.len() as f64;
    let variance = counts.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / counts.len() as f64;
    let evenness = if mean > 0.0 {
        1.0 - variance / (mean * mean)
    } else {
        0.0
    };

    let index = ((DENSITY_WEIGHT * density + EVENNESS_WEIGHT * evenness) * 100.0).clamp(0.0, 100.0);
    CoordinationReport {
        players: n,
        observed_pairs: observed,
        density: round_dp(density, 3),
        evenness: round_dp(evenness, 3),
        index: round_dp(index, 1),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DefensiveLineReport {
    pub samples: usize,
    pub mean_height: f64,
    pub variance: f64,
    /// `1 / (variance + 1)`; zero when there are no samples.
    pub stability: f64,
}

pub fn defensive_line(samples: &[f64]) -> DefensiveLineReport {
    let values: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if values.is_empty() {
        return DefensiveLineReport::default();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    DefensiveLineReport {
        samples: values.len(),
        mean_height: round_dp(mean, 2),
        variance: round_dp(variance, 3),
        stability: round_dp(1.0 / (variance + 1.0), 3),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisciplineReport {
    pub matched_players: usize,
    pub mean_deviation: f64,
    /// 0-100.
    pub score: f64,
}

/// How closely players' average positions track their assigned formation slots.
/// Players without an average position or a slot are skipped.
pub fn formation_discipline(
    slots: &[FormationSlot],
    players: &[PlayerMatchStats],
) -> DisciplineReport {
    let by_name: HashMap<String, &PlayerMatchStats> = players
        .iter()
        .map(|p| (p.name.trim().to_ascii_lowercase(), p))
        .collect();

    let mut total = 0.0;
    let mut matched = 0usize;
    for slot in slots {
        let Some(player) = by_name.get(&slot.player.trim().to_ascii_lowercase()) else {
            continue;
        };
        let Some(avg) = player.average_position else {
            continue;
        };
        let deviation = avg.distance_to(PitchPoint::new(slot.x, slot.y));
        if deviation.is_finite() {
            total += deviation;
            matched += 1;
        }
    }

    if matched == 0 {
        return DisciplineReport::default();
    }
    let mean = total / matched as f64;
    let score = (100.0 * (1.0 - mean / DISCIPLINE_TOLERANCE_M)).max(0.0);
    DisciplineReport {
        matched_players: matched,
        mean_deviation: round_dp(mean, 2),
        score: round_dp(score, 1),
    }
}

/// Pair chemistry on 0-100 from pass volume, reciprocity and completion rate.
pub fn pass_chemistry(a_to_b: u32, b_to_a: u32, completion_pct: f64) -> f64 {
    let exchanged = f64::from(a_to_b) + f64::from(b_to_a);
    let volume = (exchanged / CHEMISTRY_FULL_VOLUME).min(1.0) * 60.0;
    let hi = a_to_b.max(b_to_a);
    let reciprocity = if hi == 0 {
        0.0
    } else {
        f64::from(a_to_b.min(b_to_a)) / f64::from(hi) * 20.0
    };
    let completion = if completion_pct.is_finite() {
        completion_pct.clamp(0.0, 100.0) / 100.0 * 20.0
    } else {
        0.0
    };
    round_dp((volume + reciprocity + completion).clamp(0.0, 100.0), 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairChemistry {
    pub player_a: String,
    pub player_b: String,
    pub passes: u32,
    pub score: f64,
}

/// Chemistry for every unordered pair present in the table, strongest first.
/// Completion is not part of the table, so `completion_pct` applies to all pairs.
pub fn chemistry_pairs(combinations: &[PassCombination], completion_pct: f64) -> Vec<PairChemistry> {
    let mut directed: HashMap<(String, String), u32> = HashMap::new();
    for c in combinations {
        if c.passer.trim() == c.receiver.trim() {
            continue;
        }
        let total = directed
            .entry((c.passer.trim().to_string(), c.receiver.trim().to_string()))
            .or_insert(0);
        *total = total.saturating_add(c.count);
    }

    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    for (a, b) in directed.keys() {
        let key = if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        };
        seen.insert(key);
    }

    let mut out: Vec<PairChemistry> = seen
        .into_iter()
        .map(|(a, b)| {
            let ab = directed.get(&(a.clone(), b.clone())).copied().unwrap_or(0);
            let ba = directed.get(&(b.clone(), a.clone())).copied().unwrap_or(0);
            PairChemistry {
                score: pass_chemistry(ab, ba, completion_pct),
                passes: ab.saturating_add(ba),
                player_a: a,
                player_b: b,
            }
        })
        .collect();
    out.sort_by(|x, y| y.score.total_cmp(&x.score));
    out
}

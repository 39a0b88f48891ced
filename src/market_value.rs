use serde::{Deserialize, Serialize};

use crate::types::{round_dp, PlayerMatchStats};

const IMPACT_PIVOT: f64 = 6.0;
const IMPACT_WEIGHT: f64 = 4.0;
const CONTRIBUTION_WEIGHT: f64 = 10.0;
const MINUTES_WEIGHT: f64 = 5.0;
const AGE_PIVOT: f64 = 28.0;
const AGE_PENALTY_PER_YEAR: f64 = 2.0;
const MAX_SWING_PCT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueInputs {
    /// Millions.
    pub current_value: f64,
    pub impact_score: f64,
    /// Goals plus assists per 90.
    pub contributions_per90: f64,
    /// Share of available minutes played, 0-1.
    pub minutes_share: f64,
    pub age: f64,
}

impl ValueInputs {
    /// Builds inputs from one match line. `impact_score` comes from the caller
    /// so the same player can be valued on a season average.
    pub fn from_player(player: &PlayerMatchStats, impact_score: f64, available_minutes: f64) -> Self {
        let minutes = player.minutes.max(0.0);
        let per90 = if minutes > 0.0 {
            (player.stats.get("goals") + player.stats.get("assists")) * 90.0 / minutes
        } else {
            0.0
        };
        let share = if available_minutes > 0.0 {
            (minutes / available_minutes).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            current_value: player.market_value.unwrap_or(0.0),
            impact_score,
            contributions_per90: per90,
            minutes_share: share,
            age: player.workload.map(|w| w.age).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueProjection {
    pub delta_pct: f64,
    pub projected_value: f64,
}

pub fn market_value_impact(inputs: &ValueInputs) -> ValueProjection {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    let age_penalty = (finite(inputs.age) - AGE_PIVOT).max(0.0) * AGE_PENALTY_PER_YEAR;
    let delta = (finite(inputs.impact_score) - IMPACT_PIVOT) * IMPACT_WEIGHT
        + finite(inputs.contributions_per90).max(0.0) * CONTRIBUTION_WEIGHT
        + finite(inputs.minutes_share).clamp(0.0, 1.0) * MINUTES_WEIGHT
        - age_penalty;
    let delta = delta.clamp(-MAX_SWING_PCT, MAX_SWING_PCT);
    let current = finite(inputs.current_value).max(0.0);
    ValueProjection {
        delta_pct: round_dp(delta, 1),
        projected_value: round_dp(current * (1.0 + delta / 100.0), 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StatLine, Workload};

    #[test]
    fn pivot_player_holds_value() {
        let p = market_value_impact(&ValueInputs {
            current_value: 40.0,
            impact_score: 6.0,
            contributions_per90: 0.0,
            minutes_share: 0.0,
            age: 24.0,
        });
        assert_eq!(p.delta_pct, 0.0);
        assert_eq!(p.projected_value, 40.0);
    }

    #[test]
    fn swing_is_capped() {
        let up = market_value_impact(&ValueInputs {
            current_value: 10.0,
            impact_score: 10.0,
            contributions_per90: 5.0,
            minutes_share: 1.0,
            age: 20.0,
        });
        assert_eq!(up.delta_pct, 50.0);
        assert_eq!(up.projected_value, 15.0);

        let down = market_value_impact(&ValueInputs {
            current_value: 10.0,
            impact_score: 0.0,
            contributions_per90: 0.0,
            minutes_share: 0.0,
            age: 45.0,
        });
        assert_eq!(down.delta_pct, -50.0);
        assert_eq!(down.projected_value, 5.0);
    }

    #[test]
    fn inputs_from_player_line() {
        let player = PlayerMatchStats {
            name: "P".into(),
            minutes: 45.0,
            stats: StatLine::from([("goals", 1.0)]),
            market_value: Some(20.0),
            workload: Some(Workload {
                age: 30.0,
                ..Default::default()
            }),
            ..Default::default()
        };
        let inputs = ValueInputs::from_player(&player, 7.0, 90.0);
        assert_eq!(inputs.contributions_per90, 2.0);
        assert_eq!(inputs.minutes_share, 0.5);
        let p = market_value_impact(&inputs);
        // 4 + 20 + 2.5 - 4
        assert_eq!(p.delta_pct, 22.5);
    }
}

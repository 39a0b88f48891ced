use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{round_dp, Workload};

const LOAD_WEIGHT: f64 = 0.30;
const FATIGUE_WEIGHT: f64 = 0.30;
const HISTORY_WEIGHT: f64 = 0.25;
const AGE_WEIGHT: f64 = 0.15;

const CONGESTION_GAMES: u32 = 35;
const CONGESTION_POINTS_PER_GAME: f64 = 2.0;
const POINTS_PER_INJURY: f64 = 25.0;
const AGE_THRESHOLD: f64 = 28.0;
const POINTS_PER_YEAR: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            RiskCategory::Low
        } else if score < 50.0 {
            RiskCategory::Medium
        } else if score < 75.0 {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InjuryRisk {
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub load_component: f64,
    pub fatigue_component: f64,
    pub history_component: f64,
    pub age_component: f64,
}

fn unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn injury_risk(workload: &Workload) -> InjuryRisk {
    let congestion = workload.games_played.saturating_sub(CONGESTION_GAMES) as f64
        * CONGESTION_POINTS_PER_GAME;
    let load = unit(workload.load_score + congestion);
    let fatigue = unit(workload.fatigue_index);
    let history = unit(f64::from(workload.injuries_last_12_months) * POINTS_PER_INJURY);
    let age = unit((workload.age - AGE_THRESHOLD) * POINTS_PER_YEAR);

    let score = unit(
        LOAD_WEIGHT * load + FATIGUE_WEIGHT * fatigue + HISTORY_WEIGHT * history + AGE_WEIGHT * age,
    );
    let risk_score = round_dp(score, 1);
    InjuryRisk {
        risk_score,
        risk_category: RiskCategory::from_score(risk_score),
        load_component: load,
        fatigue_component: fatigue,
        history_component: history,
        age_component: age,
    }
}

use serde::{Deserialize, Serialize};

use crate::types::round_dp;

const FORM_WINDOW: usize = 5;
const BASE_SHARE: f64 = 20.0;
const FORM_SPAN: f64 = 50.0;
const DRAW_RAW: f64 = 28.0;

pub const WIN_BOUNDS: (f64, f64) = (10.0, 80.0);
pub const DRAW_BOUNDS: (f64, f64) = (10.0, 50.0);
pub const LOSS_BOUNDS: (f64, f64) = (10.0, 80.0);

const MIN_STRENGTH: f64 = 0.25;
const MAX_STRENGTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "L")]
    Loss,
}

impl FormResult {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(FormResult::Win),
            'D' => Some(FormResult::Draw),
            'L' => Some(FormResult::Loss),
            _ => None,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            FormResult::Win => 3,
            FormResult::Draw => 1,
            FormResult::Loss => 0,
        }
    }
}

/// Parses a form guide like `"WDLWW"` (oldest first). Unknown characters are skipped.
pub fn parse_form(raw: &str) -> Vec<FormResult> {
    raw.chars().filter_map(FormResult::from_char).collect()
}

/// Points from the most recent five results over the points available.
/// No results reads as neutral form (0.5).
pub fn form_ratio(form: &[FormResult]) -> f64 {
    let recent = &form[form.len().saturating_sub(FORM_WINDOW)..];
    if recent.is_empty() {
        return 0.5;
    }
    let points: u32 = recent.iter().map(|r| r.points()).sum();
    f64::from(points) / (3.0 * recent.len() as f64)
}

/// Opponent strength scalar from the opponent's own form: 0.5 (poor) to 1.5 (perfect).
pub fn opponent_strength_from_form(opponent_form: &[FormResult]) -> f64 {
    0.5 + form_ratio(opponent_form)
}

/// Percentages; always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.win + self.draw + self.loss
    }
}

pub fn predict_next_match(form: &[FormResult], opponent_strength: f64) -> OutcomeProbabilities {
    let f = form_ratio(form);
    let s = if opponent_strength.is_finite() {
        clamp(opponent_strength, MIN_STRENGTH, MAX_STRENGTH)
    } else {
        1.0
    };

    let raw = [
        (BASE_SHARE + FORM_SPAN * f) / s,
        DRAW_RAW,
        (BASE_SHARE + FORM_SPAN * (1.0 - f)) * s,
    ];
    let bounds = [WIN_BOUNDS, DRAW_BOUNDS, LOSS_BOUNDS];
    let p = normalize_bounded(raw, bounds);

    let mut out = [round_dp(p[0], 1), round_dp(p[1], 1), round_dp(p[2], 1)];
    // Rounding residue goes to draw first.
    let residue = 100.0 - (out[0] + out[1] + out[2]);
    for idx in [1, 0, 2] {
        let next = out[idx] + residue;
        if next >= bounds[idx].0 && next <= bounds[idx].1 {
            out[idx] = next;
            break;
        }
    }

    OutcomeProbabilities {
        win: out[0],
        draw: out[1],
        loss: out[2],
    }
}

/// Scales `raw` to sum to 100 while keeping each entry inside its bounds.
/// Requires the bounds to admit a solution (sum of lows <= 100 <= sum of highs).
fn normalize_bounded(raw: [f64; 3], bounds: [(f64, f64); 3]) -> [f64; 3] {
    let sum: f64 = raw.iter().map(|v| v.max(0.0)).sum();
    let mut p = if sum > 0.0 {
        raw.map(|v| v.max(0.0) / sum * 100.0)
    } else {
        [100.0 / 3.0; 3]
    };

    for _ in 0..16 {
        for (v, (lo, hi)) in p.iter_mut().zip(bounds) {
            *v = clamp(*v, lo, hi);
        }
        let diff = 100.0 - p.iter().sum::<f64>();
        if diff.abs() < 1e-12 {
            break;
        }
        let free: Vec<usize> = (0..3)
            .filter(|&i| {
                if diff > 0.0 {
                    p[i] < bounds[i].1
                } else {
                    p[i] > bounds[i].0
                }
            })
            .collect();
        if free.is_empty() {
            break;
        }
        let free_sum: f64 = free.iter().map(|&i| p[i]).sum();
        for &i in &free {
            let share = if free_sum > 0.0 {
                p[i] / free_sum
            } else {
                1.0 / free.len() as f64
            };
            p[i] += diff * share;
        }
    }
    p
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

//! Scoring of three-way forecasts against realised results, used to sanity
//! check the next-match heuristic.

use serde::{Deserialize, Serialize};

use crate::win_prob::{FormResult, OutcomeProbabilities};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBin {
    pub bucket_start: f64,
    pub bucket_end: f64,
    pub count: usize,
    pub avg_pred: f64,
    pub actual_rate: f64,
}

/// Percentages to unit probabilities in (win, draw, loss) order.
fn unit_probs(p: &OutcomeProbabilities) -> [f64; 3] {
    let total = p.total();
    if total > 0.0 && total.is_finite() {
        [p.win / total, p.draw / total, p.loss / total]
    } else {
        [1.0 / 3.0; 3]
    }
}

fn class_index(result: FormResult) -> usize {
    match result {
        FormResult::Win => 0,
        FormResult::Draw => 1,
        FormResult::Loss => 2,
    }
}

fn argmax(p: [f64; 3]) -> usize {
    let mut best = 0;
    for i in 1..3 {
        if p[i] > p[best] {
            best = i;
        }
    }
    best
}

pub fn evaluate_probs(predictions: &[OutcomeProbabilities], outcomes: &[FormResult]) -> Metrics {
    if predictions.is_empty() || predictions.len() != outcomes.len() {
        return Metrics::default();
    }

    let mut brier_sum = 0.0_f64;
    let mut log_loss_sum = 0.0_f64;
    let mut correct = 0usize;

    for (pred, outcome) in predictions.iter().zip(outcomes) {
        let p = unit_probs(pred);
        let actual = class_index(*outcome);
        for (i, pi) in p.iter().enumerate() {
            let y = if i == actual { 1.0 } else { 0.0 };
            brier_sum += (pi - y).powi(2);
        }
        log_loss_sum += -p[actual].clamp(1e-12, 1.0).ln();
        if argmax(p) == actual {
            correct += 1;
        }
    }

    let n = predictions.len() as f64;
    Metrics {
        samples: predictions.len(),
        brier: brier_sum / n,
        log_loss: log_loss_sum / n,
        accuracy: correct as f64 / n,
    }
}

/// Reliability table for one outcome class.
pub fn calibration_bins(
    predictions: &[OutcomeProbabilities],
    outcomes: &[FormResult],
    class: FormResult,
    bins: usize,
) -> Vec<CalibrationBin> {
    let bins = bins.max(2);
    let mut counts = vec![0usize; bins];
    let mut pred_sum = vec![0.0_f64; bins];
    let mut actual_sum = vec![0.0_f64; bins];
    let target = class_index(class);

    for (pred, outcome) in predictions.iter().zip(outcomes) {
        let prob = unit_probs(pred)[target].clamp(0.0, 1.0);
        let idx = ((prob * bins as f64).floor() as usize).min(bins - 1);
        counts[idx] += 1;
        pred_sum[idx] += prob;
        if *outcome == class {
            actual_sum[idx] += 1.0;
        }
    }

    (0..bins)
        .map(|i| {
            let count = counts[i];
            let (avg_pred, actual_rate) = if count > 0 {
                (pred_sum[i] / count as f64, actual_sum[i] / count as f64)
            } else {
                (0.0, 0.0)
            };
            CalibrationBin {
                bucket_start: i as f64 / bins as f64,
                bucket_end: (i + 1) as f64 / bins as f64,
                count,
                avg_pred,
                actual_rate,
            }
        })
        .collect()
}

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use pitch_metrics::calibration::{self, Metrics};
use pitch_metrics::config::{init_tracing, Settings};
use pitch_metrics::win_prob::{self, FormResult, OutcomeProbabilities};

#[derive(Debug, serde::Deserialize)]
struct ResultCase {
    #[serde(default)]
    team: String,
    #[serde(default)]
    opponent_strength: Option<f64>,
    /// Used when `opponent_strength` is absent.
    #[serde(default)]
    opponent_form: Option<String>,
    #[serde(default)]
    form: String,
    result: String,
}

fn main() -> Result<()> {
    init_tracing(&Settings::load());

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/results.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cases: Vec<ResultCase> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;

    let mut predictions = Vec::with_capacity(cases.len());
    let mut outcomes = Vec::with_capacity(cases.len());
    for (idx, case) in cases.iter().enumerate() {
        let Some(outcome) = case.result.trim().chars().next().and_then(FormResult::from_char) else {
            tracing::warn!(idx, team = %case.team, result = %case.result, "skipping case with unknown result");
            continue;
        };
        let strength = case.opponent_strength.unwrap_or_else(|| {
            win_prob::opponent_strength_from_form(&win_prob::parse_form(
                case.opponent_form.as_deref().unwrap_or(""),
            ))
        });
        predictions.push(win_prob::predict_next_match(
            &win_prob::parse_form(&case.form),
            strength,
        ));
        outcomes.push(outcome);
    }
    if predictions.is_empty() {
        return Err(anyhow!("no usable cases in {}", path.display()));
    }

    print_metrics("heuristic", calibration::evaluate_probs(&predictions, &outcomes));

    let uniform = vec![
        OutcomeProbabilities {
            win: 100.0 / 3.0,
            draw: 100.0 / 3.0,
            loss: 100.0 / 3.0,
        };
        predictions.len()
    ];
    print_metrics("uniform", calibration::evaluate_probs(&uniform, &outcomes));

    println!("win calibration:");
    for bin in calibration::calibration_bins(&predictions, &outcomes, FormResult::Win, 5) {
        if bin.count == 0 {
            continue;
        }
        println!(
            "  [{:.1}, {:.1}) n={} pred={:.3} actual={:.3}",
            bin.bucket_start, bin.bucket_end, bin.count, bin.avg_pred, bin.actual_rate
        );
    }
    Ok(())
}

fn print_metrics(label: &str, metrics: Metrics) {
    println!("{label}:");
    println!(
        "  samples={} brier={:.4} log_loss={:.4} accuracy={:.3}",
        metrics.samples, metrics.brier, metrics.log_loss, metrics.accuracy
    );
}

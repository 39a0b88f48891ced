use std::path::PathBuf;

use anyhow::{Context, Result};

use pitch_metrics::config::{init_tracing, Settings};
use pitch_metrics::dataset::load_dataset;
use pitch_metrics::mock_feed::mock_dataset;
use pitch_metrics::report::{build_reports, MatchReport, TeamReport};
use pitch_metrics::report_export::export_reports;

fn main() -> Result<()> {
    let settings = Settings::load();
    init_tracing(&settings);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let dataset_path = positional_arg(&args).map(PathBuf::from).or(settings.dataset_path.clone());
    let dataset = match &dataset_path {
        Some(path) => load_dataset(path)?,
        None => {
            tracing::info!(seed = settings.mock_seed, "no dataset given, using mock data");
            mock_dataset(settings.mock_seed, settings.mock_matches)
        }
    };

    let reports = build_reports(&dataset);
    if has_flag(&args, "--json") {
        let out = serde_json::to_string_pretty(&reports).context("serialize reports")?;
        println!("{out}");
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    if let Some(path) = value_arg(&args, "--xlsx").map(PathBuf::from).or(settings.export_path) {
        let summary = export_reports(&path, &reports)?;
        println!(
            "Wrote {} ({} team rows, {} player rows)",
            path.display(),
            summary.team_rows,
            summary.player_rows
        );
    }
    Ok(())
}

/// First argument that is neither a flag nor a flag's value.
fn positional_arg(args: &[String]) -> Option<&str> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--xlsx" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

fn value_arg(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn print_report(report: &MatchReport) {
    println!("{} [{}]", report.label, report.match_id);
    print_team(&report.home);
    print_team(&report.away);
    println!("  top players:");
    for p in report.players.iter().take(5) {
        let risk = p
            .injury
            .map(|r| format!("{:.0} ({})", r.risk_score, r.risk_category))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:<22} {:<3} impact={:.2} xA={:.2} risk={}",
            p.impact.player,
            p.impact.position.tag(),
            p.impact.score,
            p.xa,
            risk
        );
    }
    println!();
}

fn print_team(team: &TeamReport) {
    println!("  {}:", team.team);
    println!(
        "    ppda={:.2} tilt={:.1} xG={:.3} xA={:.3} shots={} progressive={}",
        team.ppda, team.field_tilt, team.xg, team.xa, team.shots, team.progressive_actions
    );
    println!(
        "    pv={:.3} coordination={:.1} line={:.1}m/{:.3} discipline={:.1} impact={:.2}",
        team.possession_value.total,
        team.coordination.index,
        team.defensive_line.mean_height,
        team.defensive_line.stability,
        team.discipline.score,
        team.impact.mean_impact
    );
}
